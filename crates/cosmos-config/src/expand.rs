//! `${VAR}` expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// Text outside `${...}` is copied as is, including any bare `$VAR`. An
/// unset variable without a default is an error naming `field`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let mut expanded = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${")
        && let Some(len) = rest[start..].find('}')
    {
        let end = start + len + 1;
        expanded.push_str(&rest[..start]);
        expanded.push_str(&expand_reference(&rest[start..end], field)?);
        rest = &rest[end..];
    }
    expanded.push_str(rest);
    Ok(expanded)
}

/// Expand a single `${...}` reference.
fn expand_reference(reference: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env_with_context(reference, |name| {
        std::env::var(name)
            .map(Some)
            .map_err(|_| UnsetVar(name.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("COSMOS_TEST_THEME_DIR", "/usr/share/cosmos");
        }
        let result = expand_env("${COSMOS_TEST_THEME_DIR}/vanilla.css", "site.stylesheet").unwrap();
        assert_eq!(result, "/usr/share/cosmos/vanilla.css");
        unsafe {
            std::env::remove_var("COSMOS_TEST_THEME_DIR");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("COSMOS_TEST_UNSET_STYLE");
        }
        let result = expand_env("${COSMOS_TEST_UNSET_STYLE:-vanilla.css}", "site.stylesheet").unwrap();
        assert_eq!(result, "vanilla.css");
    }

    #[test]
    fn test_unset_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("COSMOS_TEST_MISSING");
        }
        let err = expand_env("${COSMOS_TEST_MISSING}", "site.stylesheet").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let msg = err.to_string();
        assert!(msg.contains("COSMOS_TEST_MISSING"));
        assert!(msg.contains("site.stylesheet"));
    }

    #[test]
    fn test_plain_and_bare_dollar_unchanged() {
        assert_eq!(expand_env("vanilla.css", "f").unwrap(), "vanilla.css");
        assert_eq!(expand_env("styles/$theme.css", "f").unwrap(), "styles/$theme.css");
    }

    #[test]
    fn test_bare_dollar_kept_next_to_braced_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("COSMOS_TEST_MIXED_DIR", "/themes");
        }
        let result = expand_env("${COSMOS_TEST_MIXED_DIR}/$theme.css", "site.stylesheet").unwrap();
        assert_eq!(result, "/themes/$theme.css");
        unsafe {
            std::env::remove_var("COSMOS_TEST_MIXED_DIR");
        }
    }

    #[test]
    fn test_unclosed_reference_unchanged() {
        assert_eq!(expand_env("styles/${theme.css", "f").unwrap(), "styles/${theme.css");
    }
}
