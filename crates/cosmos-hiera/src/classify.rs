//! Directory classification by naming convention.
//!
//! Only the immediate children of the project root are considered. Names are
//! matched against two patterns:
//!
//! - host directories look like fully qualified domain names
//! - common directories look like `<word>-common` with an optional suffix

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

/// Default name of the site-wide configuration directory.
pub const DEFAULT_GLOBAL_DIR: &str = "global";

/// Maximum length of a fully qualified domain name.
const MAX_FQDN_LEN: usize = 255;

/// `foo-common`, `foo-common-extra`, `foo-commonx`.
static COMMON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+-common(?:-?\w*)$").unwrap());

/// A single DNS label: 1-63 chars, no leading or trailing hyphen.
static LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?$").unwrap());

/// Category of a project subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectoryClass {
    Host,
    CommonGroup,
    Global,
    Unclassified,
}

/// Classify a directory name.
///
/// The global directory wins over the patterns; host and common patterns
/// cannot both match since host names contain dots and common names cannot.
pub fn classify_name(name: &str, global_dir: &str) -> DirectoryClass {
    if name == global_dir {
        DirectoryClass::Global
    } else if is_fqdn(name) {
        DirectoryClass::Host
    } else if is_common_dir(name) {
        DirectoryClass::CommonGroup
    } else {
        DirectoryClass::Unclassified
    }
}

/// Whether `name` follows the shared-configuration naming convention.
pub fn is_common_dir(name: &str) -> bool {
    COMMON_RE.is_match(name)
}

/// Whether `name` is shaped like a fully qualified domain name.
///
/// Requires at least two labels, a total length of at most 255 and a final
/// label that is not purely numeric (which rules out IPv4 addresses).
/// A single trailing dot is accepted.
pub fn is_fqdn(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_FQDN_LEN {
        return false;
    }
    let name = name.strip_suffix('.').unwrap_or(name);
    let labels: Vec<&str> = name.split('.').collect();
    let Some(last) = labels.last() else {
        return false;
    };

    labels.len() >= 2
        && labels.iter().all(|label| LABEL_RE.is_match(label))
        && !last.bytes().all(|b| b.is_ascii_digit())
}

/// Select the common directory names, sorted and deduplicated.
pub fn classify_common<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    select_sorted(names, is_common_dir)
}

/// Select the host directory names, sorted and deduplicated.
pub fn classify_hosts<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    select_sorted(names, is_fqdn)
}

fn select_sorted<I, S>(names: I, matches: impl Fn(&str) -> bool) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter(|name| matches(name.as_ref()))
        .map(|name| name.as_ref().to_owned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Discovers host and common directories under a project root.
#[derive(Debug, Clone)]
pub struct Classifier {
    project_root: PathBuf,
}

impl Classifier {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    /// Host directories, sorted.
    ///
    /// Returns an empty Vec if the project root doesn't exist.
    pub fn hosts(&self) -> Vec<String> {
        let hosts = classify_hosts(self.directory_names());
        tracing::info!(count = hosts.len(), "Discovered host directories");
        hosts
    }

    /// Common directories, sorted.
    ///
    /// Returns an empty Vec if the project root doesn't exist.
    pub fn common_dirs(&self) -> Vec<String> {
        let common = classify_common(self.directory_names());
        tracing::info!(count = common.len(), "Discovered common directories");
        common
    }

    /// Names of the immediate child directories of the project root.
    ///
    /// Regular files are skipped even when their names match a pattern.
    /// Names that are not valid UTF-8 cannot match either pattern and are
    /// skipped as well.
    fn directory_names(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.project_root) else {
            tracing::debug!(root = %self.project_root.display(), "Project root not readable");
            return Vec::new();
        };

        entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect()
    }
}
