//! Key-by-key merging of Hiera layers.

use cosmos_tree::{Mapping, Value};

/// Deep merge `overlay` into `base`.
///
/// # Merge Rules
///
/// - Keys only in `base` are kept as they are
/// - Keys only in `overlay` are appended in overlay order
/// - When both sides hold a mapping, the two are merged recursively
/// - Otherwise the overlay value replaces the base value in place
///
/// Sequences are replaced, not concatenated.
pub fn merge_into(base: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        match value {
            Value::Mapping(incoming) => {
                if let Some(Value::Mapping(existing)) = base.get_mut(&key) {
                    merge_into(existing, incoming);
                } else {
                    base.insert(key, incoming);
                }
            }
            value => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use cosmos_tree::parse_yaml;
    use pretty_assertions::assert_eq;

    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        match parse_yaml(yaml).unwrap() {
            Value::Mapping(mapping) => mapping,
            other => panic!("expected mapping, got {other:?}"),
        }
    }

    #[test]
    fn test_merge_overrides_scalars() {
        let mut base = mapping("k: 1\nother: a\n");
        merge_into(&mut base, mapping("k: 2\n"));
        assert_eq!(base, mapping("k: 2\nother: a\n"));
    }

    #[test]
    fn test_merge_appends_new_keys() {
        let mut base = mapping("a: 1\n");
        merge_into(&mut base, mapping("b: 2\n"));
        assert_eq!(base.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_merge_nested_mappings() {
        let mut base = mapping("ntp:\n  servers: [a]\n  enabled: true\n");
        merge_into(&mut base, mapping("ntp:\n  servers: [b, c]\n"));
        assert_eq!(
            base,
            mapping("ntp:\n  servers: [b, c]\n  enabled: true\n")
        );
    }

    #[test]
    fn test_merge_mapping_replaced_by_scalar() {
        let mut base = mapping("x:\n  y: 1\n");
        merge_into(&mut base, mapping("x: flat\n"));
        assert_eq!(base, mapping("x: flat\n"));
    }
}
