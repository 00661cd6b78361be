//! Conversion from `serde_yaml` documents to configuration trees.

use std::fmt;

use serde::de::{
    self, Deserialize, Deserializer, EnumAccess, IgnoredAny, MapAccess, SeqAccess, VariantAccess,
    Visitor,
};
use serde_yaml::Value as Yaml;

use crate::{Mapping, Scalar, Value};

/// Key whose value is merged into the enclosing mapping (`<<: *anchor`).
const MERGE_KEY: &str = "<<";

/// Error raised while turning YAML text into a [`Value`].
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("invalid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Sequences and mappings cannot be used as mapping keys.
    #[error("unsupported mapping key: {0}")]
    UnsupportedKey(String),

    #[error("merge key '<<' must reference a mapping or a list of mappings")]
    InvalidMerge,
}

/// Parse a YAML document into a configuration tree.
///
/// Empty or whitespace-only content yields [`Value::NULL`]. A key repeated
/// within one mapping keeps its first position and its last value. Merge keys
/// (`<<: *anchor`) are resolved, with the mapping's own keys taking precedence.
///
/// # Errors
///
/// Returns an error if the YAML is malformed, uses composite mapping keys, or
/// merges something other than mappings.
pub fn parse_yaml(content: &str) -> Result<Value, ConversionError> {
    if content.trim().is_empty() {
        return Ok(Value::NULL);
    }
    let Document(document) = serde_yaml::from_str(content)?;
    Value::try_from(document)
}

/// YAML node read without rejecting duplicate mapping keys.
struct Document(Yaml);

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DocumentVisitor).map(Self)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Yaml;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any YAML value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Yaml, E> {
        Ok(Yaml::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Yaml, E> {
        Ok(Yaml::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Yaml, E> {
        Ok(Yaml::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Yaml, E> {
        Ok(Yaml::Number(v.into()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Yaml, E> {
        Ok(Yaml::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Yaml, E> {
        Ok(Yaml::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Yaml, E> {
        Ok(Yaml::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Yaml, E> {
        Ok(Yaml::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Yaml, D::Error>
    where
        D: Deserializer<'de>,
    {
        Document::deserialize(deserializer).map(|Document(node)| node)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Yaml, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(Document(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Yaml::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Yaml, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut mapping = serde_yaml::Mapping::new();
        while let Some((Document(key), Document(value))) = map.next_entry()? {
            mapping.insert(key, value);
        }
        Ok(Yaml::Mapping(mapping))
    }

    // Tagged nodes arrive as single-variant enums; the tag is dropped.
    fn visit_enum<A>(self, data: A) -> Result<Yaml, A::Error>
    where
        A: EnumAccess<'de>,
    {
        let (IgnoredAny, contents) = data.variant()?;
        contents.newtype_variant().map(|Document(node)| node)
    }
}

impl TryFrom<Yaml> for Value {
    type Error = ConversionError;

    fn try_from(yaml: Yaml) -> Result<Self, Self::Error> {
        Ok(match yaml {
            Yaml::Null => Self::NULL,
            Yaml::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            Yaml::Number(n) => Self::Scalar(number_scalar(&n)),
            Yaml::String(s) => Self::Scalar(Scalar::String(s)),
            Yaml::Sequence(items) => Self::Sequence(
                items
                    .into_iter()
                    .map(Self::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Yaml::Mapping(entries) => {
                let (merges, own): (Vec<_>, Vec<_>) = entries
                    .into_iter()
                    .partition(|(key, _)| key.as_str() == Some(MERGE_KEY));
                let mut mapping = Mapping::with_capacity(own.len());
                for (_, merge) in merges {
                    for source in merge_sources(merge)? {
                        for (key, value) in source {
                            mapping.insert(key, value);
                        }
                    }
                }
                for (key, value) in own {
                    mapping.insert(key_string(key)?, Self::try_from(value)?);
                }
                Self::Mapping(mapping)
            }
            // Tags carry no meaning for rendering.
            Yaml::Tagged(tagged) => Self::try_from(tagged.value)?,
        })
    }
}

/// Integers that do not fit `i64` fall back to floats.
fn number_scalar(n: &serde_yaml::Number) -> Scalar {
    match n.as_i64() {
        Some(i) => Scalar::Integer(i),
        None => Scalar::Float(n.as_f64().unwrap_or(f64::NAN)),
    }
}

/// Mappings named by a merge key, ordered so that later ones win on insert.
///
/// In a list of mappings the first one listed takes precedence.
fn merge_sources(merge: Yaml) -> Result<Vec<Mapping>, ConversionError> {
    match Value::try_from(merge)? {
        Value::Mapping(source) => Ok(vec![source]),
        Value::Sequence(items) => items
            .into_iter()
            .rev()
            .map(|item| match item {
                Value::Mapping(source) => Ok(source),
                _ => Err(ConversionError::InvalidMerge),
            })
            .collect(),
        Value::Scalar(_) => Err(ConversionError::InvalidMerge),
    }
}

fn key_string(key: Yaml) -> Result<String, ConversionError> {
    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Null => Ok("null".to_owned()),
        Yaml::Tagged(tagged) => key_string(tagged.value),
        other @ (Yaml::Sequence(_) | Yaml::Mapping(_)) => {
            Err(ConversionError::UnsupportedKey(format!("{other:?}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_preserves_key_order() {
        let tree = parse_yaml("zulu: 1\nalpha: 2\nmike: 3\n").unwrap();
        let keys: Vec<_> = tree.as_mapping().unwrap().keys().collect();
        assert_eq!(keys, vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn test_parse_scalar_types() {
        let tree = parse_yaml("s: text\ni: 42\nf: 1.5\nb: false\nn: ~\n").unwrap();
        let mapping = tree.as_mapping().unwrap();
        assert_eq!(mapping.get("s"), Some(&Value::from("text")));
        assert_eq!(mapping.get("i"), Some(&Value::from(42)));
        assert_eq!(mapping.get("f"), Some(&Value::from(1.5)));
        assert_eq!(mapping.get("b"), Some(&Value::from(false)));
        assert_eq!(mapping.get("n"), Some(&Value::NULL));
    }

    #[test]
    fn test_parse_nested_structure() {
        let yaml = r"
sunet::server:
  ssh_allow_from:
    - 10.0.0.0/8
    - 192.168.0.0/16
  fail2ban: true
";
        let tree = parse_yaml(yaml).unwrap();
        assert_eq!(tree.depth(), 2);

        let server = tree
            .as_mapping()
            .and_then(|m| m.get("sunet::server"))
            .and_then(Value::as_mapping)
            .unwrap();
        let allowed = server.get("ssh_allow_from").unwrap().as_sequence().unwrap();
        assert_eq!(allowed.len(), 2);
        assert_eq!(allowed[0].as_str(), Some("10.0.0.0/8"));
    }

    #[test]
    fn test_parse_stringifies_scalar_keys() {
        let tree = parse_yaml("1: one\ntrue: yes-bool\n").unwrap();
        let keys: Vec<_> = tree.as_mapping().unwrap().keys().collect();
        assert_eq!(keys, vec!["1", "true"]);
    }

    #[test]
    fn test_parse_rejects_composite_keys() {
        let result = parse_yaml("? [a, b]\n: value\n");
        assert!(matches!(result, Err(ConversionError::UnsupportedKey(_))));
    }

    #[test]
    fn test_parse_strips_tags() {
        let tree = parse_yaml("secret: !vault abc\n").unwrap();
        assert_eq!(
            tree.as_mapping().unwrap().get("secret"),
            Some(&Value::from("abc"))
        );
    }

    #[test]
    fn test_parse_empty_is_null() {
        assert!(parse_yaml("").unwrap().is_null());
        assert!(parse_yaml("  \n\t\n").unwrap().is_null());
    }

    #[test]
    fn test_parse_invalid_yaml() {
        assert!(matches!(
            parse_yaml("key: [unclosed"),
            Err(ConversionError::Parse(_))
        ));
    }

    #[test]
    fn test_duplicate_key_last_value_wins() {
        let tree = parse_yaml("k: 1\nother: x\nk: 2\n").unwrap();
        let mapping = tree.as_mapping().unwrap();
        let keys: Vec<_> = mapping.keys().collect();
        assert_eq!(keys, vec!["k", "other"]);
        assert_eq!(mapping.get("k"), Some(&Value::from(2)));
    }

    #[test]
    fn test_merge_key_is_resolved() {
        let tree = parse_yaml("base: &b\n  x: 1\nderived:\n  <<: *b\n  y: 2\n").unwrap();
        let derived = tree
            .as_mapping()
            .and_then(|m| m.get("derived"))
            .and_then(Value::as_mapping)
            .unwrap();
        let keys: Vec<_> = derived.keys().collect();
        assert_eq!(keys, vec!["x", "y"]);
        assert_eq!(derived.get("x"), Some(&Value::from(1)));
    }

    #[test]
    fn test_merge_key_own_values_take_precedence() {
        let yaml = "base: &b\n  x: 1\n  z: 3\nderived:\n  x: 9\n  <<: *b\n";
        let tree = parse_yaml(yaml).unwrap();
        let derived = tree
            .as_mapping()
            .and_then(|m| m.get("derived"))
            .and_then(Value::as_mapping)
            .unwrap();
        let keys: Vec<_> = derived.keys().collect();
        assert_eq!(keys, vec!["x", "z"]);
        assert_eq!(derived.get("x"), Some(&Value::from(9)));
    }

    #[test]
    fn test_merge_key_list_first_mapping_wins() {
        let yaml = "a: &a\n  k: from-a\nb: &b\n  k: from-b\n  extra: 1\nc:\n  <<: [*a, *b]\n";
        let tree = parse_yaml(yaml).unwrap();
        let merged = tree
            .as_mapping()
            .and_then(|m| m.get("c"))
            .and_then(Value::as_mapping)
            .unwrap();
        assert_eq!(merged.get("k"), Some(&Value::from("from-a")));
        assert_eq!(merged.get("extra"), Some(&Value::from(1)));
    }

    #[test]
    fn test_merge_key_rejects_scalar() {
        assert!(matches!(
            parse_yaml("derived:\n  <<: 5\n"),
            Err(ConversionError::InvalidMerge)
        ));
    }

    #[test]
    fn test_large_unsigned_becomes_float() {
        let tree = parse_yaml("big: 18446744073709551615\n").unwrap();
        let big = tree.as_mapping().unwrap().get("big").unwrap();
        assert!(matches!(big, Value::Scalar(Scalar::Float(_))));
    }
}
