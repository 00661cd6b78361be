//! Configuration tree nodes.

use std::fmt;

use crate::Mapping;

/// Leaf value of a configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Pre-rendered HTML, emitted verbatim by renderers.
    ///
    /// Never produced by YAML parsing; only generated content uses it.
    Markup(String),
}

impl fmt::Display for Scalar {
    /// Plain-text form. `Null` is empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) | Self::Markup(s) => f.write_str(s),
        }
    }
}

/// Node of a configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

impl Value {
    /// The null scalar.
    pub const NULL: Self = Self::Scalar(Scalar::Null);

    /// Wrap pre-rendered HTML.
    pub fn markup(html: impl Into<String>) -> Self {
        Self::Scalar(Scalar::Markup(html.into()))
    }

    /// Structural depth of the tree.
    ///
    /// Scalars, sequences and empty mappings have depth 0; a non-empty
    /// mapping is one deeper than its deepest value. Sequences are leaves
    /// for this purpose even when they contain mappings.
    pub fn depth(&self) -> usize {
        match self {
            Self::Mapping(mapping) => mapping.depth(),
            Self::Scalar(_) | Self::Sequence(_) => 0,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// String content of a `String` scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Null))
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<Mapping> for Value {
    fn from(mapping: Mapping) -> Self {
        Self::Mapping(mapping)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Sequence(items)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Scalar(Scalar::String(s.to_owned()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Scalar(Scalar::String(s))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Scalar(Scalar::Integer(i64::from(i)))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Scalar(Scalar::Integer(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Scalar(Scalar::Float(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested(keys: &[&str], leaf: Value) -> Value {
        keys.iter()
            .rev()
            .fold(leaf, |inner, key| Value::Mapping(Mapping::singleton(*key, inner)))
    }

    #[test]
    fn test_depth_empty_mapping() {
        assert_eq!(Value::Mapping(Mapping::new()).depth(), 0);
    }

    #[test]
    fn test_depth_flat_mapping() {
        assert_eq!(nested(&["a"], Value::from(1)).depth(), 1);
    }

    #[test]
    fn test_depth_two_levels() {
        assert_eq!(nested(&["a", "b"], Value::from(1)).depth(), 2);
    }

    #[test]
    fn test_depth_four_levels() {
        assert_eq!(nested(&["a", "b", "c", "d"], Value::from(1)).depth(), 4);
    }

    #[test]
    fn test_depth_uses_deepest_branch() {
        let mut mapping = Mapping::new();
        mapping.insert("shallow", 1);
        mapping.insert("deep", nested(&["x", "y"], Value::from(1)));
        assert_eq!(Value::Mapping(mapping).depth(), 3);
    }

    #[test]
    fn test_depth_of_leaves_is_zero() {
        assert_eq!(Value::from("text").depth(), 0);
        assert_eq!(Value::NULL.depth(), 0);
        assert_eq!(Value::Sequence(vec![nested(&["a"], Value::from(1))]).depth(), 0);
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Null.to_string(), "");
        assert_eq!(Scalar::Bool(true).to_string(), "true");
        assert_eq!(Scalar::Integer(-3).to_string(), "-3");
        assert_eq!(Scalar::Float(0.5).to_string(), "0.5");
        assert_eq!(Scalar::String("x".to_owned()).to_string(), "x");
        assert_eq!(Scalar::Markup("<b>x</b>".to_owned()).to_string(), "<b>x</b>");
    }

    #[test]
    fn test_accessors() {
        let value = Value::from("host");
        assert_eq!(value.as_str(), Some("host"));
        assert!(value.as_mapping().is_none());
        assert!(value.as_sequence().is_none());
        assert!(Value::NULL.is_null());
        assert!(Value::markup("<i>").as_str().is_none());
    }
}
