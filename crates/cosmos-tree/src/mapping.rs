//! Insertion-ordered string-keyed mapping.

use crate::Value;

/// Mapping with unique string keys that remembers insertion order.
///
/// Re-inserting an existing key replaces its value without moving it. YAML
/// documents with a repeated key resolve the same way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(String, Value)>,
}

impl Mapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mapping with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Create a mapping holding a single entry.
    pub fn singleton(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            entries: vec![(key.into(), value.into())],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a value, returning the previous value for `key` if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k.as_str() == key).then_some(v))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find_map(|(k, v)| (k.as_str() == key).then_some(v))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Iterate keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Structural depth: 0 when empty, otherwise one more than the deepest value.
    pub fn depth(&self) -> usize {
        self.values()
            .map(Value::depth)
            .max()
            .map_or(0, |deepest| deepest + 1)
    }
}

/// Borrowing iterator over mapping entries.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, (String, Value)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k.as_str(), v))
    }
}

impl ExactSizeIterator for Iter<'_> {}

/// Owning iterator over mapping entries.
pub type IntoIter = std::vec::IntoIter<(String, Value)>;

impl IntoIterator for Mapping {
    type Item = (String, Value);
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        mapping.extend(iter);
        mapping
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Mapping {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let mut mapping = Mapping::new();
        mapping.insert("zeta", 1);
        mapping.insert("alpha", 2);
        mapping.insert("mid", 3);

        let keys: Vec<_> = mapping.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_insert_existing_key_replaces_in_place() {
        let mut mapping = Mapping::new();
        mapping.insert("a", 1);
        mapping.insert("b", 2);

        let previous = mapping.insert("a", 3);

        assert_eq!(previous, Some(Value::from(1)));
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(mapping.get("a"), Some(&Value::from(3)));
    }

    #[test]
    fn test_get_missing_key() {
        let mapping = Mapping::singleton("a", 1);
        assert!(mapping.get("b").is_none());
        assert!(!mapping.contains_key("b"));
        assert!(mapping.contains_key("a"));
    }

    #[test]
    fn test_get_mut_updates_value() {
        let mut mapping = Mapping::singleton("a", 1);
        *mapping.get_mut("a").unwrap() = Value::from("changed");
        assert_eq!(mapping.get("a"), Some(&Value::from("changed")));
    }

    #[test]
    fn test_from_iter_and_iter_round_order() {
        let mapping: Mapping = [("x", 1), ("y", 2)].into_iter().collect();
        let entries: Vec<_> = mapping.iter().map(|(k, _)| k.to_owned()).collect();
        assert_eq!(entries, vec!["x".to_owned(), "y".to_owned()]);
        assert_eq!(mapping.iter().len(), 2);
    }

    #[test]
    fn test_depth_of_empty_mapping_is_zero() {
        assert_eq!(Mapping::new().depth(), 0);
    }

    #[test]
    fn test_depth_ignores_sequences() {
        let mapping = Mapping::singleton(
            "list",
            Value::Sequence(vec![Value::Mapping(Mapping::singleton("a", 1))]),
        );
        assert_eq!(mapping.depth(), 1);
    }
}
