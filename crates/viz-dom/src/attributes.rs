//! Element attributes.
//!
//! Insertion-ordered attribute map: get, set, remove, has.

use std::collections::HashMap;

/// Ordered attribute collection
#[derive(Debug, Clone, Default)]
pub struct AttrMap {
    entries: Vec<(String, String)>,
    by_name: HashMap<String, usize>,
}

impl AttrMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an attribute value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name)
            .and_then(|&i| self.entries.get(i))
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute; an existing entry is replaced in place, keeping
    /// its position in iteration order.
    pub fn set(&mut self, name: &str, value: &str) {
        if let Some(&index) = self.by_name.get(name) {
            self.entries[index].1 = value.to_string();
        } else {
            self.by_name.insert(name.to_string(), self.entries.len());
            self.entries.push((name.to_string(), value.to_string()));
        }
    }

    /// Remove an attribute, returning its value
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.by_name.remove(name)?;
        // Indices after the removed slot shift down by one
        for idx in self.by_name.values_mut() {
            if *idx > index {
                *idx -= 1;
            }
        }
        Some(self.entries.remove(index).1)
    }

    /// Check if an attribute exists
    pub fn has(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Attribute names, in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate over attributes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_attribute() {
        let mut attrs = AttrMap::new();
        attrs.set("class", "btn");
        attrs.set("id", "submit");

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("class"), Some("btn"));
        assert_eq!(attrs.get("id"), Some("submit"));
    }

    #[test]
    fn test_replace_keeps_order() {
        let mut attrs = AttrMap::new();
        attrs.set("href", "#");
        attrs.set("target", "_blank");
        attrs.set("href", "/docs");

        let names: Vec<_> = attrs.names().collect();
        assert_eq!(names, vec!["href", "target"]);
        assert_eq!(attrs.get("href"), Some("/docs"));
    }

    #[test]
    fn test_remove_attribute() {
        let mut attrs = AttrMap::new();
        attrs.set("foo", "bar");
        attrs.set("baz", "qux");

        assert!(attrs.has("foo"));
        assert_eq!(attrs.remove("foo"), Some("bar".to_string()));
        assert!(!attrs.has("foo"));
        // Index map stays coherent after the shift
        assert_eq!(attrs.get("baz"), Some("qux"));
        assert_eq!(attrs.remove("foo"), None);
    }
}
