// Loosely typed parameter bags

use serde_json::Value;
use std::collections::HashMap;

/// Reserved key under which purely positional pattern captures are stored,
/// in capture order, as a JSON array of strings.
pub const MATCHES_KEY: &str = "_matches";

/// An ordered-agnostic collection of loosely typed parameters.
///
/// Every parameter surface the core touches (query, body, server, extracted
/// path parameters) is a `Bag` of JSON values keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bag {
    values: HashMap<String, Value>,
}

impl Bag {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Get a value by key as a string slice, if it is a JSON string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Whether the key is present at all
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Whether the key is present with a non-null, non-empty value
    pub fn valid(&self, key: &str) -> bool {
        match self.values.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(o)) => !o.is_empty(),
            Some(_) => true,
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<HashMap<String, Value>> for Bag {
    fn from(values: HashMap<String, Value>) -> Self {
        Self { values }
    }
}

impl From<HashMap<String, String>> for Bag {
    fn from(values: HashMap<String, String>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        }
    }
}

impl FromIterator<(String, Value)> for Bag {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_get() {
        let mut bag = Bag::new();
        bag.set("id", "42");
        bag.set("count", 3);

        assert_eq!(bag.get_str("id"), Some("42"));
        assert_eq!(bag.get("count"), Some(&json!(3)));
        assert_eq!(bag.get("missing"), None);
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn test_valid() {
        let mut bag = Bag::new();
        bag.set("empty", "");
        bag.set("null", Value::Null);
        bag.set("ok", "value");
        bag.set("zero", 0);

        assert!(!bag.valid("empty"));
        assert!(!bag.valid("null"));
        assert!(!bag.valid("missing"));
        assert!(bag.valid("ok"));
        assert!(bag.valid("zero"));

        assert!(bag.has("empty"));
        assert!(!bag.has("missing"));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut bag = Bag::new();
        bag.set("a", 1);
        bag.set("b", 2);

        assert_eq!(bag.remove("a"), Some(json!(1)));
        assert_eq!(bag.remove("a"), None);
        assert_eq!(bag.len(), 1);

        bag.clear();
        assert!(bag.is_empty());
    }

    #[test]
    fn test_from_string_map() {
        let mut map = HashMap::new();
        map.insert("name".to_string(), "mandrel".to_string());
        let bag = Bag::from(map);
        assert_eq!(bag.get_str("name"), Some("mandrel"));
    }
}
