// HTTP request carrier consumed by the core

use crate::bag::{Bag, MATCHES_KEY};
use serde_json::Value;

/// An already-parsed HTTP request.
///
/// The core never reads sockets; a collaborator parses the wire format and
/// hands over decoded fields. The matcher's only write access is attaching
/// extracted path parameters to `params`.
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// Decoded request method, e.g. "GET"
    pub method: String,
    /// Raw request target, query string still attached
    pub path: String,
    /// Query-string parameters
    pub query: Bag,
    /// Body parameters
    pub body: Bag,
    /// Server/environment parameters
    pub server: Bag,
    /// Path parameters extracted by the matcher
    pub params: Bag,
}

impl Request {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    /// Get an extracted path parameter by placeholder name
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get_str(name)
    }

    /// Get a query parameter by name
    pub fn query(&self, name: &str) -> Option<&Value> {
        self.query.get(name)
    }

    /// Positional (unnamed) captures from the matched pattern, in capture order
    pub fn positional_matches(&self) -> Vec<String> {
        match self.params.get(MATCHES_KEY) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_param_access() {
        let mut request = Request::new("GET", "/users/42");
        request.params.set("id", "42");

        assert_eq!(request.param("id"), Some("42"));
        assert_eq!(request.param("missing"), None);
    }

    #[test]
    fn test_positional_matches() {
        let mut request = Request::new("GET", "/files/a/b");
        assert!(request.positional_matches().is_empty());

        request.params.set(MATCHES_KEY, json!(["a", "b"]));
        assert_eq!(request.positional_matches(), vec!["a", "b"]);
    }
}
