// HTTP response carrier produced by the engines

use crate::{Error, HttpStatus};
use serde::Serialize;
use std::collections::HashMap;

/// The response under construction for a single request.
///
/// Handlers either mutate a carrier handed to them or return a structured
/// value a JSON engine serializes into one; either way this is what the
/// output-emission collaborator finally receives.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: HttpStatus::Ok.code(),
            headers: HashMap::new(),
            body: String::new(),
        }
    }

    pub fn with_status(mut self, status: HttpStatus) -> Self {
        self.status = status.code();
        self
    }

    pub fn with_status_code(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Append content to the body
    pub fn with_content(mut self, content: impl AsRef<str>) -> Self {
        self.body.push_str(content.as_ref());
        self
    }

    /// Append content to the body in place
    pub fn write(&mut self, content: impl AsRef<str>) {
        self.body.push_str(content.as_ref());
    }

    pub fn header(&self, key: &str) -> Option<&String> {
        self.headers.get(key)
    }

    /// A 200 response carrying the serialized value with a JSON content type
    pub fn json<T: Serialize>(value: &T) -> Result<Self, Error> {
        let body =
            serde_json::to_string(value).map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(Response::new()
            .with_header("Content-Type", "application/json;charset=UTF-8")
            .with_content(body))
    }

    /// A 303 redirect to the given target
    pub fn redirect(target: impl Into<String>) -> Self {
        Response::new()
            .with_status(HttpStatus::SeeOther)
            .with_header("Location", target.into())
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_appends() {
        let response = Response::new().with_content("hello").with_content(", world");
        assert_eq!(response.body, "hello, world");
        assert_eq!(response.status, 200);
    }

    #[test]
    fn test_write_appends_in_place() {
        let mut response = Response::new();
        response.write("a");
        response.write("b");
        assert_eq!(response.body, "ab");
    }

    #[test]
    fn test_json_helper() {
        let response = Response::json(&json!({"ok": true})).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(
            response.header("Content-Type"),
            Some(&"application/json;charset=UTF-8".to_string())
        );
        assert_eq!(response.body, r#"{"ok":true}"#);
    }

    #[test]
    fn test_redirect_helper() {
        let response = Response::redirect("/login");
        assert_eq!(response.status, 303);
        assert_eq!(response.header("Location"), Some(&"/login".to_string()));
    }

    #[test]
    fn test_status_builder() {
        let response = Response::new().with_status(HttpStatus::Created);
        assert_eq!(response.status, 201);
    }
}
