// Reverse URL generation from named routes

use crate::pattern::placeholder_regex;
use crate::Error;
use std::collections::HashMap;

/// Generates paths from named route templates, using the same `{identifier}`
/// grammar the pattern compiler matches with. Built from the router's
/// route-name table; carries no shared state of its own.
#[derive(Debug, Clone, Default)]
pub struct UrlGenerator {
    templates: HashMap<String, String>,
}

impl UrlGenerator {
    pub fn new(templates: HashMap<String, String>) -> Self {
        Self { templates }
    }

    pub fn has(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Substitute the given parameters into the named route's template.
    ///
    /// Fails with `RouteNotFound` for an unknown route name and with
    /// `MissingArgument` when a placeholder has no supplied value.
    pub fn generate(
        &self,
        name: &str,
        params: &HashMap<String, String>,
    ) -> Result<String, Error> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| Error::RouteNotFound(format!("no route named {:?}", name)))?;

        for caps in placeholder_regex().captures_iter(template) {
            let placeholder = &caps[1];
            if !params.contains_key(placeholder) {
                return Err(Error::MissingArgument(format!(
                    "route {:?} needs a value for {{{}}}",
                    name, placeholder
                )));
            }
        }

        let generated = placeholder_regex().replace_all(template, |caps: &regex::Captures| {
            params[&caps[1]].clone()
        });
        Ok(generated.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> UrlGenerator {
        let mut templates = HashMap::new();
        templates.insert("user.show".to_string(), "/users/{id}".to_string());
        templates.insert(
            "post.show".to_string(),
            "/users/{user}/posts/{post}".to_string(),
        );
        templates.insert("home".to_string(), "/".to_string());
        UrlGenerator::new(templates)
    }

    #[test]
    fn test_generate_simple() {
        let params = HashMap::from([("id".to_string(), "42".to_string())]);
        assert_eq!(
            generator().generate("user.show", &params).unwrap(),
            "/users/42"
        );
    }

    #[test]
    fn test_generate_multiple_placeholders() {
        let params = HashMap::from([
            ("user".to_string(), "7".to_string()),
            ("post".to_string(), "9".to_string()),
        ]);
        assert_eq!(
            generator().generate("post.show", &params).unwrap(),
            "/users/7/posts/9"
        );
    }

    #[test]
    fn test_generate_no_placeholders() {
        assert_eq!(generator().generate("home", &HashMap::new()).unwrap(), "/");
    }

    #[test]
    fn test_unknown_name() {
        assert!(matches!(
            generator().generate("nope", &HashMap::new()),
            Err(Error::RouteNotFound(_))
        ));
    }

    #[test]
    fn test_missing_argument() {
        match generator().generate("user.show", &HashMap::new()) {
            Err(Error::MissingArgument(msg)) => assert!(msg.contains("{id}")),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
