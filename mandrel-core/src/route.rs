// Route definitions

use crate::pattern::{join_paths, normalize_path, Pattern};
use crate::{Error, HandlerRef, HttpMethod};

/// A registered route: method, normalized path template, handler binding,
/// and the pattern derived once by the registry.
///
/// Immutable once added to the registry, except for the one-time prefix
/// prepend performed by group composition or base-path application before
/// the route becomes searchable.
#[derive(Clone, Debug)]
pub struct Route {
    pub name: Option<String>,
    pub method: HttpMethod,
    pub path: String,
    pub handler: HandlerRef,
    pattern: Option<Pattern>,
}

impl Route {
    /// Create a route; the path is normalized immediately. An empty path is
    /// preserved so registration can report the invalid template.
    pub fn new(method: HttpMethod, path: &str, handler: HandlerRef) -> Self {
        Self {
            name: None,
            method,
            path: normalize_path(path),
            handler,
            pattern: None,
        }
    }

    /// Name the route for reverse URL generation
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Prepend a prefix to the template. Must happen before the pattern is
    /// compiled; the registry compiles after all prefixes are applied.
    pub fn prepend_path(&mut self, prefix: &str) {
        self.path = join_paths(prefix, &self.path);
        self.pattern = None;
    }

    /// Compile the template into the matchable pattern
    pub(crate) fn compile(&mut self) -> Result<(), Error> {
        self.pattern = Some(Pattern::compile(&self.path)?);
        Ok(())
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }
}
