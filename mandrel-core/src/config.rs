// Router configuration

use crate::pattern::normalize_path;
use crate::HttpMethod;

/// Handler naming convention: structural suffix checks applied at
/// registration time. Purely string-based, never semantic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingConvention {
    /// Controller and action names must carry the given suffixes
    Suffixes {
        controller: String,
        action: String,
    },
    /// No naming check
    Disabled,
}

impl Default for NamingConvention {
    fn default() -> Self {
        NamingConvention::Suffixes {
            controller: "Controller".to_string(),
            action: "Action".to_string(),
        }
    }
}

/// Explicit configuration applied at router construction. Replaces ambient
/// global state: everything the matcher and engines need is passed in here.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Prefix prepended to every registered route template
    pub base_path: String,
    /// The set of methods the router accepts, for registration and dispatch
    pub methods: Vec<HttpMethod>,
    /// Naming convention enforced on handler references
    pub naming: NamingConvention,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            methods: vec![HttpMethod::GET, HttpMethod::POST],
            naming: NamingConvention::default(),
        }
    }
}

impl RouterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_path(mut self, base_path: &str) -> Self {
        self.base_path = normalize_path(base_path);
        self
    }

    /// Replace the supported-method set
    pub fn methods(mut self, methods: Vec<HttpMethod>) -> Self {
        self.methods = methods;
        self
    }

    /// Extend the supported-method set
    pub fn add_method(mut self, method: HttpMethod) -> Self {
        if !self.methods.contains(&method) {
            self.methods.push(method);
        }
        self
    }

    /// Change the enforced controller/action suffixes
    pub fn suffixes(mut self, controller: impl Into<String>, action: impl Into<String>) -> Self {
        self.naming = NamingConvention::Suffixes {
            controller: controller.into(),
            action: action.into(),
        };
        self
    }

    /// Turn off the naming-convention check
    pub fn without_naming_check(mut self) -> Self {
        self.naming = NamingConvention::Disabled;
        self
    }

    pub fn supports(&self, method: HttpMethod) -> bool {
        self.methods.contains(&method)
    }
}
