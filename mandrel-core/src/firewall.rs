// Pre-matching access control

use crate::pattern::{normalize_path, Pattern};
use crate::{Error, Response};
use std::sync::Arc;
use tracing::debug;

/// Outcome of an access check: let the request through to matching, or
/// short-circuit to a redirect response.
#[derive(Debug)]
pub enum Access {
    Allow,
    Redirect(Response),
}

/// The optional pre-matching step the router consults before searching
/// routes.
pub trait AccessControl: Send + Sync {
    fn check_access(&self, path: &str) -> Access;
}

/// The authenticated caller, as reported by the session collaborator
#[derive(Debug, Clone)]
pub struct Identity {
    pub username: String,
    pub roles: Vec<String>,
}

/// A protected path prefix with its redirect target and eligible roles.
/// An empty role list protects against anonymous access only.
#[derive(Debug, Clone)]
pub struct FirewallRule {
    pub protect: String,
    pub form: String,
    pub roles: Vec<String>,
}

struct CompiledRule {
    rule: FirewallRule,
    pattern: Pattern,
}

type IdentityFn = Arc<dyn Fn() -> Option<Identity> + Send + Sync>;

/// Ordered prefix-based access rules. Identity comes from a caller-supplied
/// closure so the session store stays an external collaborator; the first
/// rule matching the path decides.
pub struct Firewall {
    rules: Vec<CompiledRule>,
    identity: IdentityFn,
}

impl Firewall {
    pub fn new<F>(identity: F) -> Self
    where
        F: Fn() -> Option<Identity> + Send + Sync + 'static,
    {
        Self {
            rules: Vec::new(),
            identity: Arc::new(identity),
        }
    }

    /// Add a rule; its template is compiled anchored at the start only, so
    /// it protects the whole subtree under the prefix.
    pub fn add_rule(&mut self, rule: FirewallRule) -> Result<&mut Self, Error> {
        let pattern = Pattern::compile_prefix(&rule.protect)?;
        self.rules.push(CompiledRule { rule, pattern });
        Ok(self)
    }

    fn eligible(&self, rule: &FirewallRule) -> bool {
        match (self.identity)() {
            Some(identity) => {
                rule.roles.is_empty()
                    || rule.roles.iter().any(|role| identity.roles.contains(role))
            }
            None => false,
        }
    }
}

impl AccessControl for Firewall {
    fn check_access(&self, path: &str) -> Access {
        let path = normalize_path(path);
        for compiled in &self.rules {
            if compiled.pattern.is_match(&path) {
                if self.eligible(&compiled.rule) {
                    return Access::Allow;
                }
                debug!(path = %path, form = %compiled.rule.form, "Access denied, redirecting");
                return Access::Redirect(Response::redirect(&compiled.rule.form));
            }
        }
        Access::Allow
    }
}
