// Named service provider handed to handler actions

use crate::handler::Shared;
use crate::Error;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

type ServiceFn = Arc<dyn Fn() -> Shared + Send + Sync>;

/// A lightweight alias → provider-closure registry, offered to handler
/// actions as the optional third collaborator next to the request and the
/// response carrier.
#[derive(Default, Clone)]
pub struct Services {
    entries: HashMap<String, ServiceFn>,
}

impl Services {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under an alias. Aliases must be whitespace-free
    /// and unique.
    pub fn register<F>(&mut self, alias: &str, provider: F) -> Result<(), Error>
    where
        F: Fn() -> Shared + Send + Sync + 'static,
    {
        if alias.is_empty() || alias.chars().any(char::is_whitespace) {
            return Err(Error::BadName(format!(
                "service alias {:?} must be non-empty and contain no whitespace",
                alias
            )));
        }
        if self.entries.contains_key(alias) {
            return Err(Error::DuplicateDependency(alias.to_string()));
        }
        debug!(service = alias, "Service registered");
        self.entries.insert(alias.to_string(), Arc::new(provider));
        Ok(())
    }

    pub fn unregister(&mut self, alias: &str) -> bool {
        self.entries.remove(alias).is_some()
    }

    pub fn has(&self, alias: &str) -> bool {
        self.entries.contains_key(alias)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Invoke the provider registered under the alias
    pub fn get(&self, alias: &str) -> Result<Shared, Error> {
        self.entries
            .get(alias)
            .map(|provider| provider())
            .ok_or_else(|| Error::DependencyNotFound(alias.to_string()))
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("aliases", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
