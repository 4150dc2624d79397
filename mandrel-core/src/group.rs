// Deferred route registration batches sharing a path prefix

use crate::pattern::{join_paths, normalize_path};
use crate::Route;

/// The deferred unit of work a group runs when the registry resolves it
pub type GroupRegistrar = Box<dyn FnOnce(&mut GroupScope) + Send>;

/// A batch of route registrations sharing a path prefix.
///
/// Created at configuration time, invoked exactly once when the registry
/// resolves groups, and discarded after.
pub struct RouteGroup {
    prefix: String,
    registrar: Option<GroupRegistrar>,
}

impl RouteGroup {
    pub fn new<F>(prefix: &str, registrar: F) -> Self
    where
        F: FnOnce(&mut GroupScope) + Send + 'static,
    {
        Self {
            prefix: normalize_path(prefix),
            registrar: Some(Box::new(registrar)),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Run the registrar once and hand the produced routes, each with the
    /// group prefix applied, back to the registry.
    pub(crate) fn run(mut self) -> Vec<Route> {
        let mut scope = GroupScope {
            prefix: self.prefix.clone(),
            routes: Vec::new(),
        };
        if let Some(registrar) = self.registrar.take() {
            registrar(&mut scope);
        }
        scope.routes
    }
}

impl std::fmt::Debug for RouteGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteGroup")
            .field("prefix", &self.prefix)
            .field("pending", &self.registrar.is_some())
            .finish()
    }
}

/// The registration surface a group registrar writes into. Nested groups
/// compose by prefix concatenation, keeping exactly one separator at every
/// joint.
pub struct GroupScope {
    prefix: String,
    routes: Vec<Route>,
}

impl GroupScope {
    /// Register a route under the scope's composed prefix
    pub fn add_route(&mut self, mut route: Route) {
        route.prepend_path(&self.prefix);
        self.routes.push(route);
    }

    /// Register a nested group; its routes carry both prefixes
    pub fn add_group<F>(&mut self, prefix: &str, registrar: F)
    where
        F: FnOnce(&mut GroupScope),
    {
        let mut child = GroupScope {
            prefix: join_paths(&self.prefix, prefix),
            routes: Vec::new(),
        };
        registrar(&mut child);
        self.routes.append(&mut child.routes);
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActionValue, HandlerRef, HttpMethod};

    fn handler() -> HandlerRef {
        HandlerRef::new("PingController", "indexAction", |_, _, response, _| {
            Ok(ActionValue::Response(response))
        })
    }

    #[test]
    fn test_group_prefix_applied() {
        let group = RouteGroup::new("/api/v1", |scope| {
            scope.add_route(Route::new(HttpMethod::GET, "/ping", handler()));
        });

        let routes = group.run();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/api/v1/ping");
    }

    #[test]
    fn test_group_prefix_normalized() {
        let group = RouteGroup::new("api/v1/", |scope| {
            scope.add_route(Route::new(HttpMethod::GET, "ping", handler()));
        });

        let routes = group.run();
        assert_eq!(routes[0].path, "/api/v1/ping");
    }

    #[test]
    fn test_nested_groups_compose() {
        let group = RouteGroup::new("/api", |scope| {
            scope.add_group("/v1", |v1| {
                v1.add_route(Route::new(HttpMethod::GET, "/ping", handler()));
                v1.add_group("/admin", |admin| {
                    admin.add_route(Route::new(HttpMethod::POST, "/flush", handler()));
                });
            });
            scope.add_route(Route::new(HttpMethod::GET, "/status", handler()));
        });

        let routes = group.run();
        let paths: Vec<&str> = routes.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/api/v1/ping", "/api/v1/admin/flush", "/api/status"]);
    }

    #[test]
    fn test_registration_order_preserved() {
        let group = RouteGroup::new("/api", |scope| {
            scope.add_route(Route::new(HttpMethod::GET, "/first", handler()));
            scope.add_route(Route::new(HttpMethod::GET, "/second", handler()));
        });

        let routes = group.run();
        assert_eq!(routes[0].path, "/api/first");
        assert_eq!(routes[1].path, "/api/second");
    }
}
