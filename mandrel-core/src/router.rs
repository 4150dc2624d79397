// Route registry and request dispatch

use crate::bag::MATCHES_KEY;
use crate::config::NamingConvention;
use crate::firewall::{Access, AccessControl};
use crate::group::{GroupScope, RouteGroup};
use crate::pattern::{normalize_path, PathCaptures};
use crate::{
    AppEngine, Engine, Error, HttpMethod, Injector, Request, Response, Route, RouterConfig,
    Services, UrlGenerator,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// The route registry and matcher.
///
/// Routes are held per method in registration order; matching is a linear
/// scan with an early return on the first full match, so the earliest
/// registered of two overlapping templates always wins. All registration
/// happens single-threaded during setup; `dispatch` is a pure read and safe
/// for concurrent callers once setup is done. Group resolution mutates the
/// registry and is guarded by a one-shot flag.
pub struct Router {
    config: RouterConfig,
    routes: HashMap<HttpMethod, Vec<Route>>,
    names: HashMap<String, String>,
    groups: Vec<RouteGroup>,
    groups_resolved: bool,
    engine: Box<dyn Engine>,
    injector: Arc<Injector>,
    services: Option<Arc<Services>>,
    firewall: Option<Box<dyn AccessControl>>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("config", &self.config)
            .field("routes", &self.routes)
            .field("names", &self.names)
            .field("groups", &self.groups)
            .field("groups_resolved", &self.groups_resolved)
            .finish_non_exhaustive()
    }
}

impl Router {
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            config,
            routes: HashMap::new(),
            names: HashMap::new(),
            groups: Vec::new(),
            groups_resolved: false,
            engine: Box::new(AppEngine::new()),
            injector: Arc::new(Injector::new()),
            services: None,
            firewall: None,
        }
    }

    /// Swap the response engine
    pub fn set_engine(&mut self, engine: Box<dyn Engine>) {
        self.engine = engine;
    }

    /// Install the dependency registry handlers are resolved from
    pub fn set_injector(&mut self, injector: Arc<Injector>) {
        self.injector = injector;
    }

    /// Install the services provider handed to handler actions
    pub fn set_services(&mut self, services: Arc<Services>) {
        self.services = Some(services);
    }

    /// Install the pre-matching access check
    pub fn set_firewall(&mut self, firewall: Box<dyn AccessControl>) {
        self.firewall = Some(firewall);
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Register a route.
    ///
    /// Validates the method against the configured set, the handler naming
    /// convention, and route-name uniqueness; prepends the base path and
    /// compiles the pattern before the route becomes searchable.
    pub fn add_route(&mut self, mut route: Route) -> Result<&mut Self, Error> {
        if !self.config.supports(route.method) {
            return Err(Error::UnsupportedMethod(format!(
                "{} is not in the configured method set",
                route.method
            )));
        }
        self.check_naming(&route)?;
        if let Some(name) = &route.name {
            if self.names.contains_key(name) {
                return Err(Error::DuplicateRouteName(name.clone()));
            }
        }

        if !self.config.base_path.is_empty() {
            route.prepend_path(&self.config.base_path);
        }
        route.compile()?;

        debug!(method = %route.method, path = %route.path, "Route registered");
        if let Some(name) = &route.name {
            self.names.insert(name.clone(), route.path.clone());
        }
        self.routes.entry(route.method).or_default().push(route);
        Ok(self)
    }

    fn check_naming(&self, route: &Route) -> Result<(), Error> {
        let NamingConvention::Suffixes { controller, action } = &self.config.naming else {
            return Ok(());
        };
        let handler = &route.handler;
        if !handler.controller.ends_with(controller.as_str())
            || handler.controller.len() == controller.len()
        {
            return Err(Error::BadName(format!(
                "controller {:?} must end with {:?}",
                handler.controller, controller
            )));
        }
        if !handler.action.ends_with(action.as_str()) || handler.action.len() == action.len() {
            return Err(Error::BadName(format!(
                "action {:?} must end with {:?}",
                handler.action, action
            )));
        }
        Ok(())
    }

    /// Defer a batch of registrations under a shared prefix
    pub fn add_group<F>(&mut self, prefix: &str, registrar: F)
    where
        F: FnOnce(&mut GroupScope) + Send + 'static,
    {
        self.groups.push(RouteGroup::new(prefix, registrar));
    }

    /// Run every deferred group registrar exactly once, in insertion order.
    /// Re-invocation is a no-op; a misbehaving caller must not re-register
    /// routes.
    pub fn resolve_groups(&mut self) -> Result<(), Error> {
        if self.groups_resolved {
            return Ok(());
        }
        self.groups_resolved = true;
        for group in std::mem::take(&mut self.groups) {
            for route in group.run() {
                self.add_route(route)?;
            }
        }
        Ok(())
    }

    /// Find the route matching the method and raw path.
    ///
    /// Validates the method, normalizes the path, and scans the per-method
    /// list in registration order, stopping at the first full match. Pure
    /// read; parameters are returned, not attached.
    pub fn match_route(
        &self,
        method: &str,
        raw_path: &str,
    ) -> Result<(&Route, PathCaptures), Error> {
        let method = self.validated_method(method)?;
        let path = normalize_request_path(raw_path);
        self.find_match(method, &path)
    }

    fn validated_method(&self, method: &str) -> Result<HttpMethod, Error> {
        HttpMethod::from_str(method)
            .filter(|m| self.config.supports(*m))
            .ok_or_else(|| {
                Error::UnsupportedMethod(format!(
                    "{} is not in the configured method set",
                    method
                ))
            })
    }

    fn find_match(
        &self,
        method: HttpMethod,
        path: &str,
    ) -> Result<(&Route, PathCaptures), Error> {
        if let Some(routes) = self.routes.get(&method) {
            for route in routes {
                // First match wins: registration order is the tie-break.
                if let Some(captures) = route.pattern().and_then(|p| p.match_path(path)) {
                    debug!(method = %method, path = %path, template = %route.path, "Route matched");
                    return Ok((route, captures));
                }
            }
        }
        Err(Error::RouteNotFound(format!("{} {}", method, path)))
    }

    /// Resolve groups (one-shot), then dispatch the request
    pub fn handle(&mut self, request: &mut Request) -> Result<Response, Error> {
        self.resolve_groups()?;
        self.dispatch(request)
    }

    /// Dispatch a single request against the finished registry.
    ///
    /// Attaches the extracted path parameters to the request and hands the
    /// matched route to the configured response engine. Safe for unlimited
    /// concurrent callers once registration is complete.
    pub fn dispatch(&self, request: &mut Request) -> Result<Response, Error> {
        let method = self.validated_method(&request.method)?;
        let path = normalize_request_path(&request.path);

        if let Some(firewall) = &self.firewall {
            if let Access::Redirect(response) = firewall.check_access(&path) {
                return Ok(response);
            }
        }

        let (route, captures) = self.find_match(method, &path)?;
        for (key, value) in captures.named {
            request.params.set(key, value);
        }
        if !captures.positional.is_empty() {
            request.params.set(
                MATCHES_KEY,
                Value::Array(captures.positional.into_iter().map(Value::from).collect()),
            );
        }

        self.engine
            .resolve(route, request, &self.injector, self.services.as_deref())
    }

    /// A reverse URL generator over the current route-name table
    pub fn url_generator(&self) -> UrlGenerator {
        UrlGenerator::new(self.names.clone())
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a raw request target: strip the query string, percent-decode,
/// then apply template normalization (one leading separator, no trailing
/// separator except the root alone).
pub fn normalize_request_path(raw: &str) -> String {
    let without_query = raw.split_once('?').map(|(p, _)| p).unwrap_or(raw);
    let decoded = urlencoding::decode(without_query)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| without_query.to_string());
    let normalized = normalize_path(&decoded);
    if normalized.is_empty() {
        "/".to_string()
    } else {
        normalized
    }
}
