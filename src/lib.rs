// Mandrel - a synchronous HTTP routing and dependency-injection core
//
// This crate is a thin facade over mandrel-core: route registration with
// ordered matching, path-parameter extraction, route groups, a name-keyed
// dependency injector, and pluggable response engines.

// Re-export core functionality
pub use mandrel_core::*;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Access,
        AccessControl,
        ActionValue,
        AppEngine,
        Bag,
        ClassRef,
        DepArgument,
        DepTarget,
        Dependency,
        Engine,
        Error,
        Firewall,
        FirewallRule,
        HandlerRef,
        HttpMethod,
        HttpStatus,
        Injector,
        JsonEngine,
        Pattern,
        Request,
        Response,
        Route,
        RouteGroup,
        Router,
        RouterConfig,
        Services,
        UrlGenerator,
    };
}
