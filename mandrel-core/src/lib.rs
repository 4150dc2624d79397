// Core library for the Mandrel framework
// Route-matching/dispatch pipeline and the name-keyed dependency registry

pub mod bag;
pub mod config;
pub mod engine;
pub mod error;
pub mod firewall;
pub mod group;
pub mod handler;
pub mod http;
pub mod injector;
pub mod logging;
pub mod pattern;
pub mod request;
pub mod response;
pub mod route;
pub mod router;
pub mod services;
pub mod status;
pub mod url_generator;

// Re-export commonly used types
pub use bag::{Bag, MATCHES_KEY};
pub use config::{NamingConvention, RouterConfig};
pub use engine::{AppEngine, Engine, JsonEngine};
pub use error::Error;
pub use firewall::{Access, AccessControl, Firewall, FirewallRule, Identity};
pub use group::{GroupScope, RouteGroup};
pub use handler::{ActionFn, ActionValue, HandlerRef, Shared};
pub use http::HttpMethod;
pub use injector::{
    ArgValue, ClassMethod, ClassRef, DepArgument, DepTarget, Dependency, FactoryFn, Injector,
};
pub use pattern::{join_paths, normalize_path, PathCaptures, Pattern};
pub use request::Request;
pub use response::Response;
pub use route::Route;
pub use router::{normalize_request_path, Router};
pub use services::Services;
pub use status::HttpStatus;
pub use url_generator::UrlGenerator;
