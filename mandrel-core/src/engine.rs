// Pluggable response engines

use crate::handler::Shared;
use crate::{ActionValue, Error, Injector, Request, Response, Route, Services};
use tracing::debug;

/// Strategy deciding how a matched route's handler is invoked and how its
/// return value becomes a response.
pub trait Engine: Send + Sync {
    fn resolve(
        &self,
        route: &Route,
        request: &mut Request,
        injector: &Injector,
        services: Option<&Services>,
    ) -> Result<Response, Error>;
}

/// Resolve the route's handler instance through the injector, falling back
/// to a bare no-argument construction when the controller is not registered
/// as a named dependency. Raw dependency errors never leak past here; an
/// unresolvable handler is a `HandlerNotFound`.
fn resolve_handler(route: &Route, injector: &Injector) -> Result<Shared, Error> {
    let controller = &route.handler.controller;
    if injector.has(controller) {
        return injector.get(controller).map_err(|err| match err {
            Error::DependencyNotFound(_) | Error::ClassNotFound(_) => {
                Error::HandlerNotFound(controller.clone())
            }
            other => other,
        });
    }
    if injector.has_class(controller) {
        return injector
            .construct_class(controller, &[])
            .map_err(|_| Error::HandlerNotFound(controller.clone()));
    }
    Err(Error::HandlerNotFound(controller.clone()))
}

fn invoke(
    route: &Route,
    request: &mut Request,
    injector: &Injector,
    services: Option<&Services>,
) -> Result<ActionValue, Error> {
    let instance = resolve_handler(route, injector)?;
    debug!(
        controller = %route.handler.controller,
        action = %route.handler.action,
        "Invoking handler action"
    );
    route
        .handler
        .invoke(&instance, request, Response::new(), services)
}

fn wrong_shape(route: &Route, expected: &str, actual: &ActionValue) -> Error {
    Error::InvalidHandlerResult(format!(
        "{}::{} returned {}, expected {}",
        route.handler.controller,
        route.handler.action,
        actual.shape(),
        expected
    ))
}

/// Plain engine: the handler mutates and returns the response carrier.
#[derive(Debug, Default, Clone)]
pub struct AppEngine;

impl AppEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Engine for AppEngine {
    fn resolve(
        &self,
        route: &Route,
        request: &mut Request,
        injector: &Injector,
        services: Option<&Services>,
    ) -> Result<Response, Error> {
        match invoke(route, request, injector, services)? {
            ActionValue::Response(response) => Ok(response),
            other => Err(wrong_shape(route, "Response", &other)),
        }
    }
}

/// JSON engine: the handler returns a structured value the engine
/// serializes and wraps with a JSON content type.
#[derive(Debug, Default, Clone)]
pub struct JsonEngine;

impl JsonEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Engine for JsonEngine {
    fn resolve(
        &self,
        route: &Route,
        request: &mut Request,
        injector: &Injector,
        services: Option<&Services>,
    ) -> Result<Response, Error> {
        match invoke(route, request, injector, services)? {
            ActionValue::Json(value) => {
                let body = serde_json::to_string_pretty(&value)
                    .map_err(|e| Error::Serialization(e.to_string()))?;
                Ok(Response::new()
                    .with_header("Content-Type", "application/json;charset=UTF-8")
                    .with_content(body))
            }
            other => Err(wrong_shape(route, "Json", &other)),
        }
    }
}
