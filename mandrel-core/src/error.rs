// Error types for the Mandrel core

use crate::HttpStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error("Route not found: {0}")]
    RouteNotFound(String),

    #[error("Invalid route template: {0}")]
    InvalidTemplate(String),

    #[error("Naming convention violation: {0}")]
    BadName(String),

    #[error("Duplicate route name: {0}")]
    DuplicateRouteName(String),

    #[error("Duplicate dependency: {0}")]
    DuplicateDependency(String),

    #[error("Dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("Class not found: {0}")]
    ClassNotFound(String),

    #[error("Cyclic dependency: {0}")]
    CyclicDependency(String),

    #[error("Handler not found: {0}")]
    HandlerNotFound(String),

    #[error("Invalid handler result: {0}")]
    InvalidHandlerResult(String),

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Map the error taxonomy onto HTTP status codes.
    ///
    /// Lookup failures surface as 404, a method outside the configured set
    /// as 405, and everything else (registration and programming errors)
    /// as 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::RouteNotFound(_)
            | Error::HandlerNotFound(_)
            | Error::ClassNotFound(_)
            | Error::DependencyNotFound(_) => 404,
            Error::UnsupportedMethod(_) => 405,
            _ => 500,
        }
    }

    /// The `HttpStatus` for this error.
    pub fn http_status(&self) -> HttpStatus {
        HttpStatus::from_code(self.status_code()).unwrap_or(HttpStatus::InternalServerError)
    }
}
