// Strongly-typed handler references

use crate::{Error, Request, Response, Services};
use std::any::Any;
use std::sync::Arc;

/// A resolved dependency or handler instance, shared by reference.
pub type Shared = Arc<dyn Any + Send + Sync>;

/// Action invocation closure: downcasts the resolved handler instance and
/// calls a statically typed method on it.
pub type ActionFn = Arc<
    dyn Fn(&Shared, &mut Request, Response, Option<&Services>) -> Result<ActionValue, Error>
        + Send
        + Sync,
>;

/// The two result shapes a handler action can produce.
///
/// A plain engine expects the response carrier back; a JSON engine expects
/// a structured value it serializes itself.
#[derive(Debug)]
pub enum ActionValue {
    Response(Response),
    Json(serde_json::Value),
}

impl ActionValue {
    /// Shape name used in invalid-result diagnostics
    pub fn shape(&self) -> &'static str {
        match self {
            ActionValue::Response(_) => "Response",
            ActionValue::Json(_) => "Json",
        }
    }
}

/// A route's handler binding: controller and action names for registration
/// checks and handler lookup, plus the typed invocation closure resolved
/// once at registration time.
#[derive(Clone)]
pub struct HandlerRef {
    pub controller: String,
    pub action: String,
    invoke: ActionFn,
}

impl HandlerRef {
    pub fn new<F>(controller: impl Into<String>, action: impl Into<String>, invoke: F) -> Self
    where
        F: Fn(&Shared, &mut Request, Response, Option<&Services>) -> Result<ActionValue, Error>
            + Send
            + Sync
            + 'static,
    {
        Self {
            controller: controller.into(),
            action: action.into(),
            invoke: Arc::new(invoke),
        }
    }

    /// Invoke the action on a resolved handler instance
    pub fn invoke(
        &self,
        instance: &Shared,
        request: &mut Request,
        response: Response,
        services: Option<&Services>,
    ) -> Result<ActionValue, Error> {
        (self.invoke)(instance, request, response, services)
    }
}

impl std::fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRef")
            .field("controller", &self.controller)
            .field("action", &self.action)
            .finish()
    }
}
