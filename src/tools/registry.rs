use super::traits::{FunctionHandler, FunctionKind, FunctionOutcome, FunctionSpec};
use super::validate_gsm::ValidateGsmFunction;
use crate::error::DispatchError;
use crate::llm::coerce_arguments;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A model-requested call that passed boundary checks: the name is a known
/// kind with a registered handler and the arguments are a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub kind: FunctionKind,
    pub arguments: Value,
}

/// Maps each [`FunctionKind`] to its handler.
#[derive(Default)]
pub struct FunctionRegistry {
    handlers: HashMap<FunctionKind, Arc<dyn FunctionHandler>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in handler.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ValidateGsmFunction));
        registry
    }

    /// Register a handler. Replaces any existing handler of the same kind.
    pub fn register(&mut self, handler: Box<dyn FunctionHandler>) {
        let handler: Arc<dyn FunctionHandler> = Arc::from(handler);
        self.handlers.insert(handler.kind(), handler);
    }

    pub fn get(&self, kind: FunctionKind) -> Option<&Arc<dyn FunctionHandler>> {
        self.handlers.get(&kind)
    }

    /// Specs for all registered handlers, sorted by name.
    pub fn specs(&self) -> Vec<FunctionSpec> {
        let mut specs: Vec<FunctionSpec> = self.handlers.values().map(|h| h.spec()).collect();
        specs.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    /// Resolve the name and parse the raw argument text.
    pub fn prepare(&self, name: &str, raw_arguments: &str) -> Result<Invocation, DispatchError> {
        let kind = FunctionKind::parse(name)?;
        let handler = self.get(kind).ok_or_else(|| DispatchError::NotRegistered {
            name: name.to_string(),
        })?;

        let malformed = |message: String| DispatchError::MalformedArguments {
            name: name.to_string(),
            message,
        };
        let arguments: Value =
            serde_json::from_str(raw_arguments).map_err(|e| malformed(e.to_string()))?;
        if !arguments.is_object() {
            return Err(malformed("arguments must be a JSON object".to_string()));
        }

        let schema = handler.parameters_schema();
        Ok(Invocation {
            kind,
            arguments: coerce_arguments(&arguments, &schema["properties"]),
        })
    }

    pub fn execute(&self, invocation: &Invocation) -> Result<FunctionOutcome, DispatchError> {
        let handler = self
            .get(invocation.kind)
            .ok_or_else(|| DispatchError::NotRegistered {
                name: invocation.kind.name().to_string(),
            })?;
        handler.call(invocation.arguments.clone())
    }

    /// `prepare` then `execute`.
    pub fn dispatch(&self, name: &str, raw_arguments: &str) -> Result<FunctionOutcome, DispatchError> {
        let invocation = self.prepare(name, raw_arguments)?;
        self.execute(&invocation)
    }
}
