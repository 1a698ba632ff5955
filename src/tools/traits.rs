use crate::engine::ValidationResult;
use crate::error::DispatchError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Description of a callable function for the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// The closed set of functions the model may invoke.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
pub enum FunctionKind {
    #[strum(serialize = "validate_book_gsm")]
    ValidateBookGsm,
}

impl FunctionKind {
    pub const ALL: [FunctionKind; 1] = [FunctionKind::ValidateBookGsm];

    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Reject names outside the closed set at the boundary.
    pub fn parse(name: &str) -> Result<Self, DispatchError> {
        Self::from_str(name).map_err(|_| DispatchError::UnknownFunction {
            name: name.to_string(),
        })
    }
}

/// Typed result of a dispatched function.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionOutcome {
    Validation(ValidationResult),
}

impl FunctionOutcome {
    pub fn kind(&self) -> FunctionKind {
        match self {
            FunctionOutcome::Validation(_) => FunctionKind::ValidateBookGsm,
        }
    }

    /// Machine-readable payload appended to the transcript.
    pub fn payload(&self) -> Value {
        match self {
            FunctionOutcome::Validation(result) => {
                serde_json::to_value(result).unwrap_or(Value::Null)
            }
        }
    }

    pub fn as_validation(&self) -> Option<&ValidationResult> {
        match self {
            FunctionOutcome::Validation(result) => Some(result),
        }
    }
}

/// Deterministic handler behind one [`FunctionKind`].
pub trait FunctionHandler: Send + Sync {
    fn kind(&self) -> FunctionKind;

    fn description(&self) -> &str;

    /// JSON schema for the arguments object.
    fn parameters_schema(&self) -> Value;

    fn call(&self, arguments: Value) -> Result<FunctionOutcome, DispatchError>;

    fn spec(&self) -> FunctionSpec {
        FunctionSpec {
            name: self.kind().name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}
