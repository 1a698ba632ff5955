//! Deterministic functions the model may invoke, behind a closed registry.

pub mod registry;
pub mod traits;
pub mod validate_gsm;

pub use registry::{FunctionRegistry, Invocation};
pub use traits::{FunctionHandler, FunctionKind, FunctionOutcome, FunctionSpec};
pub use validate_gsm::ValidateGsmFunction;
