use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `gsmcheck`.
///
/// Each subsystem defines its own error variant. Callers match on these to
/// decide how a failure is surfaced (HTTP status, apology text, CLI exit);
/// internal plumbing continues to use `anyhow::Result` for context chains.
#[derive(Debug, Error)]
pub enum GsmError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── LLM / Provider ──────────────────────────────────────────────────
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    // ── Function dispatch ───────────────────────────────────────────────
    #[error("dispatch: {0}")]
    Dispatch(#[from] DispatchError),

    // ── Conversation state ──────────────────────────────────────────────
    #[error("session: {0}")]
    Session(#[from] SessionError),

    // ── Prompt / Template ───────────────────────────────────────────────
    #[error("prompt: {0}")]
    Prompt(#[from] PromptError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── LLM / Provider errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider {provider} request failed: {message}")]
    Request { provider: String, message: String },

    #[error("model call timed out after {secs}s while {phase}")]
    Timeout { phase: String, secs: u64 },

    #[error("provider {provider} returned an empty reply")]
    EmptyResponse { provider: String },

    #[error("{provider} API key not set. Set OPENAI_API_KEY or edit config.toml.")]
    MissingApiKey { provider: String },
}

// ─── Dispatch errors ────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown function {name}")]
    UnknownFunction { name: String },

    #[error("function {name} is not registered")]
    NotRegistered { name: String },

    #[error("malformed arguments for {name}: {message}")]
    MalformedArguments { name: String, message: String },
}

// ─── Session errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("function {name} was invoked again before its result was recorded")]
    PendingInvocation { name: String },

    #[error("function result for {name} has no matching invocation")]
    UnmatchedResult { name: String },

    #[error("parameter {got} supplied while collecting {expected}")]
    OutOfOrder { expected: String, got: String },

    #[error("parameter {name} is not a finite number")]
    InvalidValue { name: String },

    #[error("no parameter is expected in state {state}")]
    NotCollecting { state: String },
}

// ─── Prompt / Template errors ───────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("template render failed: {0}")]
    Render(String),

    #[error("template registration failed: {0}")]
    Register(String),
}

// ─── Engine errors ──────────────────────────────────────────────────────────

/// Contract violations detected by the validation engine.
///
/// These never leave the engine: they are folded into a result with
/// `status = ERROR` so the conversation can continue.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("text page count must be greater than zero")]
    ZeroPages,

    #[error("{name} must be greater than zero (got {value})")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must not be negative (got {value})")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} is not a finite number")]
    NonFinite { name: &'static str },

    #[error("calculation produced a non-finite {quantity}")]
    Overflow { quantity: &'static str },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, GsmError>;
