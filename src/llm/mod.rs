// ── Infrastructure ───────────────────────────────────────────────────────────
pub mod coercion;
pub mod http_client;
#[cfg(test)]
pub mod mock;
pub mod scrub;
pub mod traits;
pub mod types;

// ── Decorator layers ────────────────────────────────────────────────────────
pub mod factory;
pub mod reliable;

// ── Provider implementations ────────────────────────────────────────────────
pub mod openai;

// ── Re-exports ──────────────────────────────────────────────────────────────
pub use coercion::{coerce_arguments, coerce_value};
pub use factory::{create_provider, create_resilient_provider, resolve_api_key};
pub use http_client::build_provider_client_with_timeout;
pub use openai::OpenAiProvider;
pub use reliable::{ReliableProvider, RetryPolicy};
pub use scrub::{api_error, sanitize_api_error, scrub_secret_patterns};
pub use traits::Provider;
pub use types::{ContentBlock, MessageRole, ProviderMessage, ProviderResponse, StopReason};
