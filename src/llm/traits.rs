use super::types::{ProviderMessage, ProviderResponse};
use crate::tools::FunctionSpec;
use std::future::Future;
use std::pin::Pin;

pub trait Provider: Send + Sync {
    /// Provider identifier (e.g. "openai", "custom:http://localhost:8080").
    fn name(&self) -> &str;

    /// Send the transcript and, when `functions` is non-empty, let the model
    /// decide whether to request one of them.
    fn chat_with_functions<'a>(
        &'a self,
        system_prompt: Option<&'a str>,
        messages: &'a [ProviderMessage],
        functions: &'a [FunctionSpec],
        model: &'a str,
        temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderResponse>> + Send + 'a>>;

    /// Plain completion without function definitions.
    fn chat<'a>(
        &'a self,
        system_prompt: Option<&'a str>,
        messages: &'a [ProviderMessage],
        model: &'a str,
        temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderResponse>> + Send + 'a>> {
        self.chat_with_functions(system_prompt, messages, &[], model, temperature)
    }

    /// Warm up the HTTP connection pool.
    fn warmup(&self) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + '_>> {
        Box::pin(async move { Ok(()) })
    }
}
