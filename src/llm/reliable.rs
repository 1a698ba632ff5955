use super::traits::Provider;
use super::types::{ProviderMessage, ProviderResponse};
use crate::config::ReliabilityConfig;
use crate::error::LlmError;
use crate::tools::FunctionSpec;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// How often a single provider is retried and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub base_backoff: Duration,
}

impl From<&ReliabilityConfig> for RetryPolicy {
    fn from(config: &ReliabilityConfig) -> Self {
        Self {
            retries: config.provider_retries,
            base_backoff: Duration::from_millis(config.provider_backoff_ms),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (zero-based), doubling each time.
    pub fn backoff(&self, retry: u32) -> Duration {
        self.base_backoff
            .saturating_mul(2_u32.saturating_pow(retry))
            .min(MAX_BACKOFF)
    }

    fn attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

/// Whether another attempt against the same provider can help.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    Transient,
    Permanent,
}

/// Status code from an error built by `api_error`: `"<name> API error (<status>): ..."`.
fn upstream_status(message: &str) -> Option<u16> {
    let (_, rest) = message.split_once("API error (")?;
    rest.split(|c: char| !c.is_ascii_digit()).next()?.parse().ok()
}

fn classify(err: &anyhow::Error) -> Failure {
    if matches!(
        err.downcast_ref::<LlmError>(),
        Some(LlmError::MissingApiKey { .. })
    ) {
        return Failure::Permanent;
    }

    let message = err.to_string();
    let lower = message.to_ascii_lowercase();
    if lower.contains("insufficient_quota") || lower.contains("exceeded your current quota") {
        return Failure::Permanent;
    }

    match upstream_status(&message) {
        // Rate limits and request timeouts clear up on their own.
        Some(408 | 429) => Failure::Transient,
        Some(code) if (400..500).contains(&code) => Failure::Permanent,
        _ => Failure::Transient,
    }
}

/// Chat-completion provider chain: each entry is retried per the policy,
/// then the next one is tried in order.
pub struct ReliableProvider {
    providers: Vec<(String, Box<dyn Provider>)>,
    policy: RetryPolicy,
}

impl ReliableProvider {
    pub fn new(providers: Vec<(String, Box<dyn Provider>)>, policy: RetryPolicy) -> Self {
        Self { providers, policy }
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl Provider for ReliableProvider {
    fn name(&self) -> &str {
        self.providers
            .first()
            .map_or("reliable", |(name, _)| name.as_str())
    }

    fn warmup(&self) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + '_>> {
        Box::pin(async move {
            for (name, provider) in &self.providers {
                if let Err(e) = provider.warmup().await {
                    tracing::warn!(provider = name.as_str(), "Warmup failed (non-fatal): {e}");
                }
            }
            Ok(())
        })
    }

    fn chat_with_functions<'a>(
        &'a self,
        system_prompt: Option<&'a str>,
        messages: &'a [ProviderMessage],
        functions: &'a [FunctionSpec],
        model: &'a str,
        temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderResponse>> + Send + 'a>> {
        Box::pin(async move {
            let attempts = self.policy.attempts();
            let mut failures = Vec::new();

            for (name, provider) in &self.providers {
                for attempt in 1..=attempts {
                    let err = match provider
                        .chat_with_functions(system_prompt, messages, functions, model, temperature)
                        .await
                    {
                        Ok(response) => {
                            if attempt > 1 {
                                tracing::info!(provider = name.as_str(), attempt, "Provider recovered");
                            }
                            return Ok(response);
                        }
                        Err(err) => err,
                    };

                    failures.push(format!("{name} attempt {attempt}/{attempts}: {err}"));
                    if classify(&err) == Failure::Permanent {
                        tracing::warn!(provider = name.as_str(), "Permanent provider error: {err}");
                        break;
                    }
                    if attempt < attempts {
                        let delay = self.policy.backoff(attempt - 1);
                        tracing::warn!(
                            provider = name.as_str(),
                            attempt,
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            "Provider call failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
            }

            anyhow::bail!("All providers failed. Attempts:\n{}", failures.join("\n"))
        })
    }
}
