use super::openai::OpenAiProvider;
use super::reliable::{ReliableProvider, RetryPolicy};
use super::traits::Provider;
use crate::config::ReliabilityConfig;

/// Resolve the API key for a provider.
///
/// Resolution order:
/// 1. Explicitly provided `api_key` (trimmed, ignored if empty)
/// 2. `OPENAI_API_KEY` for the `openai` provider
/// 3. Generic fallback variables (`GSMCHECK_API_KEY`, `API_KEY`)
pub fn resolve_api_key(name: &str, explicit_api_key: Option<&str>) -> Option<String> {
    if let Some(key) = explicit_api_key.map(str::trim).filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }

    let provider_env_candidates: &[&str] = match name {
        "openai" => &["OPENAI_API_KEY"],
        _ => &[],
    };

    provider_env_candidates
        .iter()
        .chain(["GSMCHECK_API_KEY", "API_KEY"].iter())
        .find_map(|env_var| {
            std::env::var(env_var)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        })
}

/// Create a boxed [`Provider`] by name.
///
/// - `"openai"`: the hosted chat-completion API
/// - `"custom:<base_url>"`: any endpoint speaking the same wire format
pub fn create_provider(
    name: &str,
    api_key: Option<&str>,
    timeout_secs: u64,
) -> anyhow::Result<Box<dyn Provider>> {
    let resolved_key = resolve_api_key(name, api_key);
    let api_key = resolved_key.as_deref();

    if name == "openai" {
        return Ok(Box::new(OpenAiProvider::with_timeout(api_key, timeout_secs)));
    }

    if let Some(base_url) = name.strip_prefix("custom:") {
        if base_url.is_empty() {
            anyhow::bail!("Custom provider requires a URL. Format: custom:https://your-api.com");
        }
        return Ok(Box::new(OpenAiProvider::compatible(
            name,
            base_url,
            api_key,
            timeout_secs,
        )));
    }

    anyhow::bail!(
        "Unknown provider: {name}. Supported: \"openai\".\n\
         Tip: Use \"custom:https://your-api.com\" for OpenAI-compatible endpoints."
    )
}

/// Primary provider plus configured fallbacks, wrapped in retry/fallback.
pub fn create_resilient_provider(
    primary_name: &str,
    api_key: Option<&str>,
    reliability: &ReliabilityConfig,
) -> anyhow::Result<Box<dyn Provider>> {
    let timeout = reliability.provider_timeout_secs;
    let mut providers: Vec<(String, Box<dyn Provider>)> =
        Vec::with_capacity(1 + reliability.fallback_providers.len());

    providers.push((
        primary_name.to_string(),
        create_provider(primary_name, api_key, timeout)?,
    ));

    for fallback in &reliability.fallback_providers {
        if providers.iter().any(|(name, _)| name == fallback) {
            continue;
        }

        // The configured key belongs to the primary; fallbacks use their own env keys.
        match create_provider(fallback, None, timeout) {
            Ok(provider) => providers.push((fallback.clone(), provider)),
            Err(e) => {
                tracing::warn!(
                    fallback_provider = fallback.as_str(),
                    "Ignoring invalid fallback provider: {e}"
                );
            }
        }
    }

    Ok(Box::new(ReliableProvider::new(
        providers,
        RetryPolicy::from(reliability),
    )))
}
