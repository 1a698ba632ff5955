use super::super::{GatewayConfig, SessionConfig};
use crate::error::ConfigError;
use crate::prompt::Language;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    pub api_key: Option<String>,
    pub default_provider: Option<String>,
    pub default_model: Option<String>,
    pub default_temperature: f64,

    /// Language used when a request does not name one it understands.
    #[serde(default)]
    pub default_language: Language,

    #[serde(default)]
    pub reliability: ReliabilityConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReliabilityConfig {
    #[serde(default = "default_provider_retries")]
    pub provider_retries: u32,
    #[serde(default = "default_provider_backoff_ms")]
    pub provider_backoff_ms: u64,
    /// Timeout of a single HTTP attempt against a provider.
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,
    /// Budget for one model phase of a chat turn, retries included.
    #[serde(default = "default_phase_timeout_secs")]
    pub phase_timeout_secs: u64,
    #[serde(default)]
    pub fallback_providers: Vec<String>,
}

fn default_provider_retries() -> u32 {
    2
}

fn default_provider_backoff_ms() -> u64 {
    500
}

fn default_provider_timeout_secs() -> u64 {
    30
}

fn default_phase_timeout_secs() -> u64 {
    90
}

impl Default for ReliabilityConfig {
    fn default() -> Self {
        Self {
            provider_retries: default_provider_retries(),
            provider_backoff_ms: default_provider_backoff_ms(),
            provider_timeout_secs: default_provider_timeout_secs(),
            phase_timeout_secs: default_phase_timeout_secs(),
            fallback_providers: Vec::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());

        Self {
            config_path: home.join(".gsmcheck").join("config.toml"),
            api_key: None,
            default_provider: Some("openai".to_string()),
            default_model: Some("gpt-3.5-turbo".to_string()),
            default_temperature: 0.7,
            default_language: Language::En,
            reliability: ReliabilityConfig::default(),
            gateway: GatewayConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    pub fn provider_name(&self) -> &str {
        self.default_provider.as_deref().unwrap_or("openai")
    }

    pub fn model_name(&self) -> &str {
        self.default_model.as_deref().unwrap_or("gpt-3.5-turbo")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| Err(ConfigError::Validation(message));

        if !(0.0..=2.0).contains(&self.default_temperature) {
            return invalid(format!(
                "default_temperature must be within 0.0..=2.0 (got {})",
                self.default_temperature
            ));
        }
        if self.gateway.port == 0 {
            return invalid("gateway.port must not be 0".into());
        }
        if self.gateway.request_timeout_secs == 0 {
            return invalid("gateway.request_timeout_secs must be greater than 0".into());
        }
        let reliability = &self.reliability;
        if reliability.provider_timeout_secs == 0 || reliability.phase_timeout_secs == 0 {
            return invalid("reliability timeouts must be greater than 0".into());
        }
        if reliability.phase_timeout_secs < reliability.provider_timeout_secs {
            return invalid(format!(
                "reliability.phase_timeout_secs ({}) is shorter than provider_timeout_secs ({})",
                reliability.phase_timeout_secs, reliability.provider_timeout_secs
            ));
        }
        if self.session.max_conversations == 0 {
            return invalid("session.max_conversations must be greater than 0".into());
        }
        Ok(())
    }
}
