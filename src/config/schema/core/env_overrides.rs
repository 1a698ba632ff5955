use super::Config;
use crate::prompt::Language;
use std::str::FromStr;

#[cfg(test)]
pub(super) const ENV_KEYS: [&str; 11] = [
    "GSMCHECK_API_KEY",
    "API_KEY",
    "GSMCHECK_PROVIDER",
    "GSMCHECK_MODEL",
    "GSMCHECK_LANG",
    "GSMCHECK_GATEWAY_HOST",
    "HOST",
    "GSMCHECK_GATEWAY_PORT",
    "PORT",
    "GSMCHECK_TEMPERATURE",
    "OPENAI_API_KEY",
];

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("GSMCHECK_API_KEY").or_else(|_| std::env::var("API_KEY"))
            && !key.is_empty()
        {
            self.api_key = Some(key);
        }

        if let Ok(provider) = std::env::var("GSMCHECK_PROVIDER")
            && !provider.is_empty()
        {
            self.default_provider = Some(provider);
        }

        if let Ok(model) = std::env::var("GSMCHECK_MODEL")
            && !model.is_empty()
        {
            self.default_model = Some(model);
        }

        if let Ok(code) = std::env::var("GSMCHECK_LANG") {
            match Language::from_str(code.trim()) {
                Ok(lang) => self.default_language = lang,
                Err(_) => tracing::warn!(code = code.as_str(), "Ignoring unknown GSMCHECK_LANG"),
            }
        }

        if let Ok(port_str) =
            std::env::var("GSMCHECK_GATEWAY_PORT").or_else(|_| std::env::var("PORT"))
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Ok(host) =
            std::env::var("GSMCHECK_GATEWAY_HOST").or_else(|_| std::env::var("HOST"))
            && !host.is_empty()
        {
            self.gateway.host = host;
        }

        if let Ok(temp_str) = std::env::var("GSMCHECK_TEMPERATURE")
            && let Ok(temp) = temp_str.parse::<f64>()
            && (0.0..=2.0).contains(&temp)
        {
            self.default_temperature = temp;
        }
    }
}
