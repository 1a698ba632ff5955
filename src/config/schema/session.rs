use serde::{Deserialize, Serialize};

/// Limits for the in-memory conversation store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_max_conversations")]
    pub max_conversations: usize,
    /// Conversations idle for this long are forgotten.
    #[serde(default = "default_idle_ttl_secs")]
    pub idle_ttl_secs: u64,
}

fn default_max_conversations() -> usize {
    1000
}

fn default_idle_ttl_secs() -> u64 {
    3600
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_conversations: default_max_conversations(),
            idle_ttl_secs: default_idle_ttl_secs(),
        }
    }
}
