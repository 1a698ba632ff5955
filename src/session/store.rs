//! In-memory conversation store. Conversations live for the process lifetime
//! at most; idle ones are evicted after a TTL or when capacity is reached.

use super::types::DialogueState;
use crate::config::SessionConfig;
use crate::protocol::ParameterCollector;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Session id used when a client does not send one.
pub const DEFAULT_SESSION_ID: &str = "default";

/// Everything the service remembers about one conversation.
#[derive(Debug, Clone)]
pub struct Conversation {
    pub id: String,
    pub dialogue: DialogueState,
    pub collector: ParameterCollector,
    pub requests: u64,
    pub model_calls: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Snapshot taken before a request mutates the conversation.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    turns: usize,
    collector: ParameterCollector,
}

impl Conversation {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            dialogue: DialogueState::new(),
            collector: ParameterCollector::new(),
            requests: 0,
            model_calls: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            turns: self.dialogue.len(),
            collector: self.collector.clone(),
        }
    }

    /// Undo everything a failed request appended.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.dialogue.truncate(checkpoint.turns);
        self.collector = checkpoint.collector;
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

pub type ConversationHandle = Arc<tokio::sync::Mutex<Conversation>>;

struct Entry {
    handle: ConversationHandle,
    last_access: Instant,
}

/// Conversations keyed by session id.
///
/// The map itself sits behind a short-lived std mutex; each conversation has
/// its own async mutex, so requests within one conversation run one at a time
/// while different conversations proceed concurrently.
pub struct ConversationStore {
    entries: Mutex<HashMap<String, Entry>>,
    max_conversations: usize,
    idle_ttl: Duration,
}

impl ConversationStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_conversations: config.max_conversations.max(1),
            idle_ttl: Duration::from_secs(config.idle_ttl_secs),
        }
    }

    /// Handle to the conversation for `id`, created empty if absent.
    pub fn get_or_create(&self, id: &str) -> ConversationHandle {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = entries.get_mut(id) {
            if now.duration_since(entry.last_access) < self.idle_ttl {
                entry.last_access = now;
                return Arc::clone(&entry.handle);
            }
            tracing::debug!(session = id, "Conversation expired, starting fresh");
            entries.remove(id);
        }

        if entries.len() >= self.max_conversations {
            entries.retain(|_, entry| now.duration_since(entry.last_access) < self.idle_ttl);
        }
        if entries.len() >= self.max_conversations
            && let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_access)
                .map(|(key, _)| key.clone())
        {
            tracing::info!(session = oldest.as_str(), "Evicting least recently used conversation");
            entries.remove(&oldest);
        }

        let handle = Arc::new(tokio::sync::Mutex::new(Conversation::new(id)));
        entries.insert(
            id.to_string(),
            Entry {
                handle: Arc::clone(&handle),
                last_access: now,
            },
        );
        handle
    }

    /// Forget a conversation. Returns whether it existed.
    pub fn reset(&self, id: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop conversations idle for longer than the TTL. Returns how many went.
    pub fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| now.duration_since(entry.last_access) < self.idle_ttl);
        before - entries.len()
    }
}

impl std::fmt::Debug for ConversationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationStore")
            .field("max_conversations", &self.max_conversations)
            .field("idle_ttl", &self.idle_ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::types::Turn;

    fn store(max_conversations: usize, idle_ttl_secs: u64) -> ConversationStore {
        ConversationStore::new(&SessionConfig {
            max_conversations,
            idle_ttl_secs,
        })
    }

    #[tokio::test]
    async fn same_id_shares_conversation() {
        let store = store(10, 3600);
        let first = store.get_or_create("a");
        first.lock().await.dialogue.push(Turn::user("hi")).unwrap();

        let again = store.get_or_create("a");
        assert_eq!(again.lock().await.dialogue.len(), 1);
        assert!(store.get_or_create("b").lock().await.dialogue.is_empty());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn reset_starts_fresh() {
        let store = store(10, 3600);
        store
            .get_or_create(DEFAULT_SESSION_ID)
            .lock()
            .await
            .dialogue
            .push(Turn::user("hi"))
            .unwrap();

        assert!(store.reset(DEFAULT_SESSION_ID));
        assert!(!store.reset(DEFAULT_SESSION_ID));
        let fresh = store.get_or_create(DEFAULT_SESSION_ID);
        assert!(fresh.lock().await.dialogue.is_empty());
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        let store = store(2, 3600);
        for id in ["a", "b", "a", "c"] {
            store.get_or_create(id);
            std::thread::sleep(Duration::from_millis(2));
        }

        assert_eq!(store.len(), 2);
        assert!(store.contains("a"));
        assert!(!store.contains("b"));
        assert!(store.contains("c"));
    }

    #[test]
    fn zero_ttl_expires_everything() {
        let store = store(10, 0);
        store.get_or_create("a");
        assert_eq!(store.evict_idle(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn rollback_restores_dialogue_and_collector() {
        let mut conversation = Conversation::new("a");
        conversation.dialogue.push(Turn::user("hi")).unwrap();
        let checkpoint = conversation.checkpoint();

        conversation.collector.begin();
        conversation.dialogue.push(Turn::user("20 cm")).unwrap();
        conversation.rollback(checkpoint);

        assert_eq!(conversation.dialogue.len(), 1);
        assert_eq!(conversation.collector, ParameterCollector::new());
    }
}
