pub mod store;
pub mod types;

pub use store::{
    Checkpoint, Conversation, ConversationHandle, ConversationStore, DEFAULT_SESSION_ID,
};
pub use types::{DialogueState, Turn};
