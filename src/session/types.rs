use crate::error::SessionError;
use crate::llm::ProviderMessage;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the transcript. Order is significant: the whole sequence is
/// replayed as model context on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Turn {
    User { text: String },
    /// `None` when the model replied with nothing but an invocation.
    Assistant { text: Option<String> },
    FunctionInvocation { name: String, arguments: Value },
    FunctionResult { name: String, payload: Value },
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Turn::User { text: text.into() }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Turn::Assistant {
            text: Some(text.into()),
        }
    }
}

/// Append-only transcript of a conversation.
///
/// Invariant: never holds two `FunctionInvocation` turns without a
/// `FunctionResult` for the same name in between, and never holds a result
/// without its invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialogueState {
    turns: Vec<Turn>,
    pending: Option<String>,
}

impl DialogueState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Name of an invocation still waiting for its result.
    pub fn pending_invocation(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn push(&mut self, turn: Turn) -> Result<(), SessionError> {
        match (&turn, &self.pending) {
            (Turn::FunctionInvocation { .. }, Some(pending)) => {
                return Err(SessionError::PendingInvocation {
                    name: pending.clone(),
                });
            }
            (Turn::FunctionInvocation { name, .. }, None) => {
                self.pending = Some(name.clone());
            }
            (Turn::FunctionResult { name, .. }, Some(pending)) if pending == name => {
                self.pending = None;
            }
            (Turn::FunctionResult { name, .. }, _) => {
                return Err(SessionError::UnmatchedResult { name: name.clone() });
            }
            _ => {}
        }
        self.turns.push(turn);
        Ok(())
    }

    /// Drop every turn after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.turns.truncate(len);
        self.pending = None;
        for turn in &self.turns {
            match turn {
                Turn::FunctionInvocation { name, .. } => self.pending = Some(name.clone()),
                Turn::FunctionResult { .. } => self.pending = None,
                _ => {}
            }
        }
    }

    /// The transcript in provider-neutral form, ready to replay.
    pub fn to_provider_messages(&self) -> Vec<ProviderMessage> {
        self.turns
            .iter()
            .filter_map(|turn| match turn {
                Turn::User { text } => Some(ProviderMessage::user(text.clone())),
                Turn::Assistant { text } => text.as_ref().map(|t| ProviderMessage::assistant(t.clone())),
                Turn::FunctionInvocation { name, arguments } => {
                    Some(ProviderMessage::function_call(name.clone(), arguments.to_string()))
                }
                Turn::FunctionResult { name, payload } => {
                    Some(ProviderMessage::function_result(name.clone(), payload.to_string()))
                }
            })
            .collect()
    }
}
