use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    /// A structured invocation emitted by the model. `arguments` is the raw
    /// JSON text exactly as the provider sent it.
    FunctionCall {
        name: String,
        arguments: String,
    },
    FunctionResult {
        name: String,
        content: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Function,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMessage {
    pub role: MessageRole,
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    FunctionCall,
    MaxTokens,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub text: String,
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
    pub model: Option<String>,
    pub content_blocks: Vec<ContentBlock>,
    pub stop_reason: Option<StopReason>,
}

impl ProviderResponse {
    pub fn text_only(text: String) -> Self {
        Self {
            text,
            input_tokens: None,
            output_tokens: None,
            model: None,
            content_blocks: vec![],
            stop_reason: None,
        }
    }

    pub fn with_usage(text: String, input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens: Some(input_tokens),
            output_tokens: Some(output_tokens),
            ..Self::text_only(text)
        }
    }

    /// A reply that asks for `name` to be invoked with `arguments`.
    pub fn function_call(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            content_blocks: vec![ContentBlock::FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            }],
            stop_reason: Some(StopReason::FunctionCall),
            ..Self::text_only(String::new())
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn total_tokens(&self) -> Option<u64> {
        match (self.input_tokens, self.output_tokens) {
            (Some(input), Some(output)) => Some(input + output),
            _ => None,
        }
    }

    /// The first function invocation in the reply, as `(name, raw arguments)`.
    pub fn requested_call(&self) -> Option<(&str, &str)> {
        self.content_blocks.iter().find_map(|block| match block {
            ContentBlock::FunctionCall { name, arguments } => {
                Some((name.as_str(), arguments.as_str()))
            }
            _ => None,
        })
    }

    pub fn has_function_call(&self) -> bool {
        self.requested_call().is_some()
    }
}

impl ProviderMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    pub fn function_call(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: vec![ContentBlock::FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            }],
        }
    }

    pub fn function_result(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Function,
            content: vec![ContentBlock::FunctionResult {
                name: name.into(),
                content: content.into(),
            }],
        }
    }

    /// Concatenated text blocks, if any.
    pub fn text(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        (!parts.is_empty()).then(|| parts.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::{ContentBlock, MessageRole, ProviderMessage, ProviderResponse, StopReason};

    #[test]
    fn content_block_serde_round_trip() {
        let value = serde_json::json!({
            "type": "function_call",
            "name": "validate_book_gsm",
            "arguments": "{\"length\":20}"
        });
        let block: ContentBlock = serde_json::from_value(value.clone()).unwrap();
        let serialized = serde_json::to_value(&block).unwrap();
        assert_eq!(serialized, value);
    }

    #[test]
    fn provider_message_user_constructor() {
        let message = ProviderMessage::user("hello");
        assert_eq!(message.role, MessageRole::User);
        assert_eq!(message.text().as_deref(), Some("hello"));
    }

    #[test]
    fn function_result_uses_function_role() {
        let message = ProviderMessage::function_result("validate_book_gsm", "{}");
        assert_eq!(message.role, MessageRole::Function);
        assert!(message.text().is_none());
    }

    #[test]
    fn requested_call_finds_invocation() {
        let with = ProviderResponse::function_call("validate_book_gsm", "{}");
        let without = ProviderResponse::text_only("done".into());
        assert_eq!(with.requested_call(), Some(("validate_book_gsm", "{}")));
        assert_eq!(with.stop_reason, Some(StopReason::FunctionCall));
        assert!(!without.has_function_call());
    }

    #[test]
    fn text_only_and_with_usage() {
        let text_only = ProviderResponse::text_only("hello".into());
        assert_eq!(text_only.total_tokens(), None);
        let with_usage = ProviderResponse::with_usage("hello".into(), 10, 20);
        assert_eq!(with_usage.total_tokens(), Some(30));
    }
}
