use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub(in crate::llm) struct ChatRequest {
    pub(in crate::llm) model: String,
    pub(in crate::llm) messages: Vec<Message>,
    pub(in crate::llm) temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(in crate::llm) functions: Option<Vec<FunctionDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(in crate::llm) function_call: Option<&'static str>,
}

/// One chat message. `content` is always serialized, as `null` for an
/// assistant turn that only carries a function call.
#[derive(Debug, Serialize)]
pub(in crate::llm) struct Message {
    pub(in crate::llm) role: &'static str,
    pub(in crate::llm) content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(in crate::llm) name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(in crate::llm) function_call: Option<FunctionCallPayload>,
}

#[derive(Debug, Clone, Serialize)]
pub(in crate::llm) struct FunctionDefinition {
    pub(in crate::llm) name: String,
    pub(in crate::llm) description: String,
    pub(in crate::llm) parameters: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(in crate::llm) struct FunctionCallPayload {
    pub(in crate::llm) name: String,
    pub(in crate::llm) arguments: String,
}

#[derive(Debug, Deserialize)]
pub(in crate::llm) struct ChatResponse {
    pub(in crate::llm) choices: Vec<Choice>,
    pub(in crate::llm) usage: Option<Usage>,
    pub(in crate::llm) model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(in crate::llm) struct Usage {
    pub(in crate::llm) prompt_tokens: u64,
    pub(in crate::llm) completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
pub(in crate::llm) struct Choice {
    pub(in crate::llm) message: ResponseMessage,
    pub(in crate::llm) finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(in crate::llm) struct ResponseMessage {
    pub(in crate::llm) content: Option<String>,
    pub(in crate::llm) function_call: Option<FunctionCallPayload>,
}
