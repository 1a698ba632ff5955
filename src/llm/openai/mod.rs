pub(super) mod types;

use super::http_client::build_provider_client_with_timeout;
use super::scrub::{api_error, scrub_secret_patterns};
use super::traits::Provider;
use super::types::{ContentBlock, MessageRole, ProviderMessage, ProviderResponse, StopReason};
use crate::error::LlmError;
use crate::tools::FunctionSpec;
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;
use types::{
    ChatRequest, ChatResponse, FunctionCallPayload, FunctionDefinition, Message, Usage,
};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Chat-completion client speaking the function-calling wire format
/// (`functions`, `function_call: "auto"`, `role: "function"` results).
pub struct OpenAiProvider {
    name: String,
    chat_url: String,
    /// Pre-computed `"Bearer <key>"` header value.
    cached_auth_header: Option<String>,
    /// The hosted API refuses anonymous calls; compatible endpoints may not.
    requires_api_key: bool,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(api_key: Option<&str>) -> Self {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(api_key: Option<&str>, timeout_secs: u64) -> Self {
        Self {
            name: "openai".to_string(),
            chat_url: chat_completions_url(OPENAI_BASE_URL),
            cached_auth_header: api_key.map(|k| format!("Bearer {k}")),
            requires_api_key: true,
            client: build_provider_client_with_timeout(timeout_secs),
        }
    }

    /// An OpenAI-compatible endpoint, e.g. a local proxy.
    pub fn compatible(
        name: &str,
        base_url: &str,
        api_key: Option<&str>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            name: name.to_string(),
            chat_url: chat_completions_url(base_url),
            cached_auth_header: api_key.map(|k| format!("Bearer {k}")),
            requires_api_key: false,
            client: build_provider_client_with_timeout(timeout_secs),
        }
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    async fn call_api(&self, request: &ChatRequest) -> anyhow::Result<ChatResponse> {
        let mut request_builder = self.client.post(&self.chat_url).json(request);
        match &self.cached_auth_header {
            Some(header) => request_builder = request_builder.header("Authorization", header),
            None if self.requires_api_key => {
                return Err(LlmError::MissingApiKey {
                    provider: self.name.clone(),
                }
                .into());
            }
            None => {}
        }

        let response = request_builder
            .send()
            .await
            .map_err(|error| anyhow::anyhow!("{} request failed: {error}", self.name))?;

        if !response.status().is_success() {
            return Err(api_error(&self.name, response).await);
        }

        response
            .json()
            .await
            .map_err(|error| anyhow::anyhow!("{} response JSON decode failed: {error}", self.name))
    }
}

/// Accepts a bare host (`https://api.openai.com`), a `/v1` base, or a full
/// chat-completions URL.
pub fn chat_completions_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with("/chat/completions") {
        base.to_string()
    } else if base.ends_with("/v1") {
        format!("{base}/chat/completions")
    } else {
        format!("{base}/v1/chat/completions")
    }
}

fn text_message(role: &'static str, content: String) -> Message {
    Message {
        role,
        content: Some(content),
        name: None,
        function_call: None,
    }
}

fn map_provider_message(provider_message: &ProviderMessage) -> Vec<Message> {
    let mut text_parts = Vec::new();
    let mut function_call = None;
    let mut function_results = Vec::new();

    for block in &provider_message.content {
        match block {
            ContentBlock::Text { text } => {
                text_parts.push(scrub_secret_patterns(text).into_owned());
            }
            ContentBlock::FunctionCall { name, arguments } => {
                function_call = Some(FunctionCallPayload {
                    name: name.clone(),
                    arguments: arguments.clone(),
                });
            }
            ContentBlock::FunctionResult { name, content } => {
                function_results.push(Message {
                    role: "function",
                    content: Some(content.clone()),
                    name: Some(name.clone()),
                    function_call: None,
                });
            }
        }
    }

    let text_content = (!text_parts.is_empty()).then(|| text_parts.join("\n"));
    let mut messages = Vec::new();

    match provider_message.role {
        MessageRole::Assistant => {
            if text_content.is_some() || function_call.is_some() {
                messages.push(Message {
                    role: "assistant",
                    content: text_content,
                    name: None,
                    function_call,
                });
            }
        }
        MessageRole::User => {
            if let Some(content) = text_content {
                messages.push(text_message("user", content));
            }
        }
        MessageRole::System => {
            if let Some(content) = text_content {
                messages.push(text_message("system", content));
            }
        }
        MessageRole::Function => {}
    }

    messages.extend(function_results);
    messages
}

fn build_request(
    system_prompt: Option<&str>,
    messages: &[ProviderMessage],
    functions: &[FunctionSpec],
    model: &str,
    temperature: f64,
) -> ChatRequest {
    let mut wire_messages = Vec::with_capacity(messages.len() + 1);
    if let Some(sys) = system_prompt {
        wire_messages.push(text_message("system", sys.to_string()));
    }
    for message in messages {
        wire_messages.extend(map_provider_message(message));
    }

    let functions: Option<Vec<FunctionDefinition>> = (!functions.is_empty()).then(|| {
        functions
            .iter()
            .map(|spec| FunctionDefinition {
                name: spec.name.clone(),
                description: spec.description.clone(),
                parameters: spec.parameters.clone(),
            })
            .collect()
    });
    let function_call = functions.as_ref().map(|_| "auto");

    ChatRequest {
        model: model.to_string(),
        messages: wire_messages,
        temperature,
        functions,
        function_call,
    }
}

fn map_finish_reason(finish_reason: Option<&str>) -> StopReason {
    match finish_reason {
        Some("stop") => StopReason::EndTurn,
        Some("function_call" | "tool_calls") => StopReason::FunctionCall,
        Some("length") => StopReason::MaxTokens,
        Some(_) | None => StopReason::Error,
    }
}

fn provider_response_with_usage(text: String, usage: Option<&Usage>) -> ProviderResponse {
    if let Some(usage) = usage {
        ProviderResponse::with_usage(text, usage.prompt_tokens, usage.completion_tokens)
    } else {
        ProviderResponse::text_only(text)
    }
}

fn build_provider_response(
    chat_response: ChatResponse,
    provider_name: &str,
) -> anyhow::Result<ProviderResponse> {
    let choice = chat_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("No response from {provider_name}"))?;

    let text = choice.message.content.unwrap_or_default();
    let scrubbed_text = scrub_secret_patterns(&text).into_owned();

    let mut content_blocks = Vec::new();
    if !scrubbed_text.is_empty() {
        content_blocks.push(ContentBlock::Text {
            text: scrubbed_text.clone(),
        });
    }
    if let Some(call) = choice.message.function_call {
        content_blocks.push(ContentBlock::FunctionCall {
            name: call.name,
            arguments: call.arguments,
        });
    }

    let mut provider_response =
        provider_response_with_usage(scrubbed_text, chat_response.usage.as_ref());
    provider_response.content_blocks = content_blocks;
    provider_response.stop_reason = Some(map_finish_reason(choice.finish_reason.as_deref()));
    if let Some(api_model) = chat_response.model {
        provider_response = provider_response.with_model(api_model);
    }
    Ok(provider_response)
}

impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.name
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
            let request = build_request(system_prompt, messages, functions, model, temperature);
            let chat_response = self.call_api(&request).await?;
            build_provider_response(chat_response, &self.name)
        })
    }

    fn warmup(&self) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + '_>> {
        Box::pin(async move {
            // Any response, even 404, means the connection pool is primed.
            let base = self.chat_url.trim_end_matches("/chat/completions");
            self.client.get(base).send().await?;
            Ok(())
        })
    }
}
