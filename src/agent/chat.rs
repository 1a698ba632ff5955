use crate::engine::ValidationResult;
use crate::error::{GsmError, LlmError};
use crate::llm::{Provider, ProviderMessage, ProviderResponse, sanitize_api_error};
use crate::prompt::{Language, PromptSelector, describe_result};
use crate::protocol::CollectionState;
use crate::session::{Conversation, Turn};
use crate::tools::{FunctionRegistry, FunctionSpec};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_PHASE_TIMEOUT: Duration = Duration::from_secs(90);

/// Where a chat request currently is in its model round trip.
///
/// `AwaitingModel` always runs. `ToolInvoked` and `AwaitingFinalPhrasing`
/// only follow when the model asked for a function, so a request makes at
/// most two model calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum TurnPhase {
    #[strum(serialize = "awaiting model")]
    AwaitingModel,
    #[strum(serialize = "tool invoked")]
    ToolInvoked,
    #[strum(serialize = "awaiting final phrasing")]
    AwaitingFinalPhrasing,
}

/// What one chat request produced.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub validation: Option<ValidationResult>,
    /// Collector state after the turn. The model gathers values itself, so on
    /// this path the collector only marks book boundaries: `Collecting(length)`
    /// while a book is open, `Validated` once its invocation round-tripped.
    pub collection: CollectionState,
    pub model_calls: u32,
    pub tokens_used: Option<u64>,
}

/// Runs one user message through the model and, when asked, the validation
/// function.
pub struct ChatAgent {
    provider: Arc<dyn Provider>,
    registry: Arc<FunctionRegistry>,
    prompts: Arc<PromptSelector>,
    model: String,
    temperature: f64,
    phase_timeout: Duration,
}

#[derive(Default)]
struct Usage {
    calls: u32,
    tokens: Option<u64>,
}

impl Usage {
    fn record(&mut self, response: &ProviderResponse) {
        self.calls += 1;
        if let Some(tokens) = response.total_tokens() {
            self.tokens = Some(self.tokens.unwrap_or(0) + tokens);
        }
    }
}

impl ChatAgent {
    pub fn new(
        provider: Arc<dyn Provider>,
        prompts: Arc<PromptSelector>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            registry: Arc::new(FunctionRegistry::with_defaults()),
            prompts,
            model: model.into(),
            temperature: 0.7,
            phase_timeout: DEFAULT_PHASE_TIMEOUT,
        }
    }

    pub fn with_registry(mut self, registry: Arc<FunctionRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_phase_timeout(mut self, timeout: Duration) -> Self {
        self.phase_timeout = timeout;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn prompts(&self) -> &PromptSelector {
        &self.prompts
    }

    pub async fn warmup(&self) -> anyhow::Result<()> {
        self.provider.warmup().await
    }

    /// Handle one user message. On any failure the conversation is left
    /// exactly as it was before the call.
    pub async fn respond(
        &self,
        conversation: &mut Conversation,
        message: &str,
        lang: Language,
    ) -> Result<TurnOutcome, GsmError> {
        let checkpoint = conversation.checkpoint();
        let mut usage = Usage::default();
        let result = self.run_turn(conversation, message, lang, &mut usage).await;

        conversation.requests += 1;
        conversation.model_calls += u64::from(usage.calls);
        conversation.touch();

        match result {
            Ok((reply, validation)) => Ok(TurnOutcome {
                reply,
                validation,
                collection: conversation.collector.state(),
                model_calls: usage.calls,
                tokens_used: usage.tokens,
            }),
            Err(err) => {
                conversation.rollback(checkpoint);
                tracing::warn!(
                    session = conversation.id.as_str(),
                    error = %err,
                    "Chat turn failed, conversation rolled back"
                );
                Err(err)
            }
        }
    }

    async fn run_turn(
        &self,
        conversation: &mut Conversation,
        message: &str,
        lang: Language,
        usage: &mut Usage,
    ) -> Result<(String, Option<ValidationResult>), GsmError> {
        conversation.dialogue.push(Turn::user(message))?;
        conversation.collector.begin();

        let specs = self.registry.specs();
        let first = self
            .call_model(
                TurnPhase::AwaitingModel,
                self.prompts.system_prompt(lang),
                &conversation.dialogue.to_provider_messages(),
                &specs,
            )
            .await?;
        usage.record(&first);

        let preamble = Some(first.text.trim())
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        let Some((name, raw_arguments)) = first.requested_call() else {
            let reply = preamble.ok_or_else(|| LlmError::EmptyResponse {
                provider: self.provider.name().to_string(),
            })?;
            conversation.dialogue.push(Turn::assistant(reply.clone()))?;
            return Ok((reply, None));
        };

        tracing::info!(
            session = conversation.id.as_str(),
            phase = %TurnPhase::ToolInvoked,
            function = name,
            "Model requested a function"
        );
        let invocation = self.registry.prepare(name, raw_arguments)?;
        if let Some(text) = preamble {
            conversation.dialogue.push(Turn::assistant(text))?;
        }
        conversation.dialogue.push(Turn::FunctionInvocation {
            name: invocation.kind.name().to_string(),
            arguments: invocation.arguments.clone(),
        })?;

        let outcome = self.registry.execute(&invocation)?;
        conversation.dialogue.push(Turn::FunctionResult {
            name: invocation.kind.name().to_string(),
            payload: outcome.payload(),
        })?;
        let validation = outcome.as_validation().cloned();
        if let Some(result) = &validation {
            conversation.collector.load(&result.inputs);
            conversation.collector.mark_validated()?;
            tracing::info!(
                session = conversation.id.as_str(),
                status = %result.status,
                "Validation completed"
            );
        }

        let phrasing_prompt = self.prompts.phrasing_prompt(lang);
        let follow_up = self
            .call_model(
                TurnPhase::AwaitingFinalPhrasing,
                &phrasing_prompt,
                &conversation.dialogue.to_provider_messages(),
                &[],
            )
            .await?;
        usage.record(&follow_up);

        let phrased = follow_up.text.trim();
        let reply = match (&validation, phrased.is_empty()) {
            (_, false) => phrased.to_string(),
            (Some(result), true) => {
                tracing::debug!(
                    session = conversation.id.as_str(),
                    "Empty phrasing reply, using built-in description"
                );
                describe_result(result, lang)
            }
            (None, true) => {
                return Err(LlmError::EmptyResponse {
                    provider: self.provider.name().to_string(),
                }
                .into());
            }
        };
        conversation.dialogue.push(Turn::assistant(reply.clone()))?;
        Ok((reply, validation))
    }

    async fn call_model(
        &self,
        phase: TurnPhase,
        system_prompt: &str,
        messages: &[ProviderMessage],
        functions: &[FunctionSpec],
    ) -> Result<ProviderResponse, LlmError> {
        tracing::debug!(
            %phase,
            provider = self.provider.name(),
            messages = messages.len(),
            functions = functions.len(),
            "Calling model"
        );
        let call = self.provider.chat_with_functions(
            Some(system_prompt),
            messages,
            functions,
            &self.model,
            self.temperature,
        );

        match tokio::time::timeout(self.phase_timeout, call).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(err)) => Err(LlmError::Request {
                provider: self.provider.name().to_string(),
                message: sanitize_api_error(&err.to_string()),
            }),
            Err(_) => Err(LlmError::Timeout {
                phase: phase.to_string(),
                secs: self.phase_timeout.as_secs(),
            }),
        }
    }
}
