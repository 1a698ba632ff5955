//! Scripted provider for unit tests: replays canned replies in order and
//! records what it was asked.

use super::traits::Provider;
use super::types::{ProviderMessage, ProviderResponse};
use crate::tools::FunctionSpec;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system_prompt: Option<String>,
    pub messages: Vec<ProviderMessage>,
    pub function_names: Vec<String>,
}

pub struct ScriptedProvider {
    replies: Mutex<VecDeque<anyhow::Result<ProviderResponse>>>,
    calls: Mutex<Vec<RecordedCall>>,
    delay: Option<Duration>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<anyhow::Result<ProviderResponse>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Sleep before every reply.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn chat_with_functions<'a>(
        &'a self,
        system_prompt: Option<&'a str>,
        messages: &'a [ProviderMessage],
        functions: &'a [FunctionSpec],
        _model: &'a str,
        _temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderResponse>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(RecordedCall {
                system_prompt: system_prompt.map(str::to_string),
                messages: messages.to_vec(),
                function_names: functions.iter().map(|f| f.name.clone()).collect(),
            });
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("script exhausted")))
        })
    }
}
