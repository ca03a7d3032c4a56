//! Shared test doubles for provider-facing modules.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::providers::{
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, TokenUsage,
};

/// One recorded call to [`ScriptedProvider::complete`].
pub(crate) struct RecordedCall {
    pub messages: Vec<ChatMessage>,
    pub config: CompletionConfig,
}

/// Provider that replays canned replies in order and records every call.
///
/// Panics when the script runs out: a test that issues more calls than it
/// scripted is asserting the wrong behaviour.
pub(crate) struct ScriptedProvider {
    script: Mutex<Vec<Result<String, ProviderError>>>,
    recorded: Mutex<Vec<RecordedCall>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script),
            recorded: Mutex::new(Vec::new()),
        }
    }

    /// Convenience constructor for all-success scripts.
    pub fn replies(texts: Vec<&str>) -> Self {
        Self::new(texts.into_iter().map(|t| Ok(t.to_string())).collect())
    }

    pub fn calls(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }

    pub fn config_of_call(&self, index: usize) -> CompletionConfig {
        self.recorded.lock().unwrap()[index].config.clone()
    }

    pub fn messages_of_call(&self, index: usize) -> Vec<ChatMessage> {
        self.recorded.lock().unwrap()[index].messages.clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        self.recorded.lock().unwrap().push(RecordedCall {
            messages,
            config: config.clone(),
        });

        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            panic!("scripted provider ran out of replies");
        }

        script.remove(0).map(|content| CompletionResponse {
            content,
            usage: TokenUsage {
                prompt_tokens: 100,
                completion_tokens: 50,
            },
            model: config.model.clone(),
            stop_reason: Some("stop".to_string()),
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
