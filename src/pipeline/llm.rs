//! Completion calls: the seam between the pipeline and the LLM API.
//!
//! The pipeline talks to a [`CompletionProvider`]: system prompt + user
//! prompt in, assistant text out. [`LlmCompletionProvider`] implements it
//! over any `edgequake_llm` provider (OpenAI, Anthropic, Gemini, Ollama,
//! OpenRouter, ...); tests substitute scripted fakes.
//!
//! Failures are never retried here. [`complete_with_timeout`] bounds every
//! call by the configured timeout so a stalled API cannot hang the deck.

use crate::error::ProviderError;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// A single completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: Option<usize>,
    pub temperature: f32,
}

/// Assistant text plus token accounting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    pub text: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl Completion {
    /// A completion with no token accounting.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Anything that turns a prompt into assistant text.
///
/// Implementations must be `Send + Sync`: content requests for different
/// slides run concurrently against the same provider.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError>;
}

/// [`CompletionProvider`] backed by an `edgequake_llm` chat provider.
pub struct LlmCompletionProvider {
    inner: Arc<dyn LLMProvider>,
    name: String,
}

impl LlmCompletionProvider {
    pub fn new(inner: Arc<dyn LLMProvider>, name: impl Into<String>) -> Self {
        Self {
            inner,
            name: name.into(),
        }
    }
}

#[async_trait]
impl CompletionProvider for LlmCompletionProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError> {
        let messages = vec![
            ChatMessage::system(request.system_prompt.as_str()),
            ChatMessage::user(request.user_prompt.as_str()),
        ];
        let options = build_options(request);

        let response = self
            .inner
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| ProviderError::classify(e.to_string()))?;

        Ok(Completion {
            text: response.content,
            input_tokens: response.prompt_tokens,
            output_tokens: response.completion_tokens,
        })
    }
}

/// Build `CompletionOptions` from a request.
fn build_options(request: &CompletionRequest) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(request.temperature),
        max_tokens: request.max_tokens,
        ..Default::default()
    }
}

/// Run one completion, failing with [`ProviderError::Timeout`] after
/// `timeout_secs`.
pub async fn complete_with_timeout(
    provider: &dyn CompletionProvider,
    request: &CompletionRequest,
    timeout_secs: u64,
) -> Result<Completion, ProviderError> {
    let start = Instant::now();
    match tokio::time::timeout(Duration::from_secs(timeout_secs), provider.complete(request)).await
    {
        Ok(Ok(completion)) => {
            debug!(
                "{}: {} input tokens, {} output tokens, {:?}",
                provider.name(),
                completion.input_tokens,
                completion.output_tokens,
                start.elapsed()
            );
            Ok(completion)
        }
        Ok(Err(e)) => {
            warn!("{}: completion failed: {}", provider.name(), e);
            Err(e)
        }
        Err(_) => {
            warn!("{}: no response after {}s", provider.name(), timeout_secs);
            Err(ProviderError::Timeout { secs: timeout_secs })
        }
    }
}
