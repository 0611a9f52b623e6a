use crate::config::Config;
use crate::llm::errors::{describe_status, CompletionError};
use crate::llm::transport::{ChatTransport, HttpTransport, Sleeper, TokioSleeper};
use crate::llm::types::{CompletionResult, LLMRequest, LLMResponse, Message};
use crate::logging::preview;
use crate::prompts::PromptRequest;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Sends prompts to the chat-completions endpoint with bounded retries.
///
/// Holds no per-request state, so one instance can be shared across views.
pub struct CompletionClient {
    transport: Arc<dyn ChatTransport>,
    sleeper: Arc<dyn Sleeper>,
    model: String,
    max_tokens: u32,
    temperature: f32,
    max_attempts: u32,
    retry_delay: Duration,
}

impl CompletionClient {
    /// Client over real HTTP, configured from `config`.
    pub fn from_config(config: &Config) -> Result<Self, CompletionError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), config))
    }

    pub fn new(transport: Arc<dyn ChatTransport>, config: &Config) -> Self {
        Self {
            transport,
            sleeper: Arc::new(TokioSleeper),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            max_attempts: config.max_attempts.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn build_request(&self, prompt: &str) -> LLMRequest {
        LLMRequest {
            model: self.model.clone(),
            messages: vec![Message::user(prompt)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Builds the task prompt and completes it.
    pub async fn generate(
        &self,
        request: &PromptRequest,
    ) -> Result<CompletionResult, CompletionError> {
        let prompt = request.build();
        let text = self.complete(&prompt).await?;
        Ok(CompletionResult {
            text,
            task: request.task(),
        })
    }

    /// Sends `prompt` as a single user message and returns the first choice's
    /// content.
    ///
    /// Waits `attempt * retry_delay` between attempts. A success status with
    /// an unusable body fails immediately.
    #[instrument(skip(self, prompt), fields(request_id = %Uuid::new_v4(), prompt_chars = prompt.len()))]
    pub async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = self.build_request(prompt);
        debug!(model = %self.model, prompt = %preview(prompt, 100), "Sending completion request");

        let mut last_error: Option<CompletionError> = None;

        for attempt in 1..=self.max_attempts {
            match self.attempt(&request).await {
                Ok(content) => {
                    info!(attempt, response_chars = content.len(), "Completion succeeded");
                    return Ok(content);
                }
                Err(e) if !e.is_retryable() => {
                    error!(attempt, error = %e, "Completion returned an unusable response");
                    return Err(e);
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Completion attempt failed"
                    );
                    if attempt < self.max_attempts {
                        self.sleeper.sleep(self.retry_delay * attempt).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        let (last_status, detail) = match last_error {
            Some(e) => (e.status(), e.to_string()),
            None => (None, "no attempt was made".to_string()),
        };
        error!(attempts = self.max_attempts, ?last_status, "All completion attempts failed");

        Err(CompletionError::Exhausted {
            attempts: self.max_attempts,
            last_status,
            detail,
        })
    }

    async fn attempt(&self, request: &LLMRequest) -> Result<String, CompletionError> {
        let response = self.transport.post(request).await?;

        if !response.is_success() {
            debug!(
                status = response.status,
                reason = describe_status(response.status),
                "Completion endpoint rejected the request"
            );
            return Err(CompletionError::HttpStatus {
                status: response.status,
                body: response.body,
            });
        }

        parse_completion(&response.body)
    }
}

/// Extracts `choices[0].message.content` from a success body.
pub fn parse_completion(body: &str) -> Result<String, CompletionError> {
    let parsed: LLMResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::Format(format!("body is not valid JSON: {}", e)))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| CompletionError::Format("missing choices[0].message.content".to_string()))
}
