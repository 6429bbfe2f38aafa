//! OpenAI-Compatible LLM Provider
//!
//! Implementation of `LlmProvider` against any chat-completions API that
//! speaks the OpenAI wire format (OpenRouter, OpenAI, vLLM, LiteLLM, ...).
//! The hosted endpoint, model, and key come from the environment.

use std::collections::VecDeque;
use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    message::{Message, Role},
    provider::{
        Completion, CompletionStream, FinishReason, GenerationOptions, LlmProvider, StreamChunk,
        TokenUsage,
    },
};
use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

/// OpenAI-compatible provider configuration
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    /// API base URL, e.g. `https://openrouter.ai/api/v1`
    pub base_url: String,

    /// Bearer token for the API (may be empty for unauthenticated gateways)
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".into(),
            api_key: String::new(),
            timeout_secs: 120,
        }
    }
}

impl OpenAiConfig {
    /// Read `LLM_BASE_URL` and `LLM_API_KEY` from the environment
    pub fn from_env() -> Self {
        let base_url = std::env::var("LLM_BASE_URL")
            .unwrap_or_else(|_| "https://openrouter.ai/api/v1".into());
        let api_key = std::env::var("LLM_API_KEY").unwrap_or_default();

        Self {
            base_url,
            api_key,
            ..Default::default()
        }
    }
}

/// OpenAI-compatible LLM provider
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Create from configuration
    pub fn from_config(config: OpenAiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self { client, config }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_config(OpenAiConfig::from_env())
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.config.api_key.is_empty() {
            request
        } else {
            request.bearer_auth(&self.config.api_key)
        }
    }

    /// Convert agent messages to the OpenAI wire format
    fn convert_messages(messages: &[Message]) -> Vec<WireMessage> {
        messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                    // Tool results ride as user context; the tool protocol
                    // lives in the prompt, not in native function calling
                    Role::Tool => "user",
                };
                WireMessage {
                    role: role.into(),
                    content: m.content.clone(),
                }
            })
            .collect()
    }

    fn build_request(
        messages: &[Message],
        options: &GenerationOptions,
        stream: bool,
    ) -> ChatRequest {
        ChatRequest {
            model: options.model.clone(),
            messages: Self::convert_messages(messages),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            stream,
        }
    }

    async fn error_from_response(response: reqwest::Response) -> AgentError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => AgentError::Auth(format!("HTTP {}: {}", status, body)),
            429 => AgentError::RateLimited(body),
            500..=599 => AgentError::ProviderUnavailable(format!("HTTP {}: {}", status, body)),
            _ => AgentError::Provider(format!("HTTP {}: {}", status, body)),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.config.base_url.trim_end_matches('/'));
        let request = self.apply_auth(self.client.get(&url));

        match request.send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                tracing::warn!("Provider health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let body = Self::build_request(messages, options, false);
        let request = self.apply_auth(self.client.post(self.chat_url()).json(&body));

        let response = request
            .send()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Provider(format!("malformed response: {}", e)))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Provider("response contained no choices".into()))?;

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            model: parsed.model.unwrap_or_else(|| options.model.clone()),
            usage: parsed.usage.map(Into::into),
            finish_reason: choice.finish_reason.as_deref().map(convert_finish_reason),
        })
    }

    async fn complete_stream(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<CompletionStream> {
        let body = Self::build_request(messages, options, true);
        let request = self.apply_auth(self.client.post(self.chat_url()).json(&body));

        let response = request
            .send()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        // Incrementally reassemble SSE lines from the byte stream; a single
        // network read may hold several `data:` lines or half of one.
        let stream = futures::stream::unfold(
            SseDecoder::new(Box::pin(response.bytes_stream())),
            |mut decoder| async move {
                let item = decoder.next_chunk().await;
                item.map(|chunk| (chunk, decoder))
            },
        );

        Ok(Box::pin(stream))
    }
}

/// Stateful decoder turning raw SSE bytes into `StreamChunk`s
struct SseDecoder<S> {
    inner: S,
    buffer: String,
    pending: VecDeque<StreamChunk>,
    finished: bool,
}

impl<S> SseDecoder<S>
where
    S: futures::Stream<Item = reqwest::Result<bytes::Bytes>> + Unpin,
{
    fn new(inner: S) -> Self {
        Self {
            inner,
            buffer: String::new(),
            pending: VecDeque::new(),
            finished: false,
        }
    }

    async fn next_chunk(&mut self) -> Option<Result<StreamChunk>> {
        loop {
            if let Some(chunk) = self.pending.pop_front() {
                return Some(Ok(chunk));
            }
            if self.finished {
                return None;
            }

            match self.inner.next().await {
                Some(Ok(bytes)) => {
                    self.buffer.push_str(&String::from_utf8_lossy(&bytes));
                    self.drain_lines();
                }
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(AgentError::Provider(e.to_string())));
                }
                None => {
                    // Connection closed without [DONE]; emit a final marker
                    self.finished = true;
                    self.pending.push_back(StreamChunk {
                        delta: String::new(),
                        done: true,
                        usage: None,
                    });
                }
            }
        }
    }

    fn drain_lines(&mut self) {
        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            if let Some(chunk) = parse_sse_line(line.trim()) {
                if chunk.done {
                    self.finished = true;
                }
                self.pending.push_back(chunk);
            }
        }
    }
}

/// Parse one SSE line into a stream chunk, if it carries one
fn parse_sse_line(line: &str) -> Option<StreamChunk> {
    let data = line.strip_prefix("data:")?.trim();

    if data == "[DONE]" {
        return Some(StreamChunk {
            delta: String::new(),
            done: true,
            usage: None,
        });
    }

    let parsed: ChatChunk = serde_json::from_str(data).ok()?;
    let choice = parsed.choices.into_iter().next()?;

    Some(StreamChunk {
        delta: choice.delta.content.unwrap_or_default(),
        done: choice.finish_reason.is_some(),
        usage: parsed.usage.map(Into::into),
    })
}

fn convert_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "stop" => FinishReason::Stop,
        "length" => FinishReason::Length,
        "tool_calls" | "function_call" => FinishReason::ToolUse,
        "content_filter" => FinishReason::ContentFilter,
        _ => FinishReason::Error,
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    choices: Vec<ChunkChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

impl From<WireUsage> for TokenUsage {
    fn from(usage: WireUsage) -> Self {
        Self {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }
    }
}
