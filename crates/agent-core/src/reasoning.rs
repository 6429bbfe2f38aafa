//! Reasoning Loop
//!
//! Implements the observe/think/act pattern for agent behavior. The agent
//! calls the provider, executes any tool the model requested, feeds the
//! result back, and repeats until the model answers without a tool call.
//!
//! Instructions come in two layers, mirroring how the tools' own prompts are
//! injected: a static instruction block set at build time, plus dynamic
//! instruction closures evaluated when the system prompt is assembled (used
//! for per-run context such as the current date).

use std::sync::Arc;

use futures::StreamExt;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::error::{AgentError, Result};
use crate::event::AgentEvent;
use crate::message::{Conversation, Message};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::{ToolCall, ToolRegistry, ToolResult};

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Static instruction block (core behavior that doesn't change)
    pub instructions: String,

    /// Maximum reasoning iterations before giving up
    pub max_iterations: usize,

    /// Generation options
    pub generation: GenerationOptions,

    /// Whether to append tool descriptions to the system prompt
    pub inject_tool_descriptions: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            instructions: DEFAULT_INSTRUCTIONS.into(),
            max_iterations: 10,
            generation: GenerationOptions::default(),
            inject_tool_descriptions: true,
        }
    }
}

const DEFAULT_INSTRUCTIONS: &str = r#"You are a helpful AI assistant.

When you need to use a tool, respond with a JSON block in this exact format:
```tool
{"tool": "tool_name", "arguments": {"field": "value"}}
```

After receiving tool results, synthesize them into a helpful response.
If you can answer directly without tools, do so.
Be concise and accurate."#;

/// Dynamic instruction source, evaluated at system-prompt build time
type InstructionFn = Arc<dyn Fn() -> String + Send + Sync>;

/// One tool invocation recorded during a run
#[derive(Clone, Debug, Serialize)]
pub struct ToolInvocation {
    /// Tool name
    pub name: String,

    /// Arguments the model supplied
    pub arguments: serde_json::Value,

    /// Output handed back to the model
    pub output: String,

    /// Whether the call succeeded
    pub success: bool,
}

/// Outcome of a completed run
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    /// Unique run identifier
    pub run_id: String,

    /// The model's final response text
    pub output: String,

    /// Every tool invocation, in call order
    pub tool_invocations: Vec<ToolInvocation>,
}

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
    dynamic_instructions: Vec<InstructionFn>,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
            dynamic_instructions: Vec::new(),
        }
    }

    /// Create with default configuration
    pub fn with_defaults(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>) -> Self {
        Self::new(provider, tools, AgentConfig::default())
    }

    /// Add a dynamic instruction source
    pub fn add_instructions_fn(&mut self, f: impl Fn() -> String + Send + Sync + 'static) {
        self.dynamic_instructions.push(Arc::new(f));
    }

    /// Build the full system prompt: static instructions, dynamic
    /// instructions, then tool descriptions
    fn build_system_prompt(&self) -> String {
        let mut prompt = self.config.instructions.clone();

        for source in &self.dynamic_instructions {
            prompt.push_str("\n\n");
            prompt.push_str(&source());
        }

        if self.config.inject_tool_descriptions && !self.tools.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&self.tools.generate_prompt_section());
        }

        prompt
    }

    /// Run the agent on a conversation
    pub async fn run(&self, conversation: &mut Conversation) -> Result<RunReport> {
        self.run_internal(conversation, None).await
    }

    /// Run the agent, emitting `AgentEvent`s over the channel as the run
    /// progresses. Text is streamed token-by-token from the provider.
    pub async fn run_streaming(
        &self,
        conversation: &mut Conversation,
        events: mpsc::Sender<AgentEvent>,
    ) -> Result<RunReport> {
        self.run_internal(conversation, Some(&events)).await
    }

    /// Run with a simple string input (creates temporary conversation)
    pub async fn ask(&self, question: &str) -> Result<RunReport> {
        let mut conversation = Conversation::new();
        conversation.push(Message::user(question));
        self.run(&mut conversation).await
    }

    async fn run_internal(
        &self,
        conversation: &mut Conversation,
        events: Option<&mpsc::Sender<AgentEvent>>,
    ) -> Result<RunReport> {
        match self.run_inner(conversation, events).await {
            Ok(report) => Ok(report),
            Err(e) => {
                emit(events, AgentEvent::RunFailed { error: e.to_string() }).await;
                Err(e)
            }
        }
    }

    async fn run_inner(
        &self,
        conversation: &mut Conversation,
        events: Option<&mpsc::Sender<AgentEvent>>,
    ) -> Result<RunReport> {
        if !conversation.has_system_prompt() {
            conversation.set_system_prompt(self.build_system_prompt());
        }

        let run_id = uuid::Uuid::new_v4().to_string();
        emit(events, AgentEvent::RunStarted { run_id: run_id.clone() }).await;

        let mut invocations = Vec::new();
        let mut iterations = 0;

        loop {
            iterations += 1;

            if iterations > self.config.max_iterations {
                return Err(AgentError::MaxIterations(self.config.max_iterations));
            }

            conversation.truncate_to_fit();

            // Get completion from provider (streamed when observed)
            let content = match events {
                Some(tx) => self.stream_completion(conversation, tx).await?,
                None => {
                    self.provider
                        .complete(conversation.messages(), &self.config.generation)
                        .await?
                        .content
                }
            };

            // Add assistant response to conversation
            conversation.push(Message::assistant(&content));

            // Check for tool calls
            if let Some(tool_call) = self.parse_tool_call(&content) {
                tracing::debug!(tool = %tool_call.name, "Executing tool");
                emit(
                    events,
                    AgentEvent::ToolCallStarted {
                        name: tool_call.name.clone(),
                        arguments: tool_call.arguments.clone(),
                    },
                )
                .await;

                // Execute the tool
                let result = self.execute_tool(&tool_call).await;

                invocations.push(ToolInvocation {
                    name: result.name.clone(),
                    arguments: tool_call.arguments.clone(),
                    output: result.output.clone(),
                    success: result.success,
                });

                emit(
                    events,
                    AgentEvent::ToolCallFinished {
                        name: result.name.clone(),
                        success: result.success,
                        output: result.output.clone(),
                    },
                )
                .await;

                // Stream the state copy the tool attached, if any
                if let Some(snapshot) = result.snapshot.clone() {
                    emit(events, AgentEvent::StateSnapshot { snapshot }).await;
                }

                // Add tool result to conversation and continue reasoning
                let tool_message = self.format_tool_result(&result);
                conversation.push(Message::tool(tool_message, tool_call.id.clone()));
                continue;
            }

            // No tool call - this is the final response
            emit(events, AgentEvent::RunFinished { output: content.clone() }).await;
            return Ok(RunReport {
                run_id,
                output: content,
                tool_invocations: invocations,
            });
        }
    }

    /// Stream one completion, forwarding text deltas, and return the
    /// accumulated content
    async fn stream_completion(
        &self,
        conversation: &Conversation,
        events: &mpsc::Sender<AgentEvent>,
    ) -> Result<String> {
        let mut stream = self
            .provider
            .complete_stream(conversation.messages(), &self.config.generation)
            .await?;

        let mut content = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if !chunk.delta.is_empty() {
                content.push_str(&chunk.delta);
                let _ = events
                    .send(AgentEvent::TextDelta { delta: chunk.delta })
                    .await;
            }
            if chunk.done {
                break;
            }
        }

        Ok(content)
    }

    /// Parse a tool call from LLM response
    fn parse_tool_call(&self, content: &str) -> Option<ToolCall> {
        // Look for ```tool ... ``` blocks
        let tool_start = "```tool";
        let tool_end = "```";

        if let Some(start_idx) = content.find(tool_start) {
            let after_marker = &content[start_idx + tool_start.len()..];
            if let Some(end_idx) = after_marker.find(tool_end) {
                let json_str = after_marker[..end_idx].trim();

                if let Ok(mut call) = serde_json::from_str::<ToolCall>(json_str) {
                    if call.id.is_none() {
                        call.id = Some(uuid::Uuid::new_v4().to_string());
                    }
                    return Some(call);
                }
            }
        }

        // Fallback: try to find raw JSON with "tool" key
        self.parse_inline_tool_call(content)
    }

    /// Try to parse inline JSON tool call
    fn parse_inline_tool_call(&self, content: &str) -> Option<ToolCall> {
        if !content.contains(r#""tool""#) {
            return None;
        }

        let start = content.find('{')?;
        let end = content.rfind('}')?;

        if end <= start {
            return None;
        }

        let json_str = &content[start..=end];
        let mut call = serde_json::from_str::<ToolCall>(json_str).ok()?;
        if call.id.is_none() {
            call.id = Some(uuid::Uuid::new_v4().to_string());
        }
        Some(call)
    }

    /// Execute a tool call. Failures (unknown tool, validation, execution)
    /// become failed results fed back to the model rather than run aborts.
    async fn execute_tool(&self, call: &ToolCall) -> ToolResult {
        match self.tools.execute(call).await {
            Ok(mut result) => {
                result.id = call.id.clone();
                result
            }
            Err(e) => ToolResult {
                name: call.name.clone(),
                id: call.id.clone(),
                success: false,
                output: format!("Error: {}", e),
                payload: None,
                snapshot: None,
            },
        }
    }

    /// Format tool result for conversation
    fn format_tool_result(&self, result: &ToolResult) -> String {
        if result.success {
            format!("[Tool '{}' returned]\n{}", result.name, result.output)
        } else {
            format!("[Tool '{}' failed]\n{}", result.name, result.output)
        }
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

async fn emit(events: Option<&mpsc::Sender<AgentEvent>>, event: AgentEvent) {
    if let Some(tx) = events {
        // A gone observer shouldn't abort the run
        let _ = tx.send(event).await;
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
    dynamic_instructions: Vec<InstructionFn>,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
            dynamic_instructions: Vec::new(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tool_boxed(mut self, tool: Arc<dyn crate::tool::Tool>) -> Self {
        self.tools.register_boxed(tool);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.config.instructions = instructions.into();
        self
    }

    pub fn instructions_fn(mut self, f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.dynamic_instructions.push(Arc::new(f));
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        let mut agent = Agent::new(provider, Arc::new(self.tools), self.config);
        agent.dynamic_instructions = self.dynamic_instructions;
        Ok(agent)
    }
}
