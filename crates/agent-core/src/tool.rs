//! Tool System
//!
//! Extensible tool framework for agent capabilities. Tools are registered at
//! runtime and invoked by the reasoning loop. Each tool publishes a JSON
//! Schema for its input, generated from a typed record via `schemars`, so the
//! LLM fills out the same structure the tool deserializes.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AgentError, Result};

/// Tool call request from the LLM
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool identifier
    #[serde(rename = "tool", alias = "name")]
    pub name: String,

    /// Arguments as a JSON object matching the tool's input schema
    #[serde(default)]
    pub arguments: serde_json::Value,

    /// Optional call ID for tracking
    #[serde(default)]
    pub id: Option<String>,
}

/// Result from tool execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool that was called
    pub name: String,

    /// Call ID (if provided in request)
    pub id: Option<String>,

    /// Whether execution succeeded
    pub success: bool,

    /// Output for the LLM (confirmation or failure sentence)
    pub output: String,

    /// Free-form result mapping produced by the tool's executor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,

    /// Full state copy to emit to observers after this call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<serde_json::Value>,
}

impl ToolResult {
    pub fn success(name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: true,
            output: output.into(),
            payload: None,
            snapshot: None,
        }
    }

    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: false,
            output: error.into(),
            payload: None,
            snapshot: None,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_snapshot(mut self, snapshot: serde_json::Value) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Tool definition schema (for LLM function calling)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to LLM)
    pub description: String,

    /// JSON Schema for the tool's input object
    pub input_schema: serde_json::Value,
}

impl ToolSchema {
    /// Build a schema whose input is described by a `JsonSchema` record.
    ///
    /// Doc comments on the record and its fields become the descriptions the
    /// LLM sees.
    pub fn for_input<T: JsonSchema>(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let root = schemars::r#gen::SchemaGenerator::default().into_root_schema_for::<T>();
        let input_schema = serde_json::to_value(root)
            .unwrap_or_else(|_| serde_json::json!({ "type": "object" }));

        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Top-level required field names from the input schema
    pub fn required_fields(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(|v| v.as_array())
            .map(|fields| fields.iter().filter_map(|f| f.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Deserialize a tool call's arguments into the tool's typed input record.
///
/// A mismatch (missing field, out-of-range enum value, wrong type) maps to
/// `ToolValidation` so the reasoning loop can hand it back to the LLM for
/// correction instead of aborting the run.
pub fn parse_input<T: DeserializeOwned>(call: &ToolCall) -> Result<T> {
    serde_json::from_value(call.arguments.clone()).map_err(|e| {
        AgentError::ToolValidation(format!("invalid arguments for '{}': {}", call.name, e))
    })
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema for LLM function calling
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult>;

    /// Validate arguments before execution (optional)
    fn validate(&self, call: &ToolCall) -> Result<()> {
        let schema = self.schema();

        let Some(object) = call.arguments.as_object() else {
            return Err(AgentError::ToolValidation(format!(
                "Arguments for '{}' must be a JSON object",
                call.name
            )));
        };

        for field in schema.required_fields() {
            if !object.contains_key(field) {
                return Err(AgentError::ToolValidation(format!(
                    "Missing required parameter: {}",
                    field
                )));
            }
        }

        Ok(())
    }
}

/// Registry for available tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let schema = tool.schema();
        self.tools.insert(schema.name.clone(), Arc::new(tool));
    }

    /// Register a boxed tool
    pub fn register_boxed(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        self.tools.insert(schema.name, tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Execute a tool call
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let tool = self
            .get(&call.name)
            .ok_or_else(|| AgentError::ToolNotFound(call.name.clone()))?;

        // Validate first
        tool.validate(call)?;

        // Execute
        tool.execute(call).await
    }

    /// Get all tool schemas (for system prompt generation)
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    /// Get tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Generate system prompt section describing available tools
    pub fn generate_prompt_section(&self) -> String {
        let mut prompt = String::from("## Available Tools\n\n");
        prompt.push_str("You can use the following tools by responding with a JSON block:\n\n");
        prompt.push_str("```tool\n{\"tool\": \"tool_name\", \"arguments\": {\"field\": \"value\"}}\n```\n\n");
        prompt.push_str("The `arguments` object must conform to the tool's input schema.\n\n");

        let mut schemas = self.schemas();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));

        for schema in schemas {
            prompt.push_str(&format!("### {}\n", schema.name));
            prompt.push_str(&format!("{}\n\n", schema.description));
            prompt.push_str("Input schema:\n```json\n");
            prompt.push_str(
                &serde_json::to_string_pretty(&schema.input_schema)
                    .unwrap_or_else(|_| "{}".into()),
            );
            prompt.push_str("\n```\n\n");
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, JsonSchema)]
    struct EchoInput {
        /// Text to echo back
        text: String,
        /// Number of repetitions
        #[serde(default)]
        #[allow(dead_code)]
        times: Option<u32>,
    }

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema::for_input::<EchoInput>("echo", "Echo the given text back")
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
            let input: EchoInput = parse_input(call)?;
            Ok(ToolResult::success("echo", input.text))
        }
    }

    #[test]
    fn test_schema_required_fields() {
        let schema = ToolSchema::for_input::<EchoInput>("echo", "Echo");
        assert!(schema.required_fields().contains(&"text"));
        assert!(!schema.required_fields().contains(&"times"));
    }

    #[test]
    fn test_tool_call_accepts_tool_key() {
        let call: ToolCall =
            serde_json::from_str(r#"{"tool": "echo", "arguments": {"text": "hi"}}"#).unwrap();
        assert_eq!(call.name, "echo");
        assert_eq!(call.arguments["text"], "hi");
    }

    #[test]
    fn test_validate_rejects_missing_required() {
        let tool = EchoTool;
        let call = ToolCall {
            name: "echo".into(),
            arguments: serde_json::json!({ "times": 2 }),
            id: None,
        };
        assert!(matches!(
            tool.validate(&call),
            Err(AgentError::ToolValidation(_))
        ));
    }

    #[tokio::test]
    async fn test_registry_execute() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        assert_eq!(registry.len(), 1);
        assert!(registry.get("echo").is_some());
        assert!(registry.get("unknown").is_none());

        let call = ToolCall {
            name: "echo".into(),
            arguments: serde_json::json!({ "text": "hello" }),
            id: None,
        };
        let result = registry.execute(&call).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "hello");
    }

    #[test]
    fn test_prompt_section_includes_schema() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let section = registry.generate_prompt_section();
        assert!(section.contains("### echo"));
        assert!(section.contains("Input schema:"));
        assert!(section.contains("\"text\""));
    }
}
