//! Incident Report Tool

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, parse_input,
};

use super::{failure_message, is_success, run_executor};
use crate::document::Executor;
use crate::model::IncidentReportInput;
use crate::state::SharedState;

pub const INCIDENT_TOOL_NAME: &str = "generate_incident_report";

const DESCRIPTION: &str = "Generate a structured incident report for production issues or outages.

Use this when the transcript describes:
- Production incidents, outages, or system failures
- Emergency response calls
- Critical issues affecting users or revenue
- Post-mortem discussions";

/// Tool adapter for generating incident reports
pub struct IncidentReportTool {
    executor: Arc<dyn Executor>,
    state: SharedState,
}

impl IncidentReportTool {
    pub fn new(executor: Arc<dyn Executor>, state: SharedState) -> Self {
        Self { executor, state }
    }
}

#[async_trait]
impl Tool for IncidentReportTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::for_input::<IncidentReportInput>(INCIDENT_TOOL_NAME, DESCRIPTION)
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let input: IncidentReportInput = parse_input(call)?;
        tracing::info!(
            title = %input.incident_title,
            severity = %input.severity,
            "Generating incident report"
        );

        self.state.lock().await.begin_tool(INCIDENT_TOOL_NAME);

        let payload = serde_json::to_value(&input)?;
        let result = run_executor(self.executor.as_ref(), payload).await;

        let (output, success) = if is_success(&result) {
            let root_cause: String = input.root_cause.chars().take(100).collect();
            (
                format!(
                    "Generated incident report for '{}' (Severity: {}). Root cause: {}...",
                    input.incident_title,
                    input.severity.to_string().to_uppercase(),
                    root_cause
                ),
                true,
            )
        } else {
            (
                format!(
                    "Failed to generate incident report: {}",
                    failure_message(&result)
                ),
                false,
            )
        };

        let snapshot = {
            let mut state = self.state.lock().await;
            state.finish_tool(result.clone());
            state.snapshot()
        };

        let tool_result = if success {
            ToolResult::success(INCIDENT_TOOL_NAME, output)
        } else {
            ToolResult::failure(INCIDENT_TOOL_NAME, output)
        };

        Ok(tool_result.with_payload(result).with_snapshot(snapshot))
    }
}
