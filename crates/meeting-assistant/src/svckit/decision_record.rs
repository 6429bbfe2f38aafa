//! Decision Record Tool

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, parse_input,
};

use super::{failure_message, is_success, run_executor};
use crate::document::Executor;
use crate::model::DecisionRecordInput;
use crate::state::SharedState;

pub const DECISION_TOOL_NAME: &str = "create_decision_record";

const DESCRIPTION: &str = "Create an Architecture Decision Record (ADR) for strategic or technical decisions.

Use this when the transcript describes:
- Architectural decisions (technology stack, framework choices)
- Strategic product decisions (feature prioritization)
- Process decisions (workflow changes, methodologies)
- Technical trade-off discussions with a final decision

DO NOT use for:
- Meetings with only action items (use create_calendar_reminder)
- Incidents (use generate_incident_report)";

/// Tool adapter for recording decisions
pub struct DecisionRecordTool {
    executor: Arc<dyn Executor>,
    state: SharedState,
}

impl DecisionRecordTool {
    pub fn new(executor: Arc<dyn Executor>, state: SharedState) -> Self {
        Self { executor, state }
    }
}

#[async_trait]
impl Tool for DecisionRecordTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::for_input::<DecisionRecordInput>(DECISION_TOOL_NAME, DESCRIPTION)
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let input: DecisionRecordInput = parse_input(call)?;
        tracing::info!(
            title = %input.decision_title,
            status = %input.status,
            "Recording decision"
        );

        self.state.lock().await.begin_tool(DECISION_TOOL_NAME);

        let payload = serde_json::to_value(&input)?;
        let result = run_executor(self.executor.as_ref(), payload).await;

        let (output, success) = if is_success(&result) {
            (
                format!(
                    "Created decision record for '{}' ({} options considered, decision: {}).",
                    input.decision_title,
                    input.options_considered.len(),
                    input.status
                ),
                true,
            )
        } else {
            (
                format!(
                    "Failed to create decision record: {}",
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
            ToolResult::success(DECISION_TOOL_NAME, output)
        } else {
            ToolResult::failure(DECISION_TOOL_NAME, output)
        };

        Ok(tool_result.with_payload(result).with_snapshot(snapshot))
    }
}
