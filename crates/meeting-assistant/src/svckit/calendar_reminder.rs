//! Calendar Reminder Tool

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, parse_input,
};

use super::{failure_message, is_success, run_executor};
use crate::document::Executor;
use crate::model::CalendarReminderInput;
use crate::state::SharedState;

pub const CALENDAR_TOOL_NAME: &str = "create_calendar_reminder";

const DESCRIPTION: &str = "Create a calendar reminder with meeting details, action items, and deadlines.

Use this when the transcript contains:
- Action items with owners and deadlines
- Follow-up tasks that need tracking
- Meeting outcomes that should be remembered";

/// Tool adapter for creating calendar reminders
pub struct CalendarReminderTool {
    executor: Arc<dyn Executor>,
    state: SharedState,
}

impl CalendarReminderTool {
    pub fn new(executor: Arc<dyn Executor>, state: SharedState) -> Self {
        Self { executor, state }
    }
}

#[async_trait]
impl Tool for CalendarReminderTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::for_input::<CalendarReminderInput>(CALENDAR_TOOL_NAME, DESCRIPTION)
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let input: CalendarReminderInput = parse_input(call)?;
        tracing::info!(
            title = %input.meeting_title,
            action_items = input.action_items.len(),
            "Creating calendar reminder"
        );

        self.state.lock().await.begin_tool(CALENDAR_TOOL_NAME);

        let payload = serde_json::to_value(&input)?;
        let result = run_executor(self.executor.as_ref(), payload).await;

        let (output, success) = if is_success(&result) {
            (
                format!(
                    "Created calendar reminder '{}' for {} with {} action items.",
                    input.meeting_title,
                    input.reminder_date,
                    input.action_items.len()
                ),
                true,
            )
        } else {
            (
                format!(
                    "Failed to create calendar reminder: {}",
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
            ToolResult::success(CALENDAR_TOOL_NAME, output)
        } else {
            ToolResult::failure(CALENDAR_TOOL_NAME, output)
        };

        Ok(tool_result.with_payload(result).with_snapshot(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{RunState, shared};
    use crate::svckit::testing::StubExecutor;
    use serde_json::json;

    fn call() -> ToolCall {
        ToolCall {
            name: CALENDAR_TOOL_NAME.into(),
            arguments: json!({
                "meeting_title": "Sprint Planning",
                "meeting_type": "planning",
                "meeting_summary": "Planned the sprint.",
                "key_points": ["API redesign on track"],
                "action_items": [
                    { "task": "Write docs", "owner": "Alice" },
                    { "task": "Set up tests", "owner": "Bob" },
                    { "task": "Review audit", "owner": "Charlie" }
                ],
                "reminder_date": "2025-06-10"
            }),
            id: None,
        }
    }

    #[tokio::test]
    async fn test_success_message_includes_title_and_count() {
        let state = shared(RunState::for_today());
        let tool = CalendarReminderTool::new(Arc::new(StubExecutor::succeeding()), state.clone());

        let result = tool.execute(&call()).await.unwrap();

        assert!(result.success);
        assert!(result.output.contains("Sprint Planning"));
        assert!(result.output.contains("3 action items"));
        assert!(result.snapshot.is_some());
    }

    #[tokio::test]
    async fn test_state_updated_and_cleared() {
        let state = shared(RunState::for_today());
        let tool = CalendarReminderTool::new(Arc::new(StubExecutor::succeeding()), state.clone());

        tool.execute(&call()).await.unwrap();

        let state = state.lock().await;
        assert!(state.current_tool.is_none());
        assert_eq!(state.tool_results.len(), 1);
        assert_eq!(state.tool_results[0]["status"], "success");
    }

    #[tokio::test]
    async fn test_failure_uses_executor_message() {
        let state = shared(RunState::for_today());
        let tool = CalendarReminderTool::new(
            Arc::new(StubExecutor::failing(Some("disk full"))),
            state.clone(),
        );

        let result = tool.execute(&call()).await.unwrap();

        assert!(!result.success);
        assert_eq!(
            result.output,
            "Failed to create calendar reminder: disk full"
        );

        // Failure still lands in state, in order
        let state = state.lock().await;
        assert!(state.current_tool.is_none());
        assert_eq!(state.tool_results.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_unknown_error() {
        let state = shared(RunState::for_today());
        let tool = CalendarReminderTool::new(Arc::new(StubExecutor::failing(None)), state);

        let result = tool.execute(&call()).await.unwrap();
        assert_eq!(
            result.output,
            "Failed to create calendar reminder: Unknown error"
        );
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_validation_errors() {
        let state = shared(RunState::for_today());
        let tool = CalendarReminderTool::new(Arc::new(StubExecutor::succeeding()), state.clone());

        let bad_call = ToolCall {
            name: CALENDAR_TOOL_NAME.into(),
            arguments: json!({ "meeting_title": "No other fields" }),
            id: None,
        };

        assert!(tool.execute(&bad_call).await.is_err());
        // Rejected before any state mutation
        assert!(state.lock().await.tool_results.is_empty());
    }
}
