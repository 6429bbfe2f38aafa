//! Service Kit - Agent Tools
//!
//! Domain-specific tools that implement `agent_core::Tool` for the meeting
//! assistant. Each adapter validates its typed input, marks the shared run
//! state while its executor works, appends the executor's result mapping,
//! and hands a state snapshot to the reasoning loop for streaming.

mod calendar_reminder;
mod decision_record;
mod incident_report;

pub use calendar_reminder::{CALENDAR_TOOL_NAME, CalendarReminderTool};
pub use decision_record::{DECISION_TOOL_NAME, DecisionRecordTool};
pub use incident_report::{INCIDENT_TOOL_NAME, IncidentReportTool};

use crate::document::Executor;

/// Pull the executor's message out of a result mapping, with the fallback
/// wording the adapters promise in their failure sentences.
fn failure_message(result: &serde_json::Value) -> &str {
    result
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("Unknown error")
}

/// Whether the executor reported success
fn is_success(result: &serde_json::Value) -> bool {
    result.get("status").and_then(|s| s.as_str()) == Some("success")
}

/// Run an executor, folding a hard failure into an executor-style error
/// mapping so the adapter has a single result path.
async fn run_executor(
    executor: &dyn Executor,
    payload: serde_json::Value,
) -> serde_json::Value {
    match executor.execute(payload).await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(executor = executor.name(), error = %e, "Executor failed");
            serde_json::json!({ "status": "error", "message": e.to_string() })
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;

    use crate::document::Executor;
    use crate::error::Result;

    /// Executor stub with a scripted outcome
    pub struct StubExecutor {
        result: serde_json::Value,
    }

    impl StubExecutor {
        pub fn succeeding() -> Self {
            Self {
                result: serde_json::json!({ "status": "success", "type": "stub" }),
            }
        }

        pub fn failing(message: Option<&str>) -> Self {
            let mut result = serde_json::json!({ "status": "error" });
            if let Some(message) = message {
                result["message"] = serde_json::Value::String(message.into());
            }
            Self { result }
        }
    }

    #[async_trait]
    impl Executor for StubExecutor {
        fn name(&self) -> &str {
            "stub"
        }

        async fn execute(&self, _payload: serde_json::Value) -> Result<serde_json::Value> {
            Ok(self.result.clone())
        }
    }
}
