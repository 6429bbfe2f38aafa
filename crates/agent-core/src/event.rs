//! Run Events
//!
//! Typed events emitted while a run is in flight, for streaming to an
//! observer (frontend, log collector). Serialized with a `type` tag so the
//! wire shape is stable regardless of which variant fires.

use serde::{Deserialize, Serialize};

/// An event emitted during an agent run
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// A run began
    RunStarted {
        run_id: String,
    },

    /// A text token/delta from the model
    TextDelta {
        delta: String,
    },

    /// The model requested a tool call
    ToolCallStarted {
        name: String,
        arguments: serde_json::Value,
    },

    /// A tool call finished (successfully or not)
    ToolCallFinished {
        name: String,
        success: bool,
        output: String,
    },

    /// Full copy of shared run state after a state-changing tool call
    StateSnapshot {
        snapshot: serde_json::Value,
    },

    /// The run completed with a final response
    RunFinished {
        output: String,
    },

    /// The run aborted with an error
    RunFailed {
        error: String,
    },
}

impl AgentEvent {
    /// Event name as emitted on the wire (`type` tag value)
    pub fn kind(&self) -> &'static str {
        match self {
            AgentEvent::RunStarted { .. } => "run_started",
            AgentEvent::TextDelta { .. } => "text_delta",
            AgentEvent::ToolCallStarted { .. } => "tool_call_started",
            AgentEvent::ToolCallFinished { .. } => "tool_call_finished",
            AgentEvent::StateSnapshot { .. } => "state_snapshot",
            AgentEvent::RunFinished { .. } => "run_finished",
            AgentEvent::RunFailed { .. } => "run_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = AgentEvent::ToolCallFinished {
            name: "create_calendar_reminder".into(),
            success: true,
            output: "done".into(),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "tool_call_finished");
        assert_eq!(value["name"], "create_calendar_reminder");
        assert_eq!(value["type"], event.kind());
    }
}
