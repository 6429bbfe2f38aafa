//! Shared Run State
//!
//! Mutable state accumulated over one agent run: which tool is currently
//! executing, the date context injected into the instructions, and every
//! executor result in call order. Created fresh per request by the service
//! and discarded when the run ends; snapshots of it are streamed to
//! observers after each state-changing tool call.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Coarse processing indicator for the frontend
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    #[default]
    Idle,
    Executing,
}

/// State shared across the tool calls of a single run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunState {
    /// Name of the tool currently executing, if any
    pub current_tool: Option<String>,

    /// Processing indicator
    pub processing_status: ProcessingStatus,

    /// Today's date, YYYY-MM-DD (UTC)
    pub current_date: String,

    /// Seven calendar days from today, YYYY-MM-DD (UTC)
    pub one_week_from_now: String,

    /// Executor result mappings, in call order
    pub tool_results: Vec<serde_json::Value>,
}

impl RunState {
    /// Create initial state with current date context
    pub fn for_today() -> Self {
        let now = Utc::now();
        Self {
            current_tool: None,
            processing_status: ProcessingStatus::Idle,
            current_date: now.format("%Y-%m-%d").to_string(),
            one_week_from_now: (now + Duration::days(7)).format("%Y-%m-%d").to_string(),
            tool_results: Vec::new(),
        }
    }

    /// Mark a tool as running
    pub fn begin_tool(&mut self, name: &str) {
        self.current_tool = Some(name.to_string());
        self.processing_status = ProcessingStatus::Executing;
    }

    /// Record a tool's result and clear the running marker
    pub fn finish_tool(&mut self, result: serde_json::Value) {
        self.tool_results.push(result);
        self.current_tool = None;
    }

    /// Full JSON copy for transmission to an observer
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}))
    }
}

/// Handle threaded into each tool adapter for the duration of one run
pub type SharedState = Arc<Mutex<RunState>>;

/// Wrap a run state in a shareable handle
pub fn shared(state: RunState) -> SharedState {
    Arc::new(Mutex::new(state))
}
