//! Application State

use std::sync::Arc;

use agent_core::LlmProvider;
use meeting_assistant::MeetingAssistant;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// LLM provider (for health reporting)
    pub provider: Arc<dyn LlmProvider>,

    /// The transcript-processing service
    pub assistant: Arc<MeetingAssistant>,
}
