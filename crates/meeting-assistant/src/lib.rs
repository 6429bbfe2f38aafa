//! # meeting-assistant
//!
//! Meeting transcript assistant: an LLM agent that reads a raw transcript,
//! extracts structured records through schema-validated tools, and renders
//! the matching artifacts.
//!
//! ## Flow
//!
//! ```text
//! transcript ──▶ Agent (reasoning loop)
//!                  │
//!                  ├── create_calendar_reminder ──▶ CalendarExecutor ──▶ .ics
//!                  ├── generate_incident_report ──▶ IncidentExecutor ──▶ post-mortem .md
//!                  └── create_decision_record  ──▶ DecisionRecordExecutor ──▶ ADR .md
//!                  │
//!                  ▼
//!            RunState (current tool, date context, results)
//!                  │
//!                  ▼
//!            state snapshots streamed to the frontend
//! ```
//!
//! One transcript can legitimately produce several records: an incident call
//! usually yields an incident report plus a calendar reminder for the
//! follow-ups. The tool choice belongs to the model; this crate only defines
//! what each tool accepts and what happens when it runs.

pub mod agent;
pub mod document;
pub mod error;
pub mod model;
pub mod state;
pub mod svckit;

pub use agent::{MeetingAssistant, TranscriptReport};
pub use error::{AssistantError, Result};
pub use state::{ProcessingStatus, RunState, SharedState};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{CalendarReminderTool, DecisionRecordTool, IncidentReportTool};
}

/// System prompt for the meeting assistant agent
pub const MEETING_ASSISTANT_PROMPT: &str = r#"You are a meeting assistant that processes transcripts and extracts structured information.

Analyze the transcript and call the appropriate tool(s) to extract relevant information.

**Important**: You can call MULTIPLE tools for the same transcript if appropriate:
- Incident call -> incident report + calendar (for follow-up actions)
- Architecture review with implementation tasks -> decision record + calendar
- But if a meeting is ONLY about decisions (no immediate tasks) -> decision record ONLY

For calendar reminders: If the transcript mentions specific deadlines, set reminder_date 1-2 days before the earliest deadline. Otherwise use one week from today. Always use YYYY-MM-DD format.

After processing, provide a friendly 2-4 sentence summary explaining:
1. What you found in the transcript
2. What actions you took (which tools you called)
3. What the user should do next (if applicable)"#;
