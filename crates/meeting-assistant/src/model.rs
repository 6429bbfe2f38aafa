//! Tool Input Records
//!
//! Typed records describing what each tool accepts. Their JSON Schemas are
//! generated with `schemars` and shown to the LLM, so the doc comments below
//! double as the field descriptions the model reads when filling them out.
//! Validation happens when a tool call's arguments deserialize back into
//! these records.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Shared records (used across multiple tools)
// ============================================================================

/// Priority level of a task or action
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

/// A single action item from a meeting
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct ActionItem {
    /// The action item or task
    pub task: String,

    /// Person responsible
    pub owner: String,

    /// Priority level
    #[serde(default)]
    pub priority: Priority,

    /// When it's due (e.g., 'end of week', 'Dec 10')
    #[serde(default)]
    pub due_date: Option<String>,
}

/// A blocker or impediment mentioned in the meeting
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct Blocker {
    /// What is blocked or blocking
    pub blocker: String,

    /// Person affected by the blocker
    pub affected_person: String,
}

/// A critical or urgent issue requiring attention
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct UrgentIssue {
    /// The urgent issue
    pub issue: String,

    /// Severity of the issue
    pub severity: IssueSeverity,
}

/// Severity scale for urgent issues raised in a meeting
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Critical,
    High,
    Medium,
}

// ============================================================================
// Calendar reminder input
// ============================================================================

/// Kind of meeting the transcript came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MeetingType {
    Standup,
    Planning,
    Brainstorm,
    Review,
    ClientCall,
    Interview,
    StatusUpdate,
    Retrospective,
    Other,
}

impl std::fmt::Display for MeetingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MeetingType::Standup => "standup",
            MeetingType::Planning => "planning",
            MeetingType::Brainstorm => "brainstorm",
            MeetingType::Review => "review",
            MeetingType::ClientCall => "client_call",
            MeetingType::Interview => "interview",
            MeetingType::StatusUpdate => "status_update",
            MeetingType::Retrospective => "retrospective",
            MeetingType::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// Input for creating a calendar reminder from meeting details
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct CalendarReminderInput {
    /// Title or topic of the meeting
    pub meeting_title: String,

    /// Type of meeting
    pub meeting_type: MeetingType,

    /// 2-3 sentence summary of what was discussed
    pub meeting_summary: String,

    /// Important points or decisions from the meeting
    pub key_points: Vec<String>,

    /// Action items from the meeting
    pub action_items: Vec<ActionItem>,

    /// Blockers or impediments mentioned
    #[serde(default)]
    pub blockers: Vec<Blocker>,

    /// Critical or urgent issues
    #[serde(default)]
    pub urgent_issues: Vec<UrgentIssue>,

    /// Calendar reminder date in YYYY-MM-DD format
    pub reminder_date: String,
}

// ============================================================================
// Incident report input
// ============================================================================

/// Severity level of an incident, based on business impact
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::High => write!(f, "high"),
            Severity::Medium => write!(f, "medium"),
            Severity::Low => write!(f, "low"),
        }
    }
}

/// A single event in the incident timeline
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct TimelineEvent {
    /// Time of the event (e.g., '10:15 AM')
    pub time: String,

    /// What happened at this time
    pub event: String,

    /// Who performed the action or discovered the event
    #[serde(default)]
    pub actor: Option<String>,
}

/// Quantitative and qualitative business impact of an incident
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct BusinessImpact {
    /// Overall description of business impact
    pub description: String,

    /// Duration of downtime (e.g., '15 minutes')
    #[serde(default)]
    pub downtime_duration: Option<String>,

    /// Number of affected users (e.g., '200 users')
    #[serde(default)]
    pub affected_users: Option<String>,

    /// Number of failed transactions
    #[serde(default)]
    pub failed_transactions: Option<String>,

    /// Revenue loss or financial impact
    #[serde(default)]
    pub revenue_impact: Option<String>,
}

/// A follow-up action to prevent incident recurrence
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct FollowUpAction {
    /// Follow-up action to prevent recurrence
    pub action: String,

    /// Person responsible for the action
    pub owner: String,

    /// Priority level
    #[serde(default)]
    pub priority: Priority,

    /// When the action should be completed
    #[serde(default)]
    pub due_date: Option<String>,
}

/// Input for generating an incident report
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct IncidentReportInput {
    /// Clear, concise title describing the incident
    pub incident_title: String,

    /// Severity level based on business impact
    pub severity: Severity,

    /// When the incident started
    pub start_time: String,

    /// When the incident was detected
    #[serde(default)]
    pub detection_time: Option<String>,

    /// When resolved, or 'ongoing'
    #[serde(default)]
    pub resolution_time: Option<String>,

    /// Root cause if identified
    pub root_cause: String,

    /// Business impact of the incident
    pub business_impact: BusinessImpact,

    /// Chronological timeline of events
    pub timeline: Vec<TimelineEvent>,

    /// Steps taken to resolve
    pub resolution_steps: Vec<String>,

    /// People or teams notified
    #[serde(default)]
    pub stakeholders_notified: Vec<String>,

    /// Post-incident follow-up actions
    #[serde(default)]
    pub follow_up_actions: Vec<FollowUpAction>,

    /// Additional context or notes
    #[serde(default)]
    pub additional_notes: Option<String>,
}

// ============================================================================
// Decision record input
// ============================================================================

/// Lifecycle status of a recorded decision
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    Proposed,
    Accepted,
    Rejected,
    Deprecated,
    Superseded,
}

impl std::fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionStatus::Proposed => write!(f, "proposed"),
            DecisionStatus::Accepted => write!(f, "accepted"),
            DecisionStatus::Rejected => write!(f, "rejected"),
            DecisionStatus::Deprecated => write!(f, "deprecated"),
            DecisionStatus::Superseded => write!(f, "superseded"),
        }
    }
}

/// An option that was considered during decision-making
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct OptionConsidered {
    /// The option/alternative considered
    pub option: String,

    /// Advantages
    #[serde(default)]
    pub pros: Vec<String>,

    /// Disadvantages
    #[serde(default)]
    pub cons: Vec<String>,
}

/// Expected consequences and trade-offs of a decision
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct Consequences {
    /// Positive outcomes and benefits
    #[serde(default)]
    pub positive: Vec<String>,

    /// Negative consequences or trade-offs
    #[serde(default)]
    pub negative: Vec<String>,

    /// Potential risks to monitor
    #[serde(default)]
    pub risks: Vec<String>,
}

/// Input for creating an Architecture Decision Record (ADR)
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct DecisionRecordInput {
    /// Clear, concise title of the decision
    pub decision_title: String,

    /// Date in YYYY-MM-DD format
    pub decision_date: String,

    /// Status of the decision
    pub status: DecisionStatus,

    /// Background - what problem or need led to this decision?
    pub context: String,

    /// All options/alternatives considered
    pub options_considered: Vec<OptionConsidered>,

    /// The final decision - which option was chosen
    pub decision: String,

    /// Why this decision was made - the reasoning and key factors
    pub rationale: String,

    /// Expected consequences and trade-offs
    #[serde(default)]
    pub consequences: Option<Consequences>,

    /// People who participated in making this
    #[serde(default)]
    pub decision_makers: Vec<String>,

    /// Additional context or constraints
    #[serde(default)]
    pub additional_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_calendar_input_deserializes_with_defaults() {
        let input: CalendarReminderInput = serde_json::from_value(json!({
            "meeting_title": "Sprint Planning",
            "meeting_type": "planning",
            "meeting_summary": "Planned the next sprint.",
            "key_points": ["API redesign on track"],
            "action_items": [
                { "task": "Write docs", "owner": "Alice", "priority": "high" },
                { "task": "Set up tests", "owner": "Bob" }
            ],
            "reminder_date": "2025-06-10"
        }))
        .unwrap();

        assert_eq!(input.meeting_type, MeetingType::Planning);
        assert_eq!(input.action_items.len(), 2);
        assert_eq!(input.action_items[1].priority, Priority::Medium);
        assert!(input.blockers.is_empty());
        assert!(input.urgent_issues.is_empty());
    }

    #[test]
    fn test_severity_rejects_unknown_value() {
        let result: Result<Severity, _> = serde_json::from_value(json!("catastrophic"));
        assert!(result.is_err());
    }

    #[test]
    fn test_incident_input_requires_business_impact() {
        let result: Result<IncidentReportInput, _> = serde_json::from_value(json!({
            "incident_title": "DB outage",
            "severity": "critical",
            "start_time": "10:00 AM",
            "root_cause": "Connection pool exhaustion",
            "timeline": [],
            "resolution_steps": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_decision_status_roundtrip() {
        let status: DecisionStatus = serde_json::from_value(json!("superseded")).unwrap();
        assert_eq!(status, DecisionStatus::Superseded);
        assert_eq!(status.to_string(), "superseded");
    }

    #[test]
    fn test_meeting_type_snake_case() {
        let mt: MeetingType = serde_json::from_value(json!("client_call")).unwrap();
        assert_eq!(mt, MeetingType::ClientCall);
        assert_eq!(mt.to_string(), "client_call");
    }
}
