//! Incident Executor
//!
//! Renders a structured post-mortem report in Markdown: severity banner,
//! business impact, chronological timeline, resolution steps, and follow-up
//! actions.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;

use super::{Executor, error_payload, slugify, write_document};
use crate::error::Result;
use crate::model::IncidentReportInput;

/// Generates Markdown incident reports
#[derive(Default)]
pub struct IncidentExecutor {
    output_dir: Option<PathBuf>,
}

impl IncidentExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist rendered files under the given directory
    pub fn with_output_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: Some(dir.into()),
        }
    }
}

#[async_trait]
impl Executor for IncidentExecutor {
    fn name(&self) -> &str {
        "incident"
    }

    async fn execute(&self, payload: serde_json::Value) -> Result<serde_json::Value> {
        let input: IncidentReportInput = match serde_json::from_value(payload.clone()) {
            Ok(input) => input,
            Err(e) => return Ok(error_payload(format!("invalid incident payload: {}", e))),
        };

        let markdown = render_report(&input);
        let filename = format!("incident-{}.md", slugify(&input.incident_title));

        let saved_to = match write_document(self.output_dir.as_deref(), &filename, &markdown).await
        {
            Ok(path) => path,
            Err(e) => {
                return Ok(error_payload(format!("could not write {}: {}", filename, e)));
            }
        };

        Ok(serde_json::json!({
            "status": "success",
            "type": "incident_report",
            "filename": filename,
            "content": markdown,
            "severity": input.severity.to_string(),
            "saved_to": saved_to.map(|p| p.display().to_string()),
            "data": payload,
        }))
    }
}

fn render_report(input: &IncidentReportInput) -> String {
    let mut md = format!("# Incident Report: {}\n\n", input.incident_title);

    md.push_str(&format!(
        "**Severity:** {}  \n",
        input.severity.to_string().to_uppercase()
    ));
    md.push_str(&format!("**Started:** {}  \n", input.start_time));
    if let Some(detected) = &input.detection_time {
        md.push_str(&format!("**Detected:** {}  \n", detected));
    }
    if let Some(resolved) = &input.resolution_time {
        md.push_str(&format!("**Resolved:** {}  \n", resolved));
    }
    md.push_str(&format!(
        "**Report generated:** {}\n\n",
        Utc::now().format("%Y-%m-%d %H:%M UTC")
    ));

    md.push_str("## Root Cause\n\n");
    md.push_str(&input.root_cause);
    md.push_str("\n\n");

    md.push_str("## Business Impact\n\n");
    md.push_str(&input.business_impact.description);
    md.push('\n');
    if let Some(downtime) = &input.business_impact.downtime_duration {
        md.push_str(&format!("\n- Downtime: {}", downtime));
    }
    if let Some(users) = &input.business_impact.affected_users {
        md.push_str(&format!("\n- Affected users: {}", users));
    }
    if let Some(transactions) = &input.business_impact.failed_transactions {
        md.push_str(&format!("\n- Failed transactions: {}", transactions));
    }
    if let Some(revenue) = &input.business_impact.revenue_impact {
        md.push_str(&format!("\n- Revenue impact: {}", revenue));
    }
    md.push_str("\n\n");

    if !input.timeline.is_empty() {
        md.push_str("## Timeline\n\n");
        md.push_str("| Time | Event | Actor |\n|------|-------|-------|\n");
        for event in &input.timeline {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                event.time,
                event.event,
                event.actor.as_deref().unwrap_or("-")
            ));
        }
        md.push('\n');
    }

    if !input.resolution_steps.is_empty() {
        md.push_str("## Resolution Steps\n\n");
        for (i, step) in input.resolution_steps.iter().enumerate() {
            md.push_str(&format!("{}. {}\n", i + 1, step));
        }
        md.push('\n');
    }

    if !input.stakeholders_notified.is_empty() {
        md.push_str("## Stakeholders Notified\n\n");
        for stakeholder in &input.stakeholders_notified {
            md.push_str(&format!("- {}\n", stakeholder));
        }
        md.push('\n');
    }

    if !input.follow_up_actions.is_empty() {
        md.push_str("## Follow-up Actions\n\n");
        for action in &input.follow_up_actions {
            md.push_str(&format!(
                "- [ ] {} - {} ({})",
                action.action, action.owner, action.priority
            ));
            if let Some(due) = &action.due_date {
                md.push_str(&format!(", due {}", due));
            }
            md.push('\n');
        }
        md.push('\n');
    }

    if let Some(notes) = &input.additional_notes {
        md.push_str("## Notes\n\n");
        md.push_str(notes);
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn incident_payload() -> serde_json::Value {
        json!({
            "incident_title": "Checkout API Outage",
            "severity": "critical",
            "start_time": "10:02 AM",
            "detection_time": "10:15 AM",
            "resolution_time": "10:45 AM",
            "root_cause": "Connection pool exhaustion after the 2.3 deploy",
            "business_impact": {
                "description": "Checkout unavailable for all users",
                "downtime_duration": "43 minutes",
                "affected_users": "200 users",
                "revenue_impact": "$12k in failed orders"
            },
            "timeline": [
                { "time": "10:02 AM", "event": "Error rate spike", "actor": "PagerDuty" },
                { "time": "10:15 AM", "event": "Incident declared" }
            ],
            "resolution_steps": ["Rolled back deploy", "Recycled connection pool"],
            "stakeholders_notified": ["on-call", "support"],
            "follow_up_actions": [
                { "action": "Add pool saturation alert", "owner": "Bob", "priority": "high" }
            ]
        })
    }

    #[tokio::test]
    async fn test_renders_report_sections() {
        let executor = IncidentExecutor::new();
        let result = executor.execute(incident_payload()).await.unwrap();

        assert_eq!(result["status"], "success");
        assert_eq!(result["type"], "incident_report");
        assert_eq!(result["severity"], "critical");

        let content = result["content"].as_str().unwrap();
        assert!(content.contains("# Incident Report: Checkout API Outage"));
        assert!(content.contains("**Severity:** CRITICAL"));
        assert!(content.contains("## Root Cause"));
        assert!(content.contains("## Timeline"));
        assert!(content.contains("| 10:02 AM | Error rate spike | PagerDuty |"));
        assert!(content.contains("## Resolution Steps"));
        assert!(content.contains("1. Rolled back deploy"));
        assert!(content.contains("- [ ] Add pool saturation alert - Bob (high)"));
    }

    #[tokio::test]
    async fn test_missing_actor_renders_dash() {
        let executor = IncidentExecutor::new();
        let result = executor.execute(incident_payload()).await.unwrap();

        let content = result["content"].as_str().unwrap();
        assert!(content.contains("| 10:15 AM | Incident declared | - |"));
    }

    #[tokio::test]
    async fn test_rejects_malformed_payload() {
        let executor = IncidentExecutor::new();
        let result = executor
            .execute(json!({ "incident_title": "no severity" }))
            .await
            .unwrap();

        assert_eq!(result["status"], "error");
        assert!(result["message"].as_str().unwrap().contains("invalid incident payload"));
    }
}
