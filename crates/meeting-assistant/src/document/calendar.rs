//! Calendar Executor
//!
//! Renders a calendar reminder as an iCalendar (RFC 5545) event with the
//! meeting summary, key points, and action items in the description, plus a
//! display alarm on the reminder date.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use super::{Executor, error_payload, slugify, write_document};
use crate::error::Result;
use crate::model::CalendarReminderInput;

/// Generates `.ics` reminder files from meeting details
#[derive(Default)]
pub struct CalendarExecutor {
    output_dir: Option<PathBuf>,
}

impl CalendarExecutor {
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
impl Executor for CalendarExecutor {
    fn name(&self) -> &str {
        "calendar"
    }

    async fn execute(&self, payload: serde_json::Value) -> Result<serde_json::Value> {
        let input: CalendarReminderInput = match serde_json::from_value(payload.clone()) {
            Ok(input) => input,
            Err(e) => return Ok(error_payload(format!("invalid calendar payload: {}", e))),
        };

        let Ok(reminder_date) = NaiveDate::parse_from_str(&input.reminder_date, "%Y-%m-%d")
        else {
            return Ok(error_payload(format!(
                "reminder_date '{}' is not in YYYY-MM-DD format",
                input.reminder_date
            )));
        };

        let ics = render_ics(&input, reminder_date);
        let filename = format!("{}.ics", slugify(&input.meeting_title));

        let saved_to = match write_document(self.output_dir.as_deref(), &filename, &ics).await {
            Ok(path) => path,
            Err(e) => {
                return Ok(error_payload(format!("could not write {}: {}", filename, e)));
            }
        };

        Ok(serde_json::json!({
            "status": "success",
            "type": "calendar_reminder",
            "filename": filename,
            "content": ics,
            "saved_to": saved_to.map(|p| p.display().to_string()),
            "data": payload,
        }))
    }
}

fn render_ics(input: &CalendarReminderInput, reminder_date: NaiveDate) -> String {
    let mut description = input.meeting_summary.clone();

    if !input.key_points.is_empty() {
        description.push_str("\n\nKey points:\n");
        for point in &input.key_points {
            description.push_str(&format!("- {}\n", point));
        }
    }

    if !input.action_items.is_empty() {
        description.push_str("\nAction items:\n");
        for item in &input.action_items {
            description.push_str(&format!("- {} ({}, {})", item.task, item.owner, item.priority));
            if let Some(due) = &item.due_date {
                description.push_str(&format!(", due {}", due));
            }
            description.push('\n');
        }
    }

    if !input.blockers.is_empty() {
        description.push_str("\nBlockers:\n");
        for blocker in &input.blockers {
            description.push_str(&format!(
                "- {} (affects {})\n",
                blocker.blocker, blocker.affected_person
            ));
        }
    }

    let mut ics = String::new();
    ics.push_str("BEGIN:VCALENDAR\r\n");
    ics.push_str("VERSION:2.0\r\n");
    ics.push_str("PRODID:-//meeting-assistant//EN\r\n");
    ics.push_str("BEGIN:VEVENT\r\n");
    ics.push_str(&format!("UID:{}\r\n", uuid::Uuid::new_v4()));
    ics.push_str(&format!("DTSTAMP:{}\r\n", Utc::now().format("%Y%m%dT%H%M%SZ")));
    ics.push_str(&format!(
        "DTSTART;VALUE=DATE:{}\r\n",
        reminder_date.format("%Y%m%d")
    ));
    ics.push_str(&format!("SUMMARY:{}\r\n", ics_escape(&input.meeting_title)));
    ics.push_str(&format!("DESCRIPTION:{}\r\n", ics_escape(&description)));
    ics.push_str(&format!(
        "CATEGORIES:{}\r\n",
        input.meeting_type.to_string().to_uppercase()
    ));
    ics.push_str("BEGIN:VALARM\r\n");
    ics.push_str("ACTION:DISPLAY\r\n");
    ics.push_str("TRIGGER:-PT0H\r\n");
    ics.push_str(&format!("DESCRIPTION:{}\r\n", ics_escape(&input.meeting_title)));
    ics.push_str("END:VALARM\r\n");
    ics.push_str("END:VEVENT\r\n");
    ics.push_str("END:VCALENDAR\r\n");

    ics
}

/// Escape text per RFC 5545: backslash, comma, semicolon, newline
fn ics_escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace(';', "\\;")
        .replace('\n', "\\n")
        .replace('\r', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn calendar_payload() -> serde_json::Value {
        json!({
            "meeting_title": "Sprint Planning",
            "meeting_type": "planning",
            "meeting_summary": "Planned the next sprint; API redesign on track.",
            "key_points": ["API redesign on track"],
            "action_items": [
                { "task": "Write docs", "owner": "Alice", "priority": "high", "due_date": "Friday" }
            ],
            "reminder_date": "2025-06-10"
        })
    }

    #[tokio::test]
    async fn test_renders_ics_event() {
        let executor = CalendarExecutor::new();
        let result = executor.execute(calendar_payload()).await.unwrap();

        assert_eq!(result["status"], "success");
        assert_eq!(result["type"], "calendar_reminder");
        assert_eq!(result["filename"], "sprint-planning.ics");

        let content = result["content"].as_str().unwrap();
        assert!(content.contains("BEGIN:VEVENT"));
        assert!(content.contains("SUMMARY:Sprint Planning"));
        assert!(content.contains("DTSTART;VALUE=DATE:20250610"));
        assert!(content.contains("Write docs"));
    }

    #[tokio::test]
    async fn test_rejects_bad_reminder_date() {
        let mut payload = calendar_payload();
        payload["reminder_date"] = json!("next Tuesday");

        let executor = CalendarExecutor::new();
        let result = executor.execute(payload).await.unwrap();

        assert_eq!(result["status"], "error");
        assert!(result["message"].as_str().unwrap().contains("YYYY-MM-DD"));
    }

    #[tokio::test]
    async fn test_rejects_malformed_payload() {
        let executor = CalendarExecutor::new();
        let result = executor
            .execute(json!({ "meeting_title": "No other fields" }))
            .await
            .unwrap();

        assert_eq!(result["status"], "error");
    }

    #[tokio::test]
    async fn test_writes_file_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let executor = CalendarExecutor::with_output_dir(dir.path());
        let result = executor.execute(calendar_payload()).await.unwrap();

        let saved_to = result["saved_to"].as_str().unwrap();
        assert!(saved_to.ends_with("sprint-planning.ics"));
        assert!(std::path::Path::new(saved_to).exists());
    }

    #[test]
    fn test_ics_escape() {
        assert_eq!(ics_escape("a,b;c\nd"), "a\\,b\\;c\\nd");
        assert_eq!(ics_escape("back\\slash"), "back\\\\slash");
    }
}
