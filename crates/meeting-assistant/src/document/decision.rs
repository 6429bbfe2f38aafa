//! Decision Record Executor
//!
//! Renders an Architecture Decision Record (ADR) in Markdown: status and
//! date header, context, every option considered with pros and cons, the
//! decision itself, rationale, and consequences.

use std::path::PathBuf;

use async_trait::async_trait;

use super::{Executor, error_payload, slugify, write_document};
use crate::error::Result;
use crate::model::DecisionRecordInput;

/// Generates Markdown ADRs
#[derive(Default)]
pub struct DecisionRecordExecutor {
    output_dir: Option<PathBuf>,
}

impl DecisionRecordExecutor {
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
impl Executor for DecisionRecordExecutor {
    fn name(&self) -> &str {
        "decision_record"
    }

    async fn execute(&self, payload: serde_json::Value) -> Result<serde_json::Value> {
        let input: DecisionRecordInput = match serde_json::from_value(payload.clone()) {
            Ok(input) => input,
            Err(e) => return Ok(error_payload(format!("invalid decision payload: {}", e))),
        };

        let markdown = render_record(&input);
        let filename = format!("adr-{}.md", slugify(&input.decision_title));

        let saved_to = match write_document(self.output_dir.as_deref(), &filename, &markdown).await
        {
            Ok(path) => path,
            Err(e) => {
                return Ok(error_payload(format!("could not write {}: {}", filename, e)));
            }
        };

        Ok(serde_json::json!({
            "status": "success",
            "type": "decision_record",
            "filename": filename,
            "content": markdown,
            "decision_status": input.status.to_string(),
            "saved_to": saved_to.map(|p| p.display().to_string()),
            "data": payload,
        }))
    }
}

fn render_record(input: &DecisionRecordInput) -> String {
    let mut md = format!("# {}\n\n", input.decision_title);

    md.push_str(&format!("- Status: {}\n", input.status));
    md.push_str(&format!("- Date: {}\n", input.decision_date));
    if !input.decision_makers.is_empty() {
        md.push_str(&format!(
            "- Decision makers: {}\n",
            input.decision_makers.join(", ")
        ));
    }
    md.push('\n');

    md.push_str("## Context\n\n");
    md.push_str(&input.context);
    md.push_str("\n\n");

    md.push_str("## Options Considered\n\n");
    for (i, option) in input.options_considered.iter().enumerate() {
        md.push_str(&format!("### {}. {}\n\n", i + 1, option.option));
        if !option.pros.is_empty() {
            md.push_str("Pros:\n");
            for pro in &option.pros {
                md.push_str(&format!("- {}\n", pro));
            }
            md.push('\n');
        }
        if !option.cons.is_empty() {
            md.push_str("Cons:\n");
            for con in &option.cons {
                md.push_str(&format!("- {}\n", con));
            }
            md.push('\n');
        }
    }

    md.push_str("## Decision\n\n");
    md.push_str(&input.decision);
    md.push_str("\n\n");

    md.push_str("## Rationale\n\n");
    md.push_str(&input.rationale);
    md.push_str("\n\n");

    if let Some(consequences) = &input.consequences {
        md.push_str("## Consequences\n\n");
        if !consequences.positive.is_empty() {
            md.push_str("Positive:\n");
            for item in &consequences.positive {
                md.push_str(&format!("- {}\n", item));
            }
            md.push('\n');
        }
        if !consequences.negative.is_empty() {
            md.push_str("Negative:\n");
            for item in &consequences.negative {
                md.push_str(&format!("- {}\n", item));
            }
            md.push('\n');
        }
        if !consequences.risks.is_empty() {
            md.push_str("Risks:\n");
            for item in &consequences.risks {
                md.push_str(&format!("- {}\n", item));
            }
            md.push('\n');
        }
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

    fn decision_payload() -> serde_json::Value {
        json!({
            "decision_title": "Adopt event sourcing for orders",
            "decision_date": "2025-06-03",
            "status": "accepted",
            "context": "Order state transitions are audited by compliance.",
            "options_considered": [
                {
                    "option": "Event sourcing",
                    "pros": ["Full audit trail"],
                    "cons": ["Operational complexity"]
                },
                {
                    "option": "Audit table",
                    "pros": ["Simple"],
                    "cons": ["Lossy history"]
                }
            ],
            "decision": "Use event sourcing for the order aggregate only.",
            "rationale": "Compliance needs beat the added complexity.",
            "consequences": {
                "positive": ["Replayable history"],
                "negative": ["New infra to operate"],
                "risks": ["Event schema evolution"]
            },
            "decision_makers": ["Alice", "Bob"]
        })
    }

    #[tokio::test]
    async fn test_renders_adr_sections() {
        let executor = DecisionRecordExecutor::new();
        let result = executor.execute(decision_payload()).await.unwrap();

        assert_eq!(result["status"], "success");
        assert_eq!(result["type"], "decision_record");
        assert_eq!(result["decision_status"], "accepted");
        assert_eq!(result["filename"], "adr-adopt-event-sourcing-for-orders.md");

        let content = result["content"].as_str().unwrap();
        assert!(content.contains("# Adopt event sourcing for orders"));
        assert!(content.contains("- Status: accepted"));
        assert!(content.contains("- Decision makers: Alice, Bob"));
        assert!(content.contains("### 1. Event sourcing"));
        assert!(content.contains("### 2. Audit table"));
        assert!(content.contains("## Decision"));
        assert!(content.contains("## Rationale"));
        assert!(content.contains("Risks:\n- Event schema evolution"));
    }

    #[tokio::test]
    async fn test_consequences_section_optional() {
        let mut payload = decision_payload();
        payload.as_object_mut().unwrap().remove("consequences");

        let executor = DecisionRecordExecutor::new();
        let result = executor.execute(payload).await.unwrap();

        let content = result["content"].as_str().unwrap();
        assert!(!content.contains("## Consequences"));
    }

    #[tokio::test]
    async fn test_rejects_unknown_status() {
        let mut payload = decision_payload();
        payload["status"] = json!("tentative");

        let executor = DecisionRecordExecutor::new();
        let result = executor.execute(payload).await.unwrap();

        assert_eq!(result["status"], "error");
    }
}
