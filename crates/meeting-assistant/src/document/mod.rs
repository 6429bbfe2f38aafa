//! Document Executors
//!
//! The collaborators behind each tool adapter: they take the adapter's
//! validated record as a JSON mapping, render the actual artifact (an
//! iCalendar file, a post-mortem, an ADR), optionally persist it, and hand
//! back a free-form result mapping. The adapter only inspects `status` and
//! `message`; everything else flows through to the frontend untouched.

mod calendar;
mod decision;
mod incident;

pub use calendar::CalendarExecutor;
pub use decision::DecisionRecordExecutor;
pub use incident::IncidentExecutor;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::Result;

/// Executor trait (collaborator behind a tool adapter)
///
/// Implementations report failure through a `status: "error"` mapping with a
/// `message`, not through `Err`; `Err` is reserved for faults the executor
/// cannot describe (serialization of its own output, for instance).
#[async_trait]
pub trait Executor: Send + Sync {
    /// Executor name (for logs)
    fn name(&self) -> &str;

    /// Perform the business action for one validated record
    async fn execute(&self, payload: serde_json::Value) -> Result<serde_json::Value>;
}

/// Result mapping for an executor-reported failure
pub(crate) fn error_payload(message: impl Into<String>) -> serde_json::Value {
    serde_json::json!({
        "status": "error",
        "message": message.into(),
    })
}

/// Turn a title into a safe lowercase filename stem
pub(crate) fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() { "untitled".into() } else { slug }
}

/// Write a rendered document under the output directory, if one is set.
/// Returns the path written, or `None` when persistence is disabled.
pub(crate) async fn write_document(
    output_dir: Option<&Path>,
    filename: &str,
    content: &str,
) -> std::io::Result<Option<PathBuf>> {
    let Some(dir) = output_dir else {
        return Ok(None);
    };

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(filename);
    tokio::fs::write(&path, content).await?;

    tracing::info!(path = %path.display(), "Wrote document");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Sprint Planning - Dec 9"), "sprint-planning-dec-9");
        assert_eq!(slugify("  API!!  redesign "), "api-redesign");
        assert_eq!(slugify("???"), "untitled");
    }

    #[test]
    fn test_error_payload_shape() {
        let payload = error_payload("boom");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["message"], "boom");
    }

    #[tokio::test]
    async fn test_write_document_disabled_without_dir() {
        let written = write_document(None, "x.md", "content").await.unwrap();
        assert!(written.is_none());
    }

    #[tokio::test]
    async fn test_write_document_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_document(Some(dir.path()), "note.md", "# hi")
            .await
            .unwrap()
            .unwrap();

        let content = tokio::fs::read_to_string(&written).await.unwrap();
        assert_eq!(content, "# hi");
    }
}
