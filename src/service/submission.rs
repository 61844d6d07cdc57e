//! Bulk submission with per-record failure isolation
//!
//! Every record in the input is submitted exactly once, in order; no outcome
//! stops the run. The accumulated report and the list of failed records are
//! written out only after the last record has been processed.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::registry::{SubmissionOutcome, ToolSubmitter};

/// Fixed artifact names, relative to the output directory.
const REPORT_FILE: &str = "log.txt";
const FAILED_FILE: &str = "error_tools.json";

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("failed to read input file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed tool record JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result of a full submission run.
pub struct SubmissionSummary {
    /// Human-readable report, one entry per record.
    pub report: String,
    /// The original records that were not created, in input order.
    pub failed: Vec<Value>,
    pub succeeded: usize,
}

/// Drives a [`ToolSubmitter`] over a whole record array.
pub struct SubmissionService<S> {
    submitter: S,
}

impl<S: ToolSubmitter> SubmissionService<S> {
    pub fn new(submitter: S) -> Self {
        Self { submitter }
    }

    /// Submit every record, never stopping early. The summary covers all
    /// records: `succeeded + failed.len()` equals the input length.
    pub async fn submit_all(&self, tools: Vec<Value>) -> SubmissionSummary {
        let mut report = String::new();
        let mut failed = Vec::new();
        let mut succeeded = 0;

        for tool in tools {
            match self.submitter.create_tool(&tool).await {
                SubmissionOutcome::Created { id } => {
                    tracing::info!(id = %id, "Tool created");
                    report.push_str(&success_entry(&id));
                    succeeded += 1;
                }
                SubmissionOutcome::Rejected { details } => {
                    let id = record_id(&tool);
                    tracing::warn!(id = %id, "Registry rejected tool");
                    report.push_str(&failure_entry(&id, &details.to_string()));
                    failed.push(tool);
                }
                SubmissionOutcome::Failed { reason } => {
                    let id = record_id(&tool);
                    tracing::warn!(id = %id, error = %reason, "Tool submission failed");
                    report.push_str(&failure_entry(&id, &reason));
                    failed.push(tool);
                }
            }
        }

        SubmissionSummary {
            report,
            failed,
            succeeded,
        }
    }
}

/// Load the record array to submit. Records stay as raw JSON values so they
/// pass through to the registry, and into the failed list, unmodified.
pub fn load_tools(path: &Path) -> Result<Vec<Value>, SubmissionError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Write the report and the failed-records file into `dir`.
///
/// The failed file is written even when nothing failed, as an empty array.
/// Its maps serialize with sorted keys: serde_json's default map is a
/// BTreeMap, so no extra ordering step is needed.
pub fn write_artifacts(
    summary: &SubmissionSummary,
    dir: &Path,
) -> Result<(PathBuf, PathBuf), SubmissionError> {
    let report_path = dir.join(REPORT_FILE);
    fs::write(&report_path, &summary.report)?;

    let failed_path = dir.join(FAILED_FILE);
    fs::write(&failed_path, serde_json::to_string_pretty(&summary.failed)?)?;

    Ok((report_path, failed_path))
}

fn success_entry(id: &str) -> String {
    format!("{} was added successfully.\n\n\n\n\n", id)
}

fn failure_entry(id: &str, details: &str) -> String {
    format!("{} adding failed.\n Details: {}\n\n\n\n\n", id, details)
}

fn record_id(tool: &Value) -> String {
    tool.get("id")
        .and_then(Value::as_str)
        .unwrap_or("<unknown>")
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;

    /// Submitter that replays a scripted list of outcomes.
    struct ScriptedSubmitter {
        outcomes: Mutex<VecDeque<SubmissionOutcome>>,
    }

    impl ScriptedSubmitter {
        fn new(outcomes: Vec<SubmissionOutcome>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
            }
        }
    }

    #[async_trait]
    impl ToolSubmitter for ScriptedSubmitter {
        async fn create_tool(&self, _tool: &Value) -> SubmissionOutcome {
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .expect("more submissions than scripted outcomes")
        }
    }

    fn tool(id: &str) -> Value {
        json!({"id": id, "name": id.replace('_', " ")})
    }

    #[tokio::test]
    async fn every_record_yields_exactly_one_outcome() {
        let service = SubmissionService::new(ScriptedSubmitter::new(vec![
            SubmissionOutcome::Created {
                id: "abc123".to_string(),
            },
            SubmissionOutcome::Rejected {
                details: json!({"name": ["required"]}),
            },
            SubmissionOutcome::Failed {
                reason: "connection timed out".to_string(),
            },
        ]));

        let summary = service
            .submit_all(vec![tool("Tool_A"), tool("Tool_B"), tool("Tool_C")])
            .await;

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed.len(), 2);
        // Failed records are the originals, in input order.
        assert_eq!(summary.failed[0]["id"], "Tool_B");
        assert_eq!(summary.failed[1]["id"], "Tool_C");
    }

    #[tokio::test]
    async fn report_names_returned_id_on_success_and_record_id_on_failure() {
        let service = SubmissionService::new(ScriptedSubmitter::new(vec![
            SubmissionOutcome::Created {
                id: "srv-side-id".to_string(),
            },
            SubmissionOutcome::Failed {
                reason: "connect error".to_string(),
            },
        ]));

        let summary = service.submit_all(vec![tool("Tool_A"), tool("Tool_B")]).await;

        assert_eq!(
            summary.report,
            "srv-side-id was added successfully.\n\n\n\n\n\
             Tool_B adding failed.\n Details: connect error\n\n\n\n\n"
        );
    }

    #[tokio::test]
    async fn rejection_details_carry_the_response_body() {
        let service = SubmissionService::new(ScriptedSubmitter::new(vec![
            SubmissionOutcome::Rejected {
                details: json!({"id": {"field": ["error"]}}),
            },
        ]));

        let summary = service.submit_all(vec![tool("Tool_A")]).await;

        assert!(summary.report.contains("Tool_A adding failed.\n Details:"));
        assert!(summary.report.contains(r#""field":["error"]"#));
    }

    #[tokio::test]
    async fn record_without_id_is_reported_as_unknown() {
        let service = SubmissionService::new(ScriptedSubmitter::new(vec![
            SubmissionOutcome::Failed {
                reason: "boom".to_string(),
            },
        ]));

        let summary = service.submit_all(vec![json!({"name": "anon"})]).await;

        assert!(summary.report.starts_with("<unknown> adding failed."));
        assert_eq!(summary.failed.len(), 1);
    }

    #[test]
    fn artifacts_are_written_even_when_nothing_failed() {
        let dir = tempfile::tempdir().unwrap();
        let summary = SubmissionSummary {
            report: "abc was added successfully.\n\n\n\n\n".to_string(),
            failed: vec![],
            succeeded: 1,
        };

        let (report_path, failed_path) = write_artifacts(&summary, dir.path()).unwrap();

        assert_eq!(fs::read_to_string(report_path).unwrap(), summary.report);
        assert_eq!(fs::read_to_string(failed_path).unwrap(), "[]");
    }

    #[test]
    fn failed_records_serialize_with_sorted_keys() {
        let dir = tempfile::tempdir().unwrap();
        let summary = SubmissionSummary {
            report: String::new(),
            failed: vec![json!({"name": "N", "id": "I", "description": "D"})],
            succeeded: 0,
        };

        let (_, failed_path) = write_artifacts(&summary, dir.path()).unwrap();

        let text = fs::read_to_string(failed_path).unwrap();
        let description = text.find("\"description\"").unwrap();
        let id = text.find("\"id\"").unwrap();
        let name = text.find("\"name\"").unwrap();
        assert!(description < id && id < name);
    }

    #[test]
    fn load_tools_rejects_malformed_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            load_tools(&path),
            Err(SubmissionError::Parse(_))
        ));
    }
}
