use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::idea::StructuredIdea;

/// Lifecycle state of a job.
///
/// `pending → processing → completed | failed`. Both terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether the state machine permits moving from `self` to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Processing)
                | (JobStatus::Processing, JobStatus::Completed | JobStatus::Failed)
        )
    }

    /// Fixed progress mapping reported by the status boundary.
    #[must_use]
    pub fn progress_percent(self) -> u8 {
        match self {
            JobStatus::Pending => 10,
            JobStatus::Processing => 50,
            JobStatus::Completed => 100,
            JobStatus::Failed => 0,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "processing" => Ok(JobStatus::Processing),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            other => Err(format!("unknown job status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub requester: String,
    pub idea_text: String,
    pub structured_idea: Option<StructuredIdea>,
    pub status: JobStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Kind of durable output attached to a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Research,
    Content,
}

impl OutputKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OutputKind::Research => "research",
            OutputKind::Content => "content",
        }
    }
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "research" => Ok(OutputKind::Research),
            "content" => Ok(OutputKind::Content),
            other => Err(format!("unknown output kind '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub job_id: Uuid,
    pub kind: OutputKind,
    pub content: serde_json::Value,
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [JobStatus; 4] = [
        JobStatus::Pending,
        JobStatus::Processing,
        JobStatus::Completed,
        JobStatus::Failed,
    ];

    #[test]
    fn pending_only_reaches_processing() {
        for next in ALL {
            assert_eq!(
                JobStatus::Pending.can_transition_to(next),
                next == JobStatus::Processing,
                "pending -> {next}"
            );
        }
    }

    #[test]
    fn processing_reaches_terminal_states_only() {
        for next in ALL {
            assert_eq!(
                JobStatus::Processing.can_transition_to(next),
                next.is_terminal(),
                "processing -> {next}"
            );
        }
    }

    #[test]
    fn terminal_states_are_final() {
        for from in [JobStatus::Completed, JobStatus::Failed] {
            for next in ALL {
                assert!(!from.can_transition_to(next), "{from} -> {next}");
            }
        }
    }

    #[test]
    fn progress_mapping() {
        assert_eq!(JobStatus::Pending.progress_percent(), 10);
        assert_eq!(JobStatus::Processing.progress_percent(), 50);
        assert_eq!(JobStatus::Completed.progress_percent(), 100);
        assert_eq!(JobStatus::Failed.progress_percent(), 0);
    }

    #[test]
    fn status_string_roundtrip_and_serde() {
        for status in ALL {
            assert_eq!(status.as_str().parse::<JobStatus>().unwrap(), status);
        }
        assert!("done".parse::<JobStatus>().is_err());
        assert_eq!(
            serde_json::to_value(JobStatus::Processing).unwrap(),
            serde_json::json!("processing")
        );
    }
}
