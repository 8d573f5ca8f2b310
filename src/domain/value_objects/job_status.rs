use serde::{Deserialize, Serialize};

/// Lifecycle of an analysis job. `PartialFailure` and `Failed` carry enough
/// context for a consumer to decide whether the results are usable at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    PartialFailure,
    Failed(String),
}

impl JobStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, JobStatus::Pending)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, JobStatus::Processing)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, JobStatus::Completed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, JobStatus::Failed(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::PartialFailure | JobStatus::Failed(_)
        )
    }

    /// Terminal status once summarization has run: a pure function of the
    /// failure counter over the produced clause summaries.
    pub fn from_counts(failure_count: usize, total: usize) -> Self {
        if failure_count == 0 {
            JobStatus::Completed
        } else if failure_count >= total {
            JobStatus::Failed("All clause summaries failed".to_string())
        } else {
            JobStatus::PartialFailure
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            JobStatus::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Processing => "PROCESSING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::PartialFailure => "PARTIAL_FAILURE",
            JobStatus::Failed(_) => "FAILED",
        }
    }

    pub fn from_str_with_error(s: &str, error: Option<String>) -> Result<Self, String> {
        match s {
            "PENDING" => Ok(JobStatus::Pending),
            "PROCESSING" => Ok(JobStatus::Processing),
            "COMPLETED" => Ok(JobStatus::Completed),
            "PARTIAL_FAILURE" => Ok(JobStatus::PartialFailure),
            "FAILED" => Ok(JobStatus::Failed(
                error.unwrap_or_else(|| "Unknown error".to_string()),
            )),
            _ => Err(format!("Invalid job status: {}", s)),
        }
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        JobStatus::Pending
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_checks() {
        assert!(JobStatus::Pending.is_pending());
        assert!(JobStatus::Processing.is_processing());
        assert!(JobStatus::Completed.is_completed());
        assert!(JobStatus::Failed("error".to_string()).is_failed());

        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::PartialFailure.is_terminal());
        assert!(JobStatus::Failed("error".to_string()).is_terminal());
    }

    #[test]
    fn test_from_counts_no_failures() {
        assert_eq!(JobStatus::from_counts(0, 12), JobStatus::Completed);
    }

    #[test]
    fn test_from_counts_all_failed() {
        assert!(matches!(JobStatus::from_counts(12, 12), JobStatus::Failed(_)));
    }

    #[test]
    fn test_from_counts_some_failed() {
        assert_eq!(JobStatus::from_counts(1, 12), JobStatus::PartialFailure);
        assert_eq!(JobStatus::from_counts(11, 12), JobStatus::PartialFailure);
    }

    #[test]
    fn test_string_round_trip() {
        let statuses = vec![
            JobStatus::Pending,
            JobStatus::Processing,
            JobStatus::Completed,
            JobStatus::PartialFailure,
            JobStatus::Failed("boom".to_string()),
        ];

        for status in statuses {
            let error = status.error_message().map(|s| s.to_string());
            let parsed = JobStatus::from_str_with_error(status.as_str(), error).unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_invalid_string_parsing() {
        assert!(JobStatus::from_str_with_error("RUNNING", None).is_err());
    }
}
