//! Pull request model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle status of a pull request.
///
/// OPEN transitions to MERGED at most once; there is no other state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PullRequestStatus {
    Open,
    Merged,
}

impl From<&str> for PullRequestStatus {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "MERGED" => Self::Merged,
            _ => Self::Open,
        }
    }
}

impl std::fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Merged => write!(f, "MERGED"),
        }
    }
}

/// A pull request together with its currently assigned reviewers.
///
/// `assigned_reviewers` is not a column; it is filled from `pr_reviewers`
/// when the record is loaded.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PullRequest {
    pub pull_request_id: String,

    pub pull_request_name: String,

    /// User id of the author.
    pub author_id: String,

    /// Current status: `OPEN` or `MERGED`.
    pub status: String,

    /// Creation timestamp (unix seconds).
    pub created_at: i64,

    /// Merge timestamp (unix seconds, if merged).
    pub merged_at: Option<i64>,

    /// User ids currently assigned as reviewers.
    #[sqlx(skip)]
    pub assigned_reviewers: Vec<String>,
}

impl PullRequest {
    /// Parse the status string into an enum.
    pub fn status_enum(&self) -> PullRequestStatus {
        PullRequestStatus::from(self.status.as_str())
    }

    /// Check if the pull request is still open.
    pub fn is_open(&self) -> bool {
        self.status_enum() == PullRequestStatus::Open
    }
}

/// Summary row for reviewer-workload listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PullRequestSummary {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_str() {
        assert_eq!(PullRequestStatus::from("OPEN"), PullRequestStatus::Open);
        assert_eq!(PullRequestStatus::from("merged"), PullRequestStatus::Merged);
        assert_eq!(PullRequestStatus::from("unknown"), PullRequestStatus::Open);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(PullRequestStatus::Open.to_string(), "OPEN");
        assert_eq!(PullRequestStatus::Merged.to_string(), "MERGED");
    }

    #[test]
    fn test_is_open() {
        let pr = PullRequest {
            pull_request_id: "PR-1".into(),
            pull_request_name: "Fix".into(),
            author_id: "alice".into(),
            status: "OPEN".into(),
            created_at: 0,
            merged_at: None,
            assigned_reviewers: vec![],
        };
        assert!(pr.is_open());
    }
}
