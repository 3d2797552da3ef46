//! Review report records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ReviewId, UserId};

/// Disposition of a review report.
///
/// `Upheld` and `Dismissed` are terminal; a report's status is set exactly
/// once by an admin decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Awaiting adjudication.
    #[default]
    Pending,
    /// Resolved in the reporter's favor; hides the review and penalizes the
    /// author.
    Upheld,
    /// Resolved against the reporter; the review stays visible.
    Dismissed,
}

/// An abuse report filed against a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewReport {
    /// Unique identifier.
    pub id: String,
    /// The reported review.
    pub review_id: ReviewId,
    /// The user who filed the report.
    pub reporter_id: UserId,
    /// Free-text reason from the reporter.
    pub reason: String,
    /// Current disposition.
    pub status: ReportStatus,
    /// When the report was filed.
    pub created_at: DateTime<Utc>,
    /// When the report was adjudicated.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Admin who adjudicated the report.
    pub resolved_by: Option<UserId>,
}

impl ReviewReport {
    /// Create a new pending report.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        review_id: impl Into<ReviewId>,
        reporter_id: impl Into<UserId>,
        reason: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            review_id: review_id.into(),
            reporter_id: reporter_id.into(),
            reason: reason.into(),
            status: ReportStatus::Pending,
            created_at,
            resolved_at: None,
            resolved_by: None,
        }
    }

    /// Whether the report has reached a terminal state.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.status != ReportStatus::Pending
    }
}
