//! Audit log entries for moderation actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Admin action being logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    /// A pending place was approved.
    PlaceApproved,
    /// A pending place was rejected.
    PlaceRejected,
    /// A report against a review was upheld.
    ReviewUpheld,
    /// A report against a review was dismissed.
    ReviewDismissed,
}

impl ModerationAction {
    /// Stable string tag for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlaceApproved => "place_approved",
            Self::PlaceRejected => "place_rejected",
            Self::ReviewUpheld => "review_upheld",
            Self::ReviewDismissed => "review_dismissed",
        }
    }
}

/// Entity a moderation action targeted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum ModerationTarget {
    /// A place, by id.
    Place(String),
    /// A review, by id.
    Review(String),
}

/// Immutable audit record emitted with every admin decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationLogEntry {
    /// Unique identifier.
    pub id: String,
    /// Admin who acted, if known.
    pub actor: Option<UserId>,
    /// What happened.
    pub action: ModerationAction,
    /// What it happened to.
    pub target: ModerationTarget,
    /// Free-text audit context.
    pub notes: String,
    /// When the action happened.
    pub created_at: DateTime<Utc>,
}
