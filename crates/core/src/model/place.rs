//! Place records and moderation status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Moderation lifecycle of a place.
///
/// `Approved` and `Rejected` are terminal; rejected places are kept as an
/// audit record and are never hard-deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceStatus {
    /// Awaiting an admin decision.
    #[default]
    Pending,
    /// Visible to the public.
    Approved,
    /// Declined; retained for audit.
    Rejected,
}

/// Place type with per-variant payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PlaceKind {
    /// Heritage site.
    Heritage {
        /// Historical period, e.g. "Roman", "Victorian".
        period: String,
        /// Whether the site has listed-building status.
        listed: bool,
    },
    /// Food and drink venue.
    Food {
        /// Cuisine description.
        cuisine: String,
        /// Price band from 1 (cheap) to 3 (expensive).
        price_range: u8,
    },
    /// Bookable or outdoor activity.
    Activity {
        /// Activity description, e.g. "Hiking".
        activity_type: String,
        /// Whether booking ahead is required.
        booking_required: bool,
    },
    /// Beach or lake.
    Beach {
        /// Whether a lifeguard is on duty.
        lifeguard_present: bool,
    },
    /// Anything without type-specific fields.
    Generic,
}

impl PlaceKind {
    /// Stable category tag for logs and filtering.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Heritage { .. } => "heritage",
            Self::Food { .. } => "food",
            Self::Activity { .. } => "activity",
            Self::Beach { .. } => "beach",
            Self::Generic => "generic",
        }
    }
}

/// A crowd-sourced place submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Type tag with variant payload.
    pub kind: PlaceKind,
    /// Submitting user, if signed in.
    pub submitted_by: Option<UserId>,
    /// Moderation status, mutated only by admin action.
    pub status: PlaceStatus,
    /// When the place was submitted.
    pub created_at: DateTime<Utc>,
}

impl Place {
    /// Create a new place in the pending state.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: PlaceKind,
        submitted_by: Option<UserId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            submitted_by,
            status: PlaceStatus::Pending,
            created_at,
        }
    }

    /// Whether the place still awaits a decision.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == PlaceStatus::Pending
    }
}
