//! Review records and visibility.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PlaceId, UserId};

/// Visibility of a review.
///
/// The `Visible -> Hidden` transition is one-way inside this engine; hiding
/// happens only when a report against the review is upheld. Un-hiding is an
/// explicit external admin action outside this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewVisibility {
    /// Shown to the public.
    #[default]
    Visible,
    /// Hidden after an upheld report.
    Hidden,
}

/// A user-submitted review of a place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Unique identifier.
    pub id: String,
    /// The reviewed place.
    pub place_id: PlaceId,
    /// Author, if signed in. Guests may post reviews.
    pub author_id: Option<UserId>,
    /// Review body.
    pub text: String,
    /// Star rating, 1 to 5.
    pub rating: u8,
    /// Current visibility.
    pub visibility: ReviewVisibility,
    /// Guard against penalizing the author twice for the same review.
    pub penalty_applied: bool,
    /// When the review was posted.
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Create a new visible review.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        place_id: impl Into<PlaceId>,
        author_id: Option<UserId>,
        text: impl Into<String>,
        rating: u8,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            place_id: place_id.into(),
            author_id,
            text: text.into(),
            rating,
            visibility: ReviewVisibility::Visible,
            penalty_applied: false,
            created_at,
        }
    }

    /// Whether the review is currently shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visibility == ReviewVisibility::Visible
    }
}
