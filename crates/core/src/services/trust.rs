//! Trust scoring: penalties for upheld reports, awards for contributions.
//!
//! Pure functions over trust profile snapshots. Idempotency per report is the
//! caller's responsibility; the moderation state machine invokes the penalty
//! exactly once per report, guarded by the report's one-way status
//! transition and the review's `penalty_applied` flag.

use serde::{Deserialize, Serialize};
use trailhead_common::TrustSettings;

use crate::model::{RestrictionState, UserTrustProfile};

/// Result of applying a penalty to a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyOutcome {
    /// The updated profile delta for the host to persist atomically.
    pub profile: UserTrustProfile,
    /// Points actually removed (less than the configured penalty when the
    /// balance clamped at zero).
    pub points_deducted: i64,
    /// Whether this penalty newly triggered the posting restriction.
    pub restriction_triggered: bool,
}

/// Trust and penalty engine.
#[derive(Debug, Clone)]
pub struct TrustEngine {
    settings: TrustSettings,
}

impl TrustEngine {
    /// Create a new engine.
    #[must_use]
    pub const fn new(settings: TrustSettings) -> Self {
        Self { settings }
    }

    /// Apply the penalty for one upheld report against the author.
    ///
    /// Decrements points (clamped at zero), increments the upheld report
    /// count, and sets the posting restriction when the count reaches the
    /// configured threshold. The restriction never clears here.
    #[must_use]
    pub fn apply_penalty(&self, profile: UserTrustProfile) -> PenaltyOutcome {
        let mut profile = profile;
        let before = profile.contribution_points;
        profile.contribution_points =
            (before - self.settings.penalty_points_per_upheld_report).max(0);
        profile.upheld_report_count += 1;

        let already_restricted = profile.restriction == RestrictionState::PostingRestricted;
        let restriction_triggered = !already_restricted
            && profile.upheld_report_count >= self.settings.restriction_threshold_upheld_reports;
        if restriction_triggered {
            profile.restriction = RestrictionState::PostingRestricted;
            tracing::warn!(
                user_id = %profile.user_id,
                upheld_report_count = profile.upheld_report_count,
                "posting restriction activated"
            );
        }

        PenaltyOutcome {
            points_deducted: before - profile.contribution_points,
            restriction_triggered,
            profile,
        }
    }

    /// Award points for a posted review.
    #[must_use]
    pub fn award_review(&self, profile: UserTrustProfile) -> UserTrustProfile {
        let mut profile = profile;
        profile.reviews_added += 1;
        profile.contribution_points += self.settings.review_award_points;
        profile
    }

    /// Award points for a place submission approved for the first time.
    #[must_use]
    pub fn award_place(&self, profile: UserTrustProfile) -> UserTrustProfile {
        let mut profile = profile;
        profile.places_added += 1;
        profile.contribution_points += self.settings.place_award_points;
        profile
    }
}
