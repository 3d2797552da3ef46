//! Per-user trust profiles and contribution levels.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Posting restriction state for a user.
///
/// The transition to `PostingRestricted` happens only when the upheld report
/// count crosses the configured threshold; it never clears automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionState {
    /// No restriction.
    #[default]
    None,
    /// Blocked from submitting reviews and reports.
    PostingRestricted,
}

/// Contribution level ladder derived from points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustLevel {
    /// 0+ points.
    NewExplorer,
    /// 50+ points.
    LocalContributor,
    /// 120+ points.
    TrustedGuide,
    /// 250+ points.
    CommunityChampion,
}

impl TrustLevel {
    const LADDER: [Self; 4] = [
        Self::NewExplorer,
        Self::LocalContributor,
        Self::TrustedGuide,
        Self::CommunityChampion,
    ];

    /// Points required to reach this level.
    #[must_use]
    pub const fn threshold(self) -> i64 {
        match self {
            Self::NewExplorer => 0,
            Self::LocalContributor => 50,
            Self::TrustedGuide => 120,
            Self::CommunityChampion => 250,
        }
    }

    /// Display name for the level.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NewExplorer => "New Explorer",
            Self::LocalContributor => "Local Contributor",
            Self::TrustedGuide => "Trusted Guide",
            Self::CommunityChampion => "Community Champion",
        }
    }

    /// The level reached at a given point total.
    #[must_use]
    pub fn for_points(points: i64) -> Self {
        let mut level = Self::NewExplorer;
        for candidate in Self::LADDER {
            if points >= candidate.threshold() {
                level = candidate;
            } else {
                break;
            }
        }
        level
    }

    /// The next level above this one, if any.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        let idx = Self::LADDER.iter().position(|l| *l == self)?;
        Self::LADDER.get(idx + 1).copied()
    }
}

/// Trust and contribution state for a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTrustProfile {
    /// The user this profile belongs to.
    pub user_id: UserId,
    /// Accumulated contribution points; may decrease via penalties.
    pub contribution_points: i64,
    /// Count of approved place submissions.
    pub places_added: u32,
    /// Count of reviews posted.
    pub reviews_added: u32,
    /// Count of upheld reports against this user's reviews.
    pub upheld_report_count: u32,
    /// Current posting restriction.
    pub restriction: RestrictionState,
}

impl UserTrustProfile {
    /// Create a fresh profile with no history.
    #[must_use]
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            contribution_points: 0,
            places_added: 0,
            reviews_added: 0,
            upheld_report_count: 0,
            restriction: RestrictionState::None,
        }
    }

    /// Whether the user is blocked from posting reviews and reports.
    #[must_use]
    pub fn is_restricted(&self) -> bool {
        self.restriction == RestrictionState::PostingRestricted
    }

    /// Current contribution level.
    #[must_use]
    pub fn level(&self) -> TrustLevel {
        TrustLevel::for_points(self.contribution_points)
    }

    /// Whether the user counts as trusted.
    #[must_use]
    pub fn is_trusted(&self) -> bool {
        self.contribution_points >= TrustLevel::TrustedGuide.threshold()
    }

    /// Points remaining to the next level, or 0 at the top level.
    #[must_use]
    pub fn points_to_next_level(&self) -> i64 {
        self.level()
            .next()
            .map_or(0, |next| next.threshold() - self.contribution_points)
    }

    /// Progress toward the next level as a percentage, 100 at the top.
    #[must_use]
    pub fn level_progress_percent(&self) -> u8 {
        let current = self.level();
        let Some(next) = current.next() else {
            return 100;
        };
        let span = next.threshold() - current.threshold();
        if span <= 0 {
            return 100;
        }
        let gained = (self.contribution_points - current.threshold()).max(0);
        ((gained * 100) / span).min(100) as u8
    }
}
