//! Moderation state machine for report adjudication and place decisions.
//!
//! Admin decisions arrive as explicit commands (decision + targets + admin
//! id) and leave as state deltas: the updated records, any trust impact, and
//! an audit log entry, for the host to persist as one transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trailhead_common::{AppError, AppResult, IdGenerator, ModerationConfig};

use crate::model::{
    ModerationAction, ModerationLogEntry, ModerationTarget, Place, PlaceId, PlaceStatus,
    ReportStatus, Review, ReviewReport, ReviewVisibility, UserId, UserTrustProfile,
};
use crate::services::trust::{PenaltyOutcome, TrustEngine};

/// Admin decision on a review report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportDecision {
    /// Side with the reporter: hide the review, penalize the author.
    Uphold,
    /// Side with the author: keep the review visible.
    Dismiss,
}

/// Admin decision on a pending place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceDecision {
    /// Publish the place.
    Approve,
    /// Decline the place; it remains as an audit record.
    Reject,
}

/// State delta produced by resolving a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedReport {
    /// The report in its terminal state.
    pub report: ReviewReport,
    /// The review, hidden when the report was upheld.
    pub review: Review,
    /// Trust impact on the author, present only for a first uphold against
    /// a signed-in author.
    pub penalty: Option<PenaltyOutcome>,
    /// Audit record for the decision.
    pub log: ModerationLogEntry,
}

/// State delta produced by resolving a single place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResolution {
    /// The place in its terminal state.
    pub place: Place,
    /// The submitter's updated profile when approval awarded points.
    pub trust: Option<UserTrustProfile>,
    /// Audit record for the decision.
    pub log: ModerationLogEntry,
}

/// Outcome of a bulk place decision. Per-item failures do not abort the
/// batch.
#[derive(Debug, Clone, Default)]
pub struct PlaceBatchOutcome {
    /// Successfully transitioned places.
    pub resolved: Vec<PlaceResolution>,
    /// Places that could not transition, with the per-item error.
    pub failed: Vec<(PlaceId, AppError)>,
}

impl PlaceBatchOutcome {
    /// Whether some items succeeded and some failed.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.resolved.is_empty() && !self.failed.is_empty()
    }
}

/// Moderation state machine.
#[derive(Debug, Clone)]
pub struct ModerationService {
    trust: TrustEngine,
    id_gen: IdGenerator,
}

impl ModerationService {
    /// Create the state machine from the engine configuration.
    #[must_use]
    pub fn new(config: &ModerationConfig) -> Self {
        Self {
            trust: TrustEngine::new(config.trust),
            id_gen: IdGenerator::new(),
        }
    }

    /// Adjudicate a pending report.
    ///
    /// `author_profile` is the trust profile of the review's author, when the
    /// author is signed in. Fails with [`AppError::InvalidStateTransition`]
    /// when the report already reached a terminal state; the host applies the
    /// returned delta with compare-and-set semantics on the prior pending
    /// status, so concurrent admins cannot double-penalize.
    pub fn resolve_report(
        &self,
        report: ReviewReport,
        review: Review,
        author_profile: Option<UserTrustProfile>,
        decision: ReportDecision,
        admin_id: &UserId,
        now: DateTime<Utc>,
    ) -> AppResult<ResolvedReport> {
        if report.review_id != review.id {
            return Err(AppError::Validation(format!(
                "report {} does not reference review {}",
                report.id, review.id
            )));
        }
        if report.status != ReportStatus::Pending {
            return Err(AppError::InvalidStateTransition(format!(
                "report {} has already been resolved",
                report.id
            )));
        }

        let mut report = report;
        let mut review = review;
        report.resolved_at = Some(now);
        report.resolved_by = Some(admin_id.clone());

        match decision {
            ReportDecision::Uphold => {
                report.status = ReportStatus::Upheld;
                review.visibility = ReviewVisibility::Hidden;

                let penalty = match (&review.author_id, author_profile) {
                    (Some(author_id), Some(profile))
                        if !review.penalty_applied && *author_id == profile.user_id =>
                    {
                        review.penalty_applied = true;
                        Some(self.trust.apply_penalty(profile))
                    }
                    _ => None,
                };

                tracing::info!(
                    report_id = %report.id,
                    review_id = %review.id,
                    admin_id = %admin_id,
                    penalized = penalty.is_some(),
                    "report upheld"
                );

                let log = self.log_entry(
                    admin_id,
                    ModerationAction::ReviewUpheld,
                    ModerationTarget::Review(review.id.clone()),
                    "Upheld reported review.",
                    now,
                );
                Ok(ResolvedReport {
                    report,
                    review,
                    penalty,
                    log,
                })
            }
            ReportDecision::Dismiss => {
                report.status = ReportStatus::Dismissed;

                tracing::info!(
                    report_id = %report.id,
                    review_id = %review.id,
                    admin_id = %admin_id,
                    "report dismissed"
                );

                let log = self.log_entry(
                    admin_id,
                    ModerationAction::ReviewDismissed,
                    ModerationTarget::Review(review.id.clone()),
                    "Dismissed reported review.",
                    now,
                );
                Ok(ResolvedReport {
                    report,
                    review,
                    penalty: None,
                    log,
                })
            }
        }
    }

    /// Approve or reject a single pending place.
    ///
    /// On first-time approval the submitter's profile is awarded place
    /// points; the updated profile is returned in the delta.
    pub fn resolve_place(
        &self,
        place: Place,
        submitter_profile: Option<UserTrustProfile>,
        decision: PlaceDecision,
        admin_id: &UserId,
        now: DateTime<Utc>,
    ) -> AppResult<PlaceResolution> {
        if place.status != PlaceStatus::Pending {
            return Err(AppError::InvalidStateTransition(format!(
                "place {} is not pending",
                place.id
            )));
        }

        let mut place = place;
        let (action, trust) = match decision {
            PlaceDecision::Approve => {
                place.status = PlaceStatus::Approved;
                let trust = match (&place.submitted_by, submitter_profile) {
                    (Some(submitter), Some(profile)) if *submitter == profile.user_id => {
                        Some(self.trust.award_place(profile))
                    }
                    _ => None,
                };
                (ModerationAction::PlaceApproved, trust)
            }
            PlaceDecision::Reject => {
                place.status = PlaceStatus::Rejected;
                (ModerationAction::PlaceRejected, None)
            }
        };

        tracing::info!(
            place_id = %place.id,
            admin_id = %admin_id,
            action = action.as_str(),
            "place resolved"
        );

        let log = self.log_entry(
            admin_id,
            action,
            ModerationTarget::Place(place.id.clone()),
            match decision {
                PlaceDecision::Approve => "Approved place submission.",
                PlaceDecision::Reject => "Rejected place submission.",
            },
            now,
        );
        Ok(PlaceResolution { place, trust, log })
    }

    /// Apply one decision to a batch of places independently.
    ///
    /// Each item carries the submitter's profile snapshot for award
    /// accounting. A place in the wrong state fails on its own; the rest of
    /// the batch proceeds.
    #[must_use]
    pub fn resolve_places(
        &self,
        places: Vec<(Place, Option<UserTrustProfile>)>,
        decision: PlaceDecision,
        admin_id: &UserId,
        now: DateTime<Utc>,
    ) -> PlaceBatchOutcome {
        let mut outcome = PlaceBatchOutcome::default();
        for (place, profile) in places {
            let place_id = place.id.clone();
            match self.resolve_place(place, profile, decision, admin_id, now) {
                Ok(resolution) => outcome.resolved.push(resolution),
                Err(err) => outcome.failed.push((place_id, err)),
            }
        }
        outcome
    }

    fn log_entry(
        &self,
        admin_id: &UserId,
        action: ModerationAction,
        target: ModerationTarget,
        notes: &str,
        now: DateTime<Utc>,
    ) -> ModerationLogEntry {
        ModerationLogEntry {
            id: self.id_gen.generate(),
            actor: Some(admin_id.clone()),
            action,
            target,
            notes: notes.to_string(),
            created_at: now,
        }
    }
}
