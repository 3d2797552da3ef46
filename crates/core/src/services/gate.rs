//! Submission admission pipeline.
//!
//! Combines the restriction check, rate limiter, CAPTCHA escalation, and spam
//! heuristics into a single short-circuiting decision. Nothing is persisted
//! here; on success the caller stores the content, on failure it must not.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trailhead_common::{AppError, AppResult, ModerationConfig};
use validator::Validate;

use crate::model::{ActionKind, ActorId, PlaceId, UserTrustProfile};
use crate::services::captcha::CaptchaTracker;
use crate::services::rate_limit::{RateLimitDecision, RateLimiter};
use crate::services::spam::{reason_codes, SpamChecker, SpamVerdict};

/// An incoming submission to be gated.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Submission {
    /// Who is submitting.
    pub actor: ActorId,
    /// What they are submitting.
    pub action: ActionKind,
    /// The place the submission concerns.
    pub place_id: PlaceId,
    /// Review text, report reason, or place description.
    #[validate(length(min = 1))]
    pub text: String,
    /// Hidden honeypot field value; real users never fill this.
    #[serde(default)]
    pub honeypot: String,
    /// Answer to the CAPTCHA challenge, when one was presented.
    #[serde(default)]
    pub captcha_answer: Option<String>,
}

/// Host-supplied snapshots the gate decides against.
#[derive(Debug, Clone, Default)]
pub struct GateContext {
    /// Trust profile of the submitting user, if signed in.
    pub trust: Option<UserTrustProfile>,
    /// Recent texts for the target place, newest first.
    pub recent_texts: Vec<String>,
    /// Whether the author already has an active review on this place.
    pub already_reviewed: bool,
}

/// A successful admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admission {
    /// Remaining submissions in the actor's rate window.
    pub rate_remaining: u32,
    /// Seconds until the rate window resets.
    pub reset_secs: u64,
}

/// Gate for all incoming place, review, and report submissions.
#[derive(Debug, Clone)]
pub struct SubmissionGate {
    limiter: RateLimiter,
    spam: SpamChecker,
    captcha: CaptchaTracker,
    max_text_len: usize,
}

impl SubmissionGate {
    /// Create a gate from the engine configuration.
    #[must_use]
    pub fn new(config: &ModerationConfig) -> Self {
        Self {
            limiter: RateLimiter::new(config.rate_limits),
            spam: SpamChecker::new(config.spam.clone()),
            captcha: CaptchaTracker::new(
                config.spam.captcha_suspicion_threshold,
                config.spam.suspicion_window_secs,
            ),
            max_text_len: config.spam.max_text_len,
        }
    }

    /// Admit or reject a submission.
    ///
    /// Checks short-circuit on the first failure: restriction, duplicate
    /// author review, rate limit, CAPTCHA, then spam heuristics. Only the
    /// rate-limit window and suspicion counter mutate, and only on the paths
    /// that reach them.
    pub fn admit(
        &mut self,
        submission: &Submission,
        ctx: &GateContext,
        now: DateTime<Utc>,
    ) -> AppResult<Admission> {
        submission.validate()?;
        if submission.text.chars().count() > self.max_text_len {
            return Err(AppError::Validation(format!(
                "text exceeds {} characters",
                self.max_text_len
            )));
        }

        // Restricted users may not post reviews or reports.
        if matches!(submission.action, ActionKind::Review | ActionKind::Report)
            && ctx.trust.as_ref().is_some_and(UserTrustProfile::is_restricted)
        {
            tracing::info!(
                actor = %submission.actor.key(),
                action = submission.action.as_str(),
                "submission blocked: posting restricted"
            );
            return Err(AppError::PostingRestricted);
        }

        // One active review per author per place.
        if submission.action == ActionKind::Review && ctx.already_reviewed {
            return Err(AppError::AlreadyReviewed);
        }

        match self.limiter.check(&submission.actor, submission.action, now) {
            RateLimitDecision::Limited { retry_after_secs } => {
                // A tripped limit escalates straight to CAPTCHA.
                self.captcha.require_now(&submission.actor);
                tracing::info!(
                    actor = %submission.actor.key(),
                    action = submission.action.as_str(),
                    retry_after_secs,
                    "submission blocked: rate limited"
                );
                return Err(AppError::RateLimited { retry_after_secs });
            }
            RateLimitDecision::Allowed {
                remaining,
                reset_secs,
            } => {
                let admission = Admission {
                    rate_remaining: remaining,
                    reset_secs,
                };

                if self.captcha.requires_captcha(&submission.actor, now) {
                    let challenge = self.captcha.challenge_for(&submission.actor);
                    let solved = submission
                        .captcha_answer
                        .as_deref()
                        .is_some_and(|answer| self.captcha.verify(&submission.actor, answer));
                    if !solved {
                        tracing::info!(
                            actor = %submission.actor.key(),
                            action = submission.action.as_str(),
                            "submission challenged: captcha required"
                        );
                        return Err(AppError::CaptchaRequired {
                            question: challenge.question,
                        });
                    }
                }

                match self
                    .spam
                    .evaluate(&submission.text, &submission.honeypot, &ctx.recent_texts)
                {
                    SpamVerdict::Clean => Ok(admission),
                    SpamVerdict::Suspicious(reasons) => {
                        self.captcha.record_suspicion(&submission.actor, now);
                        let codes = reason_codes(&reasons);
                        tracing::info!(
                            actor = %submission.actor.key(),
                            action = submission.action.as_str(),
                            reasons = %codes,
                            "submission blocked: suspicious content"
                        );
                        Err(AppError::SpamBlocked(codes))
                    }
                    SpamVerdict::Blocked(reasons) => {
                        let codes = reason_codes(&reasons);
                        tracing::warn!(
                            actor = %submission.actor.key(),
                            action = submission.action.as_str(),
                            reasons = %codes,
                            "submission blocked: spam signature"
                        );
                        Err(AppError::SpamBlocked(codes))
                    }
                }
            }
        }
    }

    /// Drop stale rate-limit windows and fully-decayed suspicion strikes.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        self.limiter.prune(now);
        self.captcha.prune(now);
    }
}
