//! Moderation policy services.

#![allow(missing_docs)]

pub mod captcha;
pub mod gate;
pub mod moderation;
pub mod rate_limit;
pub mod spam;
pub mod trust;

pub use captcha::{CaptchaChallenge, CaptchaTracker};
pub use gate::{Admission, GateContext, Submission, SubmissionGate};
pub use moderation::{
    ModerationService, PlaceBatchOutcome, PlaceDecision, PlaceResolution, ReportDecision,
    ResolvedReport,
};
pub use rate_limit::{RateLimitDecision, RateLimiter};
pub use spam::{normalize_text, reason_codes, similarity_ratio, SpamChecker, SpamReason, SpamVerdict};
pub use trust::{PenaltyOutcome, TrustEngine};
