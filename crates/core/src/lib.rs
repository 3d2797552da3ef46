//! Core moderation, trust, and anti-spam policy for trailhead.
//!
//! The engine is a set of synchronous decision functions over state
//! snapshots: the host supplies current records (rate windows, trust
//! profiles, recent texts) and persists the returned deltas. Submissions flow
//! through the [`SubmissionGate`]; admin decisions flow through the
//! [`ModerationService`]; upheld reports feed the [`TrustEngine`], whose
//! restrictions feed back into future gate decisions.

pub mod model;
pub mod services;

pub use services::*;
