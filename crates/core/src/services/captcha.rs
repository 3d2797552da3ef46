//! CAPTCHA escalation for repeatedly suspicious actors.
//!
//! Tracks per-actor suspicion strikes in a rolling window. Once the strike
//! count reaches the configured threshold, submissions from that actor need a
//! solved arithmetic challenge; a correct answer clears the requirement and
//! the strikes.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::ActorId;

/// An arithmetic challenge presented to a suspicious actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptchaChallenge {
    /// Question shown to the actor.
    pub question: String,
    /// Expected answer, kept server-side by the host.
    pub answer: String,
}

impl CaptchaChallenge {
    /// Generate a fresh `a + b` challenge.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let a: u32 = rng.gen_range(2..=9);
        let b: u32 = rng.gen_range(1..=8);
        Self {
            question: format!("What is {a} + {b}?"),
            answer: (a + b).to_string(),
        }
    }

    /// Check a submitted answer.
    #[must_use]
    pub fn validate(&self, submitted: &str) -> bool {
        !self.answer.is_empty() && submitted.trim() == self.answer
    }
}

/// Per-actor suspicion tracking and challenge state.
#[derive(Debug, Clone)]
pub struct CaptchaTracker {
    threshold: u32,
    window: Duration,
    strikes: HashMap<ActorId, Vec<DateTime<Utc>>>,
    pending: HashMap<ActorId, CaptchaChallenge>,
}

impl CaptchaTracker {
    /// Create a tracker with the given escalation threshold and rolling
    /// window length in seconds.
    #[must_use]
    pub fn new(threshold: u32, window_secs: u64) -> Self {
        Self {
            threshold,
            window: Duration::seconds(window_secs as i64),
            strikes: HashMap::new(),
            pending: HashMap::new(),
        }
    }

    /// Record a suspicion strike for an actor.
    pub fn record_suspicion(&mut self, actor: &ActorId, now: DateTime<Utc>) {
        let strikes = self.strikes.entry(actor.clone()).or_default();
        strikes.push(now);
        let window = self.window;
        strikes.retain(|t| now - *t < window);
    }

    /// Force the CAPTCHA requirement immediately, bypassing the counter.
    ///
    /// Used when a rate limit trips: the next submission must pass the
    /// challenge regardless of strike history.
    pub fn require_now(&mut self, actor: &ActorId) {
        self.pending
            .entry(actor.clone())
            .or_insert_with(CaptchaChallenge::generate);
    }

    /// Whether the actor must pass a CAPTCHA before submitting.
    ///
    /// Strikes older than the rolling window decay out of the count.
    pub fn requires_captcha(&mut self, actor: &ActorId, now: DateTime<Utc>) -> bool {
        if self.pending.contains_key(actor) {
            return true;
        }
        let window = self.window;
        let count = match self.strikes.get_mut(actor) {
            Some(strikes) => {
                strikes.retain(|t| now - *t < window);
                strikes.len() as u32
            }
            None => 0,
        };
        count >= self.threshold
    }

    /// The challenge the actor must solve, issuing one if needed.
    pub fn challenge_for(&mut self, actor: &ActorId) -> CaptchaChallenge {
        self.pending
            .entry(actor.clone())
            .or_insert_with(CaptchaChallenge::generate)
            .clone()
    }

    /// Number of actors with tracked strikes.
    #[must_use]
    pub fn strike_key_count(&self) -> usize {
        self.strikes.len()
    }

    /// Drop strike lists where every strike has decayed out of the window.
    ///
    /// Pending challenges are kept; they clear only through [`Self::verify`].
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let window = self.window;
        self.strikes
            .retain(|_, strikes| strikes.iter().any(|t| now - *t < window));
    }

    /// Verify an answer; success clears the requirement and the strikes.
    pub fn verify(&mut self, actor: &ActorId, submitted: &str) -> bool {
        let Some(challenge) = self.pending.get(actor) else {
            return false;
        };
        if challenge.validate(submitted) {
            self.pending.remove(actor);
            self.strikes.remove(actor);
            true
        } else {
            // Force a fresh challenge on the next attempt.
            self.pending.insert(actor.clone(), CaptchaChallenge::generate());
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().unwrap()
    }

    #[test]
    fn test_challenge_round_trip() {
        let challenge = CaptchaChallenge::generate();
        assert!(challenge.question.starts_with("What is "));
        assert!(challenge.validate(&format!(" {} ", challenge.answer)));
        assert!(!challenge.validate("not a number"));
    }

    #[test]
    fn test_escalates_after_threshold_strikes() {
        let mut tracker = CaptchaTracker::new(3, 3600);
        let actor = ActorId::Anonymous("session-1".into());

        tracker.record_suspicion(&actor, t0());
        tracker.record_suspicion(&actor, t0());
        assert!(!tracker.requires_captcha(&actor, t0()));

        tracker.record_suspicion(&actor, t0());
        assert!(tracker.requires_captcha(&actor, t0()));
    }

    #[test]
    fn test_strikes_decay_after_window() {
        let mut tracker = CaptchaTracker::new(2, 60);
        let actor = ActorId::User("u1".into());

        tracker.record_suspicion(&actor, t0());
        tracker.record_suspicion(&actor, t0());
        assert!(tracker.requires_captcha(&actor, t0()));

        let later = t0() + Duration::seconds(61);
        assert!(!tracker.requires_captcha(&actor, later));
    }

    #[test]
    fn test_verify_clears_requirement_and_strikes() {
        let mut tracker = CaptchaTracker::new(1, 3600);
        let actor = ActorId::User("u1".into());

        tracker.record_suspicion(&actor, t0());
        assert!(tracker.requires_captcha(&actor, t0()));

        let challenge = tracker.challenge_for(&actor);
        assert!(tracker.verify(&actor, &challenge.answer));
        assert!(!tracker.requires_captcha(&actor, t0()));
    }

    #[test]
    fn test_wrong_answer_rotates_challenge() {
        let mut tracker = CaptchaTracker::new(1, 3600);
        let actor = ActorId::User("u1".into());
        tracker.require_now(&actor);

        let first = tracker.challenge_for(&actor);
        assert!(!tracker.verify(&actor, "999"));
        // Still required, and the expected answer was re-rolled.
        assert!(tracker.requires_captcha(&actor, t0()));
        let second = tracker.challenge_for(&actor);
        assert!(second.validate(&second.answer));
        let _ = first;
    }

    #[test]
    fn test_prune_drops_decayed_strikes_only() {
        let mut tracker = CaptchaTracker::new(3, 60);
        let old = ActorId::Anonymous("one-off".into());
        let fresh = ActorId::User("u1".into());

        tracker.record_suspicion(&old, t0());
        tracker.record_suspicion(&fresh, t0() + Duration::seconds(50));
        assert_eq!(tracker.strike_key_count(), 2);

        tracker.prune(t0() + Duration::seconds(61));
        assert_eq!(tracker.strike_key_count(), 1);
        assert!(tracker.strikes.contains_key(&fresh));

        // A pending challenge survives pruning.
        tracker.require_now(&old);
        tracker.prune(t0() + Duration::seconds(300));
        assert_eq!(tracker.strike_key_count(), 0);
        assert!(tracker.requires_captcha(&old, t0() + Duration::seconds(300)));
    }

    #[test]
    fn test_require_now_bypasses_counter() {
        let mut tracker = CaptchaTracker::new(5, 3600);
        let actor = ActorId::Anonymous("burst".into());
        assert!(!tracker.requires_captcha(&actor, t0()));

        tracker.require_now(&actor);
        assert!(tracker.requires_captcha(&actor, t0()));
    }
}
