//! Per-actor rate limiting for submissions.
//!
//! Fixed-window counting per `(actor, action kind)`. The current time is
//! always an explicit argument so decisions are reproducible in tests; the
//! host is responsible for applying updates atomically per key.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use trailhead_common::{RateLimitRule, RateLimitSettings};

use crate::model::{ActionKind, ActorId};

/// Rate limit window state for a single key.
#[derive(Debug, Clone)]
struct RateLimitWindow {
    /// Action count in the current window.
    count: u32,
    /// Window start time.
    window_start: DateTime<Utc>,
}

/// Rate limit check result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// The action is allowed.
    Allowed {
        /// Remaining actions in the window.
        remaining: u32,
        /// Seconds until the window resets.
        reset_secs: u64,
    },
    /// The action is denied.
    Limited {
        /// Seconds until the actor may retry.
        retry_after_secs: u64,
    },
}

impl RateLimitDecision {
    /// Whether the action was allowed.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Submission rate limiter.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    settings: RateLimitSettings,
    windows: HashMap<(ActorId, ActionKind), RateLimitWindow>,
}

impl RateLimiter {
    /// Create a new rate limiter.
    #[must_use]
    pub fn new(settings: RateLimitSettings) -> Self {
        Self {
            settings,
            windows: HashMap::new(),
        }
    }

    /// The rule governing a given action kind.
    #[must_use]
    pub const fn rule_for(&self, kind: ActionKind) -> RateLimitRule {
        match kind {
            ActionKind::Review => self.settings.review,
            ActionKind::Report => self.settings.report,
            ActionKind::Place => self.settings.place,
        }
    }

    /// Check whether an action is allowed and record it.
    ///
    /// Increments the window count only when the action is allowed; a denied
    /// check leaves the window untouched.
    pub fn check(
        &mut self,
        actor: &ActorId,
        kind: ActionKind,
        now: DateTime<Utc>,
    ) -> RateLimitDecision {
        let rule = self.rule_for(kind);
        let window = Duration::seconds(rule.window_secs as i64);

        let state = self
            .windows
            .entry((actor.clone(), kind))
            .or_insert(RateLimitWindow {
                count: 0,
                window_start: now,
            });

        // Expired window: start a fresh one.
        if now - state.window_start >= window {
            state.count = 0;
            state.window_start = now;
        }

        let elapsed = now - state.window_start;
        let until_reset = (window - elapsed).num_seconds().max(0) as u64;

        if state.count >= rule.max_count {
            return RateLimitDecision::Limited {
                retry_after_secs: until_reset,
            };
        }

        state.count += 1;
        RateLimitDecision::Allowed {
            remaining: rule.max_count.saturating_sub(state.count),
            reset_secs: until_reset,
        }
    }

    /// Drop windows idle for at least two full window lengths.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let settings = self.settings;
        self.windows.retain(|(_, kind), state| {
            let rule = match kind {
                ActionKind::Review => settings.review,
                ActionKind::Report => settings.report,
                ActionKind::Place => settings.place,
            };
            now - state.window_start < Duration::seconds(rule.window_secs as i64 * 2)
        });
    }

    /// Number of tracked windows.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn settings(max_count: u32, window_secs: u64) -> RateLimitSettings {
        let rule = RateLimitRule::new(max_count, window_secs);
        RateLimitSettings {
            review: rule,
            report: rule,
            place: rule,
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().unwrap()
    }

    #[test]
    fn test_allows_up_to_limit_then_denies() {
        let mut limiter = RateLimiter::new(settings(5, 60));
        let actor = ActorId::User("u1".into());

        for _ in 0..5 {
            assert!(limiter.check(&actor, ActionKind::Review, t0()).is_allowed());
        }
        match limiter.check(&actor, ActionKind::Review, t0()) {
            RateLimitDecision::Limited { retry_after_secs } => {
                assert_eq!(retry_after_secs, 60);
            }
            other => panic!("expected Limited, got {other:?}"),
        }
    }

    #[test]
    fn test_window_resets_after_expiry() {
        let mut limiter = RateLimiter::new(settings(5, 60));
        let actor = ActorId::User("u1".into());

        for _ in 0..5 {
            limiter.check(&actor, ActionKind::Review, t0());
        }
        assert!(!limiter.check(&actor, ActionKind::Review, t0()).is_allowed());

        let later = t0() + Duration::seconds(60);
        assert!(limiter.check(&actor, ActionKind::Review, later).is_allowed());
    }

    #[test]
    fn test_denied_check_does_not_consume() {
        let mut limiter = RateLimiter::new(settings(1, 60));
        let actor = ActorId::Anonymous("session-9".into());

        assert!(limiter.check(&actor, ActionKind::Report, t0()).is_allowed());
        for _ in 0..3 {
            assert!(!limiter.check(&actor, ActionKind::Report, t0()).is_allowed());
        }
        // A fresh window still allows exactly max_count again.
        let later = t0() + Duration::seconds(61);
        assert!(limiter.check(&actor, ActionKind::Report, later).is_allowed());
    }

    #[test]
    fn test_keys_are_independent_per_actor_and_kind() {
        let mut limiter = RateLimiter::new(settings(1, 60));
        let alice = ActorId::User("alice".into());
        let bob = ActorId::User("bob".into());

        assert!(limiter.check(&alice, ActionKind::Review, t0()).is_allowed());
        assert!(!limiter.check(&alice, ActionKind::Review, t0()).is_allowed());
        // Different action kind for the same actor has its own window.
        assert!(limiter.check(&alice, ActionKind::Report, t0()).is_allowed());
        // Other actors are unaffected.
        assert!(limiter.check(&bob, ActionKind::Review, t0()).is_allowed());
    }

    #[test]
    fn test_remaining_counts_down() {
        let mut limiter = RateLimiter::new(settings(10, 60));
        let actor = ActorId::User("u1".into());

        match limiter.check(&actor, ActionKind::Place, t0()) {
            RateLimitDecision::Allowed { remaining, reset_secs } => {
                assert_eq!(remaining, 9);
                assert_eq!(reset_secs, 60);
            }
            other => panic!("expected Allowed, got {other:?}"),
        }
    }

    #[test]
    fn test_prune_drops_stale_windows() {
        let mut limiter = RateLimiter::new(settings(5, 60));
        limiter.check(&ActorId::User("u1".into()), ActionKind::Review, t0());
        limiter.check(&ActorId::User("u2".into()), ActionKind::Review, t0());
        assert_eq!(limiter.key_count(), 2);

        limiter.prune(t0() + Duration::seconds(121));
        assert_eq!(limiter.key_count(), 0);
    }
}
