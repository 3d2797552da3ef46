//! Actor identity for submissions.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Identity performing a submission.
///
/// Guests may post reviews; their rate-limit and suspicion state is keyed by
/// an opaque session or IP key supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "id")]
pub enum ActorId {
    /// A signed-in user.
    User(UserId),
    /// An anonymous actor identified by a session or IP key.
    Anonymous(String),
}

impl ActorId {
    /// Returns the user id when the actor is signed in.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::User(id) => Some(id),
            Self::Anonymous(_) => None,
        }
    }

    /// Stable key for rate-limit and suspicion tracking.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::User(id) => format!("user:{id}"),
            Self::Anonymous(key) => format!("anon:{key}"),
        }
    }
}

/// Kind of submission being gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Posting a review on a place.
    Review,
    /// Reporting a review for moderation.
    Report,
    /// Submitting a new place.
    Place,
}

impl ActionKind {
    /// Stable string tag for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::Report => "report",
            Self::Place => "place",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_keys_are_disjoint() {
        let user = ActorId::User("alice".into());
        let anon = ActorId::Anonymous("alice".into());
        assert_ne!(user.key(), anon.key());
        assert_eq!(user.user_id(), Some("alice"));
        assert_eq!(anon.user_id(), None);
    }
}
