//! Error types for the trailhead moderation engine.

use thiserror::Error;

/// Engine result type.
pub type AppResult<T> = Result<T, AppError>;

/// Engine error type.
///
/// Every failure path in the engine is a typed outcome. The host decides
/// persistence and user messaging; [`AppError::user_message`] is safe to show
/// to the submitting user, while `Display` carries the operator detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    // === Moderation ===
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    // === Submission gating ===
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Spam blocked: {0}")]
    SpamBlocked(String),

    #[error("Captcha required: {question}")]
    CaptchaRequired { question: String },

    #[error("Posting restricted for this account")]
    PostingRestricted,

    #[error("Author has already reviewed this place")]
    AlreadyReviewed,

    // === Input / infrastructure ===
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Returns the stable error code for logs and API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidStateTransition(_) => "INVALID_STATE_TRANSITION",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::SpamBlocked(_) => "SPAM_BLOCKED",
            Self::CaptchaRequired { .. } => "CAPTCHA_REQUIRED",
            Self::PostingRestricted => "POSTING_RESTRICTED",
            Self::AlreadyReviewed => "ALREADY_REVIEWED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Returns a generic message suitable for the submitting user.
    ///
    /// Heuristic detail (which spam check fired, what the thresholds are) must
    /// not leak to submitters; it is logged for operators instead.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidStateTransition(_) => "This item has already been handled.",
            Self::RateLimited { .. } => "Too many attempts. Please try again later.",
            Self::SpamBlocked(_) => "Your submission could not be accepted.",
            Self::CaptchaRequired { .. } => {
                "Please complete the security check and submit again."
            }
            Self::PostingRestricted => {
                "Your account is currently restricted from posting reviews."
            }
            Self::AlreadyReviewed => "You have already reviewed this place.",
            Self::Validation(_) => "Your submission contains invalid content.",
            Self::NotFound(_) => "The requested item could not be found.",
            Self::Config(_) => "The service is misconfigured. Please try again later.",
        }
    }

    /// Whether the submitter may retry after correcting their input.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::CaptchaRequired { .. } | Self::Validation(_)
        )
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            AppError::InvalidStateTransition("report r1".into()).error_code(),
            "INVALID_STATE_TRANSITION"
        );
        assert_eq!(
            AppError::RateLimited {
                retry_after_secs: 30
            }
            .error_code(),
            "RATE_LIMITED"
        );
        assert_eq!(AppError::PostingRestricted.error_code(), "POSTING_RESTRICTED");
    }

    #[test]
    fn test_user_message_does_not_leak_detail() {
        let err = AppError::SpamBlocked("honeypot,duplicate_text".into());
        assert!(!err.user_message().contains("honeypot"));
        assert!(err.to_string().contains("honeypot"));
    }

    #[test]
    fn test_retriable_classification() {
        assert!(
            AppError::RateLimited {
                retry_after_secs: 5
            }
            .is_retriable()
        );
        assert!(
            AppError::CaptchaRequired {
                question: "What is 2 + 3?".into()
            }
            .is_retriable()
        );
        assert!(!AppError::PostingRestricted.is_retriable());
        assert!(!AppError::SpamBlocked("honeypot".into()).is_retriable());
    }
}
