//! Engine configuration.

use serde::Deserialize;

/// Top-level moderation engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModerationConfig {
    /// Rate limit rules per submission kind.
    #[serde(default)]
    pub rate_limits: RateLimitSettings,
    /// Spam heuristic thresholds.
    #[serde(default)]
    pub spam: SpamSettings,
    /// Trust and penalty parameters.
    #[serde(default)]
    pub trust: TrustSettings,
}

/// A single fixed-window rate limit rule.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RateLimitRule {
    /// Maximum allowed actions per window.
    pub max_count: u32,
    /// Window duration in seconds.
    pub window_secs: u64,
}

impl RateLimitRule {
    /// Create a new rule.
    #[must_use]
    pub const fn new(max_count: u32, window_secs: u64) -> Self {
        Self {
            max_count,
            window_secs,
        }
    }
}

/// Rate limit rules for the submission kinds the engine gates.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RateLimitSettings {
    /// Review submissions.
    #[serde(default = "default_review_limit")]
    pub review: RateLimitRule,
    /// Review reports.
    #[serde(default = "default_report_limit")]
    pub report: RateLimitRule,
    /// New place submissions.
    #[serde(default = "default_place_limit")]
    pub place: RateLimitRule,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            review: default_review_limit(),
            report: default_report_limit(),
            place: default_place_limit(),
        }
    }
}

const fn default_review_limit() -> RateLimitRule {
    RateLimitRule::new(20, 3600)
}

const fn default_report_limit() -> RateLimitRule {
    RateLimitRule::new(30, 3600)
}

const fn default_place_limit() -> RateLimitRule {
    RateLimitRule::new(10, 3600)
}

/// Spam heuristic thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct SpamSettings {
    /// Similarity ratio at or above which two texts count as duplicates.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    /// Minimum normalized length before the similarity check applies.
    #[serde(default = "default_min_compare_len")]
    pub min_compare_len: usize,
    /// How many recent texts per place are compared.
    #[serde(default = "default_recent_texts_window")]
    pub recent_texts_window: usize,
    /// Maximum number of links allowed in a submission.
    #[serde(default = "default_max_links")]
    pub max_links: usize,
    /// Maximum submission text length in characters.
    #[serde(default = "default_max_text_len")]
    pub max_text_len: usize,
    /// Words that block a submission outright.
    #[serde(default)]
    pub banned_words: Vec<String>,
    /// Suspicious submissions within the window before CAPTCHA is required.
    #[serde(default = "default_captcha_suspicion_threshold")]
    pub captcha_suspicion_threshold: u32,
    /// Rolling window for the suspicion counter, in seconds.
    #[serde(default = "default_suspicion_window_secs")]
    pub suspicion_window_secs: u64,
}

impl Default for SpamSettings {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            min_compare_len: default_min_compare_len(),
            recent_texts_window: default_recent_texts_window(),
            max_links: default_max_links(),
            max_text_len: default_max_text_len(),
            banned_words: Vec::new(),
            captcha_suspicion_threshold: default_captcha_suspicion_threshold(),
            suspicion_window_secs: default_suspicion_window_secs(),
        }
    }
}

const fn default_similarity_threshold() -> f64 {
    0.85
}

const fn default_min_compare_len() -> usize {
    25
}

const fn default_recent_texts_window() -> usize {
    50
}

const fn default_max_links() -> usize {
    2
}

const fn default_max_text_len() -> usize {
    1200
}

const fn default_captcha_suspicion_threshold() -> u32 {
    3
}

const fn default_suspicion_window_secs() -> u64 {
    3600
}

/// Trust and penalty parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TrustSettings {
    /// Points removed per upheld report against an author.
    #[serde(default = "default_penalty_points")]
    pub penalty_points_per_upheld_report: i64,
    /// Upheld reports before posting is restricted.
    #[serde(default = "default_restriction_threshold")]
    pub restriction_threshold_upheld_reports: u32,
    /// Points awarded for posting a review.
    #[serde(default = "default_review_award_points")]
    pub review_award_points: i64,
    /// Points awarded when a submitted place is approved.
    #[serde(default = "default_place_award_points")]
    pub place_award_points: i64,
}

impl Default for TrustSettings {
    fn default() -> Self {
        Self {
            penalty_points_per_upheld_report: default_penalty_points(),
            restriction_threshold_upheld_reports: default_restriction_threshold(),
            review_award_points: default_review_award_points(),
            place_award_points: default_place_award_points(),
        }
    }
}

const fn default_penalty_points() -> i64 {
    30
}

const fn default_restriction_threshold() -> u32 {
    3
}

const fn default_review_award_points() -> i64 {
    10
}

const fn default_place_award_points() -> i64 {
    50
}

impl ModerationConfig {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `TRAILHEAD_ENV`)
    /// 3. Environment variables with `TRAILHEAD_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("TRAILHEAD_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TRAILHEAD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_policy_constants() {
        let config = ModerationConfig::default();
        assert_eq!(config.rate_limits.review.max_count, 20);
        assert_eq!(config.rate_limits.review.window_secs, 3600);
        assert_eq!(config.spam.similarity_threshold, 0.85);
        assert_eq!(config.spam.min_compare_len, 25);
        assert_eq!(config.trust.penalty_points_per_upheld_report, 30);
        assert_eq!(config.trust.restriction_threshold_upheld_reports, 3);
        assert_eq!(config.trust.place_award_points, 50);
    }

    #[test]
    fn test_deserialize_partial_overrides() {
        let toml = r#"
            [spam]
            similarity_threshold = 0.9
            banned_words = ["badword"]

            [trust]
            restriction_threshold_upheld_reports = 5
        "#;
        let config: ModerationConfig = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .and_then(config::Config::try_deserialize)
            .unwrap();

        assert_eq!(config.spam.similarity_threshold, 0.9);
        assert_eq!(config.spam.banned_words, vec!["badword".to_string()]);
        assert_eq!(config.trust.restriction_threshold_upheld_reports, 5);
        // Untouched sections keep their defaults.
        assert_eq!(config.rate_limits.report.max_count, 30);
        assert_eq!(config.trust.penalty_points_per_upheld_report, 30);
    }
}
