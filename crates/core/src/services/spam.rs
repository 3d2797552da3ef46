//! Anti-spam heuristics for submission text.
//!
//! Honeypot detection, duplicate/similarity checks against recent texts for
//! the same place, and content screens (banned words, excessive links). All
//! comparisons run over snapshots supplied by the caller; nothing is stored.

use once_cell::sync::Lazy;
use regex::Regex;
use trailhead_common::SpamSettings;

// Patterns are literals; compilation cannot fail.
#[allow(clippy::unwrap_used)]
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

#[allow(clippy::unwrap_used)]
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

#[allow(clippy::unwrap_used)]
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://|www\.").unwrap());

/// Reason tag attached to a spam verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpamReason {
    /// The hidden honeypot field was filled in.
    Honeypot,
    /// The text duplicates or closely matches a recent text.
    DuplicateText,
    /// A CAPTCHA was required but not satisfied.
    CaptchaRequired,
    /// Too many links in the text.
    ExcessiveLinks,
    /// The text matched the banned word list.
    BannedLanguage,
}

impl SpamReason {
    /// Stable reason code for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Honeypot => "honeypot",
            Self::DuplicateText => "duplicate_text",
            Self::CaptchaRequired => "captcha_required",
            Self::ExcessiveLinks => "excessive_links",
            Self::BannedLanguage => "banned_language",
        }
    }
}

/// Join reason codes for operator-facing error detail.
#[must_use]
pub fn reason_codes(reasons: &[SpamReason]) -> String {
    reasons
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Outcome of evaluating a submission against the spam heuristics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpamVerdict {
    /// Nothing flagged.
    Clean,
    /// Flagged but plausibly human; counts toward CAPTCHA escalation.
    Suspicious(Vec<SpamReason>),
    /// Definite automation or policy violation.
    Blocked(Vec<SpamReason>),
}

/// Normalize text for similarity comparison.
///
/// Lowercases, strips punctuation, and collapses whitespace.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Similarity ratio of two strings in `0.0..=1.0`.
///
/// Longest-common-subsequence ratio `2*lcs / (len_a + len_b)` over chars,
/// matching the shape of Python's `difflib.SequenceMatcher.ratio()` that the
/// policy thresholds were tuned against.
#[must_use]
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let mut prev = vec![0_usize; b.len() + 1];
    let mut curr = vec![0_usize; b.len() + 1];
    for ca in &a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    let lcs = prev[b.len()];
    (2.0 * lcs as f64) / (a.len() + b.len()) as f64
}

/// Spam heuristics engine.
#[derive(Debug, Clone)]
pub struct SpamChecker {
    settings: SpamSettings,
    banned_patterns: Vec<Regex>,
}

impl SpamChecker {
    /// Create a new checker, compiling the banned-word patterns once.
    #[must_use]
    pub fn new(settings: SpamSettings) -> Self {
        // regex::escape keeps every configured word a valid literal pattern.
        let banned_patterns = settings
            .banned_words
            .iter()
            .filter_map(|word| {
                Regex::new(&format!(r"\b{}\b", regex::escape(&word.to_lowercase()))).ok()
            })
            .collect();
        Self {
            settings,
            banned_patterns,
        }
    }

    /// Evaluate a submission.
    ///
    /// `recent_texts` are the most recent texts for the same place, newest
    /// first, as provided by the host store.
    #[must_use]
    pub fn evaluate(&self, text: &str, honeypot: &str, recent_texts: &[String]) -> SpamVerdict {
        // Bot signature; nothing else matters.
        if !honeypot.trim().is_empty() {
            return SpamVerdict::Blocked(vec![SpamReason::Honeypot]);
        }

        let mut blocked = Vec::new();
        let mut suspicious = Vec::new();

        if self.hits_banned_word(text) {
            blocked.push(SpamReason::BannedLanguage);
        }
        if LINK.find_iter(&text.to_lowercase()).count() > self.settings.max_links {
            suspicious.push(SpamReason::ExcessiveLinks);
        }
        if self.is_duplicate_or_similar(text, recent_texts) {
            suspicious.push(SpamReason::DuplicateText);
        }

        if !blocked.is_empty() {
            blocked.extend(suspicious);
            return SpamVerdict::Blocked(blocked);
        }
        if suspicious.is_empty() {
            SpamVerdict::Clean
        } else {
            SpamVerdict::Suspicious(suspicious)
        }
    }

    fn hits_banned_word(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.banned_patterns.iter().any(|re| re.is_match(&lowered))
    }

    fn is_duplicate_or_similar(&self, text: &str, recent_texts: &[String]) -> bool {
        let candidate = normalize_text(text);
        if candidate.is_empty() {
            return false;
        }

        let window = recent_texts
            .iter()
            .take(self.settings.recent_texts_window);

        for existing in window {
            // Exact duplicate of an existing text, case-insensitive.
            if existing.eq_ignore_ascii_case(text) {
                return true;
            }

            let existing_normalized = normalize_text(existing);
            if existing_normalized.is_empty() {
                continue;
            }
            if candidate.chars().count() >= self.settings.min_compare_len
                && existing_normalized.chars().count() >= self.settings.min_compare_len
                && similarity_ratio(&candidate, &existing_normalized)
                    >= self.settings.similarity_threshold
            {
                return true;
            }
        }
        false
    }
}
