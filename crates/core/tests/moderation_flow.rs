//! End-to-end flow: gated submissions, report adjudication, trust fallout.

#![allow(clippy::unwrap_used)]

use chrono::{DateTime, TimeZone, Utc};
use trailhead_common::{AppError, ModerationConfig};
use trailhead_core::model::{
    ActionKind, ActorId, Place, PlaceKind, PlaceStatus, ReportStatus, Review, ReviewReport,
    TrustLevel, UserTrustProfile,
};
use trailhead_core::{
    GateContext, ModerationService, PlaceDecision, ReportDecision, Submission, SubmissionGate,
    TrustEngine,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).single().unwrap()
}

fn review_submission(actor: &ActorId, place_id: &str, text: &str) -> Submission {
    Submission {
        actor: actor.clone(),
        action: ActionKind::Review,
        place_id: place_id.into(),
        text: text.into(),
        honeypot: String::new(),
        captcha_answer: None,
    }
}

#[test]
fn review_lifecycle_from_submission_to_restriction() {
    let config = ModerationConfig::default();
    let mut gate = SubmissionGate::new(&config);
    let moderation = ModerationService::new(&config);
    let trust = TrustEngine::new(config.trust);

    let author = ActorId::User("wanderer".to_string());
    let admin = "admin-1".to_string();

    // The author posts three reviews on three places; each is admitted and
    // awarded points.
    let mut profile = UserTrustProfile::new("wanderer");
    let mut reviews = Vec::new();
    for (i, text) in [
        "The coastal path has breathtaking views at every turn of the trail.",
        "A cosy little tearoom with generous portions and friendly staff.",
        "Great adventure playground, our kids did not want to leave at all.",
    ]
    .iter()
    .enumerate()
    {
        let submission = review_submission(&author, &format!("place-{i}"), text);
        let ctx = GateContext {
            trust: Some(profile.clone()),
            ..GateContext::default()
        };
        gate.admit(&submission, &ctx, t0()).unwrap();

        profile = trust.award_review(profile);
        reviews.push(Review::new(
            format!("rev-{i}"),
            format!("place-{i}"),
            Some("wanderer".to_string()),
            *text,
            4,
            t0(),
        ));
    }
    assert_eq!(profile.contribution_points, 30);
    assert_eq!(profile.reviews_added, 3);

    // Each review gets reported and upheld. The third uphold restricts the
    // author.
    for (i, review) in reviews.into_iter().enumerate() {
        let report = ReviewReport::new(
            format!("rep-{i}"),
            review.id.clone(),
            "vigilant-reader",
            "Reads like an advert",
            t0(),
        );
        let resolved = moderation
            .resolve_report(
                report,
                review,
                Some(profile.clone()),
                ReportDecision::Uphold,
                &admin,
                t0(),
            )
            .unwrap();

        assert_eq!(resolved.report.status, ReportStatus::Upheld);
        assert!(!resolved.review.is_visible());
        profile = resolved.penalty.unwrap().profile;
    }

    assert_eq!(profile.upheld_report_count, 3);
    assert_eq!(profile.contribution_points, 0); // 30 points, 3 x 30 penalty, clamped
    assert!(profile.is_restricted());
    assert_eq!(profile.level(), TrustLevel::NewExplorer);

    // Future review submissions from the restricted author are blocked
    // before any other check runs.
    let submission = review_submission(&author, "place-9", "One more honest opinion.");
    let ctx = GateContext {
        trust: Some(profile),
        ..GateContext::default()
    };
    assert_eq!(
        gate.admit(&submission, &ctx, t0()).unwrap_err(),
        AppError::PostingRestricted
    );
}

#[test]
fn dismissed_report_leaves_everything_untouched() {
    let config = ModerationConfig::default();
    let moderation = ModerationService::new(&config);

    let review = Review::new(
        "rev-1",
        "place-1",
        Some("wanderer".to_string()),
        "Genuinely useful accessibility notes at the entrance.",
        5,
        t0(),
    );
    let report = ReviewReport::new("rep-1", "rev-1", "grudge-holder", "I disagree", t0());
    let profile = UserTrustProfile {
        contribution_points: 60,
        ..UserTrustProfile::new("wanderer")
    };

    let resolved = moderation
        .resolve_report(
            report,
            review,
            Some(profile),
            ReportDecision::Dismiss,
            &"admin-1".to_string(),
            t0(),
        )
        .unwrap();

    assert_eq!(resolved.report.status, ReportStatus::Dismissed);
    assert!(resolved.review.is_visible());
    assert!(!resolved.review.penalty_applied);
    assert!(resolved.penalty.is_none());
}

#[test]
fn bulk_place_approval_reports_partial_success() {
    let config = ModerationConfig::default();
    let moderation = ModerationService::new(&config);

    let fresh = |id: &str| {
        Place::new(
            id,
            "Windmill Fields",
            PlaceKind::Generic,
            Some("scout".to_string()),
            t0(),
        )
    };
    let mut already_approved = fresh("p2");
    already_approved.status = PlaceStatus::Approved;

    let profile = UserTrustProfile::new("scout");
    let outcome = moderation.resolve_places(
        vec![
            (fresh("p1"), Some(profile.clone())),
            (already_approved, Some(profile.clone())),
            (fresh("p3"), Some(profile)),
        ],
        PlaceDecision::Approve,
        &"admin-1".to_string(),
        t0(),
    );

    assert!(outcome.is_partial());
    assert_eq!(outcome.resolved.len(), 2);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].0, "p2");

    // Each successful approval awarded place points against the supplied
    // snapshot.
    for resolution in &outcome.resolved {
        assert_eq!(resolution.place.status, PlaceStatus::Approved);
        let trust = resolution.trust.as_ref().unwrap();
        assert_eq!(trust.contribution_points, 50);
        assert_eq!(trust.places_added, 1);
    }
}

#[test]
fn suspicious_submitter_is_walked_through_captcha_and_back() {
    let config = ModerationConfig {
        spam: trailhead_common::SpamSettings {
            captcha_suspicion_threshold: 1,
            ..trailhead_common::SpamSettings::default()
        },
        ..ModerationConfig::default()
    };
    let mut gate = SubmissionGate::new(&config);
    let actor = ActorId::Anonymous("session-42".to_string());

    // A near-duplicate gets rejected and strikes the suspicion counter.
    let ctx = GateContext {
        recent_texts: vec![
            "The rooftop terrace does the best sunset views in town.".to_string(),
        ],
        ..GateContext::default()
    };
    let duplicate = review_submission(
        &actor,
        "place-1",
        "The rooftop terrace does the best sunset views in town!!",
    );
    assert!(matches!(
        gate.admit(&duplicate, &ctx, t0()).unwrap_err(),
        AppError::SpamBlocked(_)
    ));

    // The next submission is challenged.
    let clean = review_submission(&actor, "place-1", "Quiet midweek, plenty of space to sit.");
    let question = match gate.admit(&clean, &GateContext::default(), t0()).unwrap_err() {
        AppError::CaptchaRequired { question } => question,
        other => panic!("expected CaptchaRequired, got {other:?}"),
    };
    assert!(question.starts_with("What is "));

    // Solving the arithmetic clears the requirement and the submission goes
    // through in the same call.
    let (a, b) = parse_question(&question);
    let solved = Submission {
        captcha_answer: Some((a + b).to_string()),
        ..clean.clone()
    };
    assert!(gate.admit(&solved, &GateContext::default(), t0()).is_ok());

    // And stays clear afterwards.
    let followup = review_submission(&actor, "place-2", "The cliff walk is worth the climb.");
    assert!(gate.admit(&followup, &GateContext::default(), t0()).is_ok());
}

fn parse_question(question: &str) -> (u32, u32) {
    // "What is {a} + {b}?"
    let mut numbers = question
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u32>().unwrap());
    (numbers.next().unwrap(), numbers.next().unwrap())
}
