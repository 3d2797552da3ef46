//! Domain records for the moderation engine.
//!
//! All records are plain serde types. The engine never performs I/O: records
//! enter as snapshots provided by the host store and leave as deltas the host
//! persists transactionally.

pub mod actor;
pub mod moderation_log;
pub mod place;
pub mod report;
pub mod review;
pub mod trust;

pub use actor::{ActionKind, ActorId};
pub use moderation_log::{ModerationAction, ModerationLogEntry, ModerationTarget};
pub use place::{Place, PlaceKind, PlaceStatus};
pub use report::{ReportStatus, ReviewReport};
pub use review::{Review, ReviewVisibility};
pub use trust::{RestrictionState, TrustLevel, UserTrustProfile};

/// User identifier.
pub type UserId = String;
/// Place identifier.
pub type PlaceId = String;
/// Review identifier.
pub type ReviewId = String;
/// Report identifier.
pub type ReportId = String;
