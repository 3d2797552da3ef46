//! Common utilities and shared types for the trailhead moderation engine.
//!
//! This crate provides foundational components used across trailhead crates:
//!
//! - **Configuration**: Policy thresholds via [`ModerationConfig`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use trailhead_common::{AppResult, IdGenerator, ModerationConfig};
//!
//! fn example() -> AppResult<()> {
//!     let config = ModerationConfig::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {id}");
//!     println!("Penalty: {}", config.trust.penalty_points_per_upheld_report);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;

pub use config::{
    ModerationConfig, RateLimitRule, RateLimitSettings, SpamSettings, TrustSettings,
};
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
