//! # cinder-types
//!
//! Shared domain types used across the Cinder workspace: user and economy
//! structures, the engine error taxonomy, and the clock abstraction that
//! keeps calendar-day logic deterministic under test.

pub mod clock;
pub mod error;
pub mod flash;
pub mod forge;
pub mod shop;
pub mod social;
pub mod user;
pub mod wallet;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::EngineError;

/// Internal row id for a user.
pub type UserId = i64;

/// Catalog name of the item consumed automatically to repair a lapsed
/// streak. The streak engine looks it up by this exact name.
pub const STREAK_FREEZE_ITEM: &str = "Streak Freeze";
