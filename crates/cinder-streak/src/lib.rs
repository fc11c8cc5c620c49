//! # cinder-streak
//!
//! The streak engine. Streaks are reconciled lazily against the
//! calendar on every read: a gap longer than one day either consumes a
//! Streak Freeze from the user's inventory or resets the streak to
//! zero. Completing the daily task advances the streak at most once
//! per calendar day, pays the daily and milestone rewards through the
//! coin ledger, and fires the social synergy boost when both linked
//! partners have completed on the link's day.
//!
//! Forge stoking hangs off completion through [`StokeHook`] so this
//! crate does not depend on the forge. Hook failures are logged and
//! never fail the completion itself.

mod engine;
pub mod rewards;

pub use engine::StreakEngine;

use rusqlite::Connection;

use cinder_types::EngineError;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Side effect invoked after each successful task completion.
///
/// The forge implements this to advance the caller's active crystal.
/// Errors are reported to the caller of [`StreakEngine::complete_task`]
/// only through logs; the completion itself has already been recorded.
pub trait StokeHook: Send + Sync {
    fn stoke(&self, conn: &mut Connection, subject: &str) -> Result<()>;
}

/// Inert hook for wirings without a forge.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoStoke;

impl StokeHook for NoStoke {
    fn stoke(&self, _conn: &mut Connection, _subject: &str) -> Result<()> {
        Ok(())
    }
}

impl<T: StokeHook> StokeHook for std::sync::Arc<T> {
    fn stoke(&self, conn: &mut Connection, subject: &str) -> Result<()> {
        self.as_ref().stoke(conn, subject)
    }
}
