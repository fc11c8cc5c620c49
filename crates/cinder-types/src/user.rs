//! User profile and streak state structures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Full user record as returned after an account sync.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    pub subject: String,
    pub username: String,
    pub email: String,
    pub coins: i64,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub last_active: NaiveDate,
}

/// Minimal profile exposed to other users (search results, friend lists).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublicProfile {
    pub subject: String,
    pub username: String,
    pub current_streak: i64,
}

/// Streak state after a reconciliation or a task completion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StreakStatus {
    pub current_streak: i64,
    pub longest_streak: i64,
    pub last_active: NaiveDate,
    /// Set when a Streak Freeze was consumed during reconciliation.
    pub freeze_consumed: bool,
}

/// Result of a daily task completion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub status: StreakStatus,
    /// Coins credited by this completion, milestone and synergy included.
    pub coins_awarded: i64,
    /// Set when a synergy boost fired on this completion.
    pub synergy_boosted: bool,
}
