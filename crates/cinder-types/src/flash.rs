//! Flash challenge structures.

use serde::{Deserialize, Serialize};

/// An open flash session with its challenge payload.
///
/// The correct option index never leaves the engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlashSession {
    pub id: i64,
    pub question: String,
    pub options: Vec<String>,
    pub points: i64,
    pub starts_at: i64,
    pub ends_at: i64,
}

/// Result of an answer submission.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttemptOutcome {
    pub correct: bool,
    /// Zero for wrong answers.
    pub points_awarded: i64,
    pub elapsed_ms: i64,
}

/// One leaderboard row. Fastest correct answers rank first.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub elapsed_ms: i64,
}
