//! Completion reward table.
//!
//! Flat daily reward plus a one-time bonus the day a streak reaches a
//! milestone. The milestone bonus is folded into the same ledger entry
//! as the daily reward.

/// Coins for any completed day.
pub const DAILY_REWARD: i64 = 10;

/// Bonus the day a streak reaches exactly 3.
pub const MILESTONE_3_BONUS: i64 = 20;

/// Bonus the day a streak reaches exactly 7.
pub const MILESTONE_7_BONUS: i64 = 50;

/// Bonus the day a streak reaches exactly 30.
pub const MILESTONE_30_BONUS: i64 = 100;

/// Coins credited to each member of a synergy link when it fires.
pub const SYNERGY_BONUS: i64 = 5;

/// Ledger reason for each half of a synergy boost.
pub const SYNERGY_REASON: &str = "Social synergy bonus";

/// Total coins and ledger reason for a completion that lands on
/// `streak`. Non-milestone days pay the flat daily reward.
pub fn completion_award(streak: i64) -> (i64, String) {
    match streak {
        3 => (
            DAILY_REWARD + MILESTONE_3_BONUS,
            "3-day streak bonus".to_string(),
        ),
        7 => (
            DAILY_REWARD + MILESTONE_7_BONUS,
            "7-day week streak bonus".to_string(),
        ),
        30 => (
            DAILY_REWARD + MILESTONE_30_BONUS,
            "30-day monthly streak legend".to_string(),
        ),
        n => (DAILY_REWARD, format!("Streak day {n}")),
    }
}
