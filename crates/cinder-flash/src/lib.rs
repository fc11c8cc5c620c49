//! # cinder-flash
//!
//! Timed flash challenges. At most one session is live at a time; opening
//! a new one closes the old. Each user gets one graded attempt per
//! session, correct answers are paid the challenge's points, and the
//! leaderboard ranks the fastest correct answers.

use rusqlite::Connection;
use tracing::info;

use cinder_db::queries::{flash, users};
use cinder_db::DbError;
use cinder_types::flash::{AttemptOutcome, FlashSession, LeaderboardEntry};
use cinder_types::{Clock, EngineError};
use cinder_wallet::CoinLedger;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Sessions stay open for one hour.
pub const FLASH_WINDOW_SECS: i64 = 3_600;

/// Leaderboards show the ten fastest correct answers.
pub const LEADERBOARD_SIZE: u32 = 10;

const REWARD_REASON: &str = "Flash challenge reward";

/// Runs flash sessions and grades attempts.
#[derive(Clone, Debug)]
pub struct FlashEngine<C, L> {
    clock: C,
    ledger: L,
}

impl<C: Clock, L: CoinLedger> FlashEngine<C, L> {
    pub fn new(clock: C, ledger: L) -> Self {
        Self { clock, ledger }
    }

    /// Open a one-hour session over a random challenge from the pool,
    /// deactivating any prior session in the same transaction.
    pub fn open_session(&self, conn: &mut Connection) -> Result<FlashSession> {
        let now = self.clock.now_ts();
        let tx = conn.transaction().map_err(DbError::from)?;
        flash::deactivate_all(&tx)?;
        let challenge_id = flash::random_challenge(&tx)?
            .ok_or_else(|| EngineError::not_found("flash challenge pool is empty"))?;
        let session_id = flash::insert_session(&tx, challenge_id, now, now + FLASH_WINDOW_SECS)?;
        let row = flash::active_session(&tx, now)?
            .ok_or_else(|| EngineError::Store("inserted flash session not readable".into()))?;
        tx.commit().map_err(DbError::from)?;

        info!(session = session_id, challenge = challenge_id, "flash session opened");
        session_from_row(row)
    }

    /// The live session, if one exists and has not passed its end time.
    pub fn active_session(&self, conn: &Connection) -> Result<Option<FlashSession>> {
        match flash::active_session(conn, self.clock.now_ts())? {
            Some(row) => Ok(Some(session_from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Grade one answer against the session's challenge. Correct answers
    /// are credited the challenge's points; wrong answers cost nothing.
    /// Each user gets exactly one attempt per session.
    pub fn submit_attempt(
        &self,
        conn: &mut Connection,
        subject: &str,
        session_id: i64,
        choice: i64,
        elapsed_ms: i64,
    ) -> Result<AttemptOutcome> {
        let now = self.clock.now_ts();
        let grading = flash::grading(conn, session_id, now)?
            .ok_or_else(|| EngineError::invalid_state("flash session is closed or expired"))?;
        let user = users::get_by_subject(conn, subject)?;
        if flash::has_attempt(conn, user.id, session_id)? {
            return Err(EngineError::conflict("attempt already submitted"));
        }

        let correct = choice == grading.correct_index;
        flash::insert_attempt(conn, user.id, session_id, correct, elapsed_ms, now)?;

        let points_awarded = if correct {
            self.ledger
                .credit(conn, subject, grading.points, REWARD_REASON)?;
            grading.points
        } else {
            0
        };

        info!(
            subject,
            session = session_id,
            correct,
            elapsed_ms,
            "flash attempt graded"
        );
        Ok(AttemptOutcome {
            correct,
            points_awarded,
            elapsed_ms,
        })
    }

    /// Fastest correct answers for a session, best first.
    pub fn leaderboard(
        &self,
        conn: &Connection,
        session_id: i64,
    ) -> Result<Vec<LeaderboardEntry>> {
        let rows = flash::leaderboard(conn, session_id, LEADERBOARD_SIZE)?;
        Ok(rows
            .into_iter()
            .map(|r| LeaderboardEntry {
                username: r.username,
                elapsed_ms: r.time_taken_ms,
            })
            .collect())
    }
}

fn session_from_row(row: flash::SessionRow) -> Result<FlashSession> {
    let options: Vec<String> = serde_json::from_str(&row.options_json)
        .map_err(|e| EngineError::Store(format!("challenge options payload: {e}")))?;
    Ok(FlashSession {
        id: row.id,
        question: row.question,
        options,
        points: row.points,
        starts_at: row.start_time,
        ends_at: row.end_time,
    })
}
