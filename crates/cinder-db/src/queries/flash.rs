//! Flash challenge and session query functions.

use rusqlite::Connection;

use crate::Result;

/// A live flash session joined with its challenge payload. The correct
/// index is deliberately absent; grading uses [`grading`].
#[derive(Debug, Clone)]
pub struct SessionRow {
    pub id: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub question: String,
    pub options_json: String,
    pub points: i64,
}

/// Grading data for a submission.
#[derive(Debug, Clone)]
pub struct GradingRow {
    pub correct_index: i64,
    pub points: i64,
}

/// One leaderboard row.
#[derive(Debug, Clone)]
pub struct LeaderRow {
    pub username: String,
    pub time_taken_ms: i64,
}

/// Pick a uniformly random challenge from the pool.
pub fn random_challenge(conn: &Connection) -> Result<Option<i64>> {
    match conn.query_row(
        "SELECT id FROM flash_challenges ORDER BY RANDOM() LIMIT 1",
        [],
        |row| row.get(0),
    ) {
        Ok(id) => Ok(Some(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Clear the active flag on every session.
pub fn deactivate_all(conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE flash_sessions SET is_active = 0 WHERE is_active = 1",
        [],
    )?;
    Ok(())
}

/// Insert a new live session and return its id.
pub fn insert_session(conn: &Connection, challenge_id: i64, start: i64, end: i64) -> Result<i64> {
    conn.execute(
        "INSERT INTO flash_sessions (challenge_id, start_time, end_time, is_active)
         VALUES (?1, ?2, ?3, 1)",
        rusqlite::params![challenge_id, start, end],
    )?;
    Ok(conn.last_insert_rowid())
}

/// The live session containing `now`, with its challenge payload.
pub fn active_session(conn: &Connection, now: i64) -> Result<Option<SessionRow>> {
    match conn.query_row(
        "SELECT fs.id, fs.start_time, fs.end_time, fc.question, fc.options, fc.points
         FROM flash_sessions fs
         JOIN flash_challenges fc ON fc.id = fs.challenge_id
         WHERE fs.is_active = 1 AND fs.start_time <= ?1 AND ?1 < fs.end_time
         ORDER BY fs.id DESC
         LIMIT 1",
        [now],
        |row| {
            Ok(SessionRow {
                id: row.get(0)?,
                start_time: row.get(1)?,
                end_time: row.get(2)?,
                question: row.get(3)?,
                options_json: row.get(4)?,
                points: row.get(5)?,
            })
        },
    ) {
        Ok(session) => Ok(Some(session)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Grading data for the given session, provided it is still live at `now`.
pub fn grading(conn: &Connection, session_id: i64, now: i64) -> Result<Option<GradingRow>> {
    match conn.query_row(
        "SELECT fc.correct_index, fc.points
         FROM flash_sessions fs
         JOIN flash_challenges fc ON fc.id = fs.challenge_id
         WHERE fs.id = ?1 AND fs.is_active = 1 AND ?2 < fs.end_time",
        rusqlite::params![session_id, now],
        |row| {
            Ok(GradingRow {
                correct_index: row.get(0)?,
                points: row.get(1)?,
            })
        },
    ) {
        Ok(grading) => Ok(Some(grading)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Whether the user already has an attempt on this session.
pub fn has_attempt(conn: &Connection, user_id: i64, session_id: i64) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM flash_attempts WHERE user_id = ?1 AND session_id = ?2",
        rusqlite::params![user_id, session_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Record an attempt. The UNIQUE(user, session) constraint backs the
/// caller's pre-check.
pub fn insert_attempt(
    conn: &Connection,
    user_id: i64,
    session_id: i64,
    is_correct: bool,
    elapsed_ms: i64,
    now: i64,
) -> Result<()> {
    conn.execute(
        "INSERT INTO flash_attempts (user_id, session_id, is_correct, time_taken_ms, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![user_id, session_id, is_correct, elapsed_ms, now],
    )?;
    Ok(())
}

/// Correct attempts only, fastest first.
pub fn leaderboard(conn: &Connection, session_id: i64, limit: u32) -> Result<Vec<LeaderRow>> {
    let mut stmt = conn.prepare(
        "SELECT u.username, fa.time_taken_ms
         FROM flash_attempts fa
         JOIN users u ON u.id = fa.user_id
         WHERE fa.session_id = ?1 AND fa.is_correct = 1
         ORDER BY fa.time_taken_ms ASC
         LIMIT ?2",
    )?;
    let rows = stmt.query_map(rusqlite::params![session_id, limit], |row| {
        Ok(LeaderRow {
            username: row.get(0)?,
            time_taken_ms: row.get(1)?,
        })
    })?;
    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?);
    }
    Ok(entries)
}
