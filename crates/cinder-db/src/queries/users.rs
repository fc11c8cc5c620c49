//! User query functions.

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::{DbError, Result};

/// A full user row.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub subject: String,
    pub username: String,
    pub email: String,
    pub coins: i64,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub last_active: NaiveDate,
    pub push_token: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A user eligible for a scheduled notification.
#[derive(Debug, Clone)]
pub struct PushTarget {
    pub subject: String,
    pub username: String,
    pub push_token: String,
    pub current_streak: i64,
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        subject: row.get(1)?,
        username: row.get(2)?,
        email: row.get(3)?,
        coins: row.get(4)?,
        current_streak: row.get(5)?,
        longest_streak: row.get(6)?,
        last_active: row.get(7)?,
        push_token: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

/// Create the user on first sync; update the mutable profile fields after.
/// Streak counters and the activity date are never touched here.
pub fn upsert(
    conn: &Connection,
    subject: &str,
    username: &str,
    email: &str,
    today: NaiveDate,
    now: i64,
) -> Result<UserRow> {
    conn.execute(
        "INSERT INTO users (subject, username, email, last_active_date, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)
         ON CONFLICT(subject) DO UPDATE SET
             username = excluded.username,
             email = excluded.email,
             updated_at = excluded.updated_at",
        rusqlite::params![subject, username, email, today, now],
    )?;
    get_by_subject(conn, subject)
}

/// Fetch a user by external auth subject.
pub fn get_by_subject(conn: &Connection, subject: &str) -> Result<UserRow> {
    conn.query_row(
        "SELECT id, subject, username, email, coins, current_streak, longest_streak,
                last_active_date, push_token, created_at, updated_at
         FROM users WHERE subject = ?1",
        [subject],
        row_to_user,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("user '{subject}'")),
        other => other.into(),
    })
}

/// Fetch a user by internal id.
pub fn get_by_id(conn: &Connection, user_id: i64) -> Result<UserRow> {
    conn.query_row(
        "SELECT id, subject, username, email, coins, current_streak, longest_streak,
                last_active_date, push_token, created_at, updated_at
         FROM users WHERE id = ?1",
        [user_id],
        row_to_user,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("user id {user_id}")),
        other => other.into(),
    })
}

/// Overwrite the coin balance.
pub fn set_balance(conn: &Connection, user_id: i64, coins: i64, now: i64) -> Result<()> {
    let n = conn.execute(
        "UPDATE users SET coins = ?2, updated_at = ?3 WHERE id = ?1",
        rusqlite::params![user_id, coins, now],
    )?;
    if n == 0 {
        return Err(DbError::NotFound(format!("user id {user_id}")));
    }
    Ok(())
}

/// Rewrite the last activity date (streak freeze repair).
pub fn set_last_active(conn: &Connection, user_id: i64, day: NaiveDate, now: i64) -> Result<()> {
    conn.execute(
        "UPDATE users SET last_active_date = ?2, updated_at = ?3 WHERE id = ?1",
        rusqlite::params![user_id, day, now],
    )?;
    Ok(())
}

/// Drop the current streak to zero. The longest streak is untouched.
pub fn reset_streak(conn: &Connection, user_id: i64, now: i64) -> Result<()> {
    conn.execute(
        "UPDATE users SET current_streak = 0, updated_at = ?2 WHERE id = ?1",
        rusqlite::params![user_id, now],
    )?;
    Ok(())
}

/// Persist a task completion: both streak counters and the activity date
/// move in one statement.
pub fn apply_completion(
    conn: &Connection,
    user_id: i64,
    streak: i64,
    longest: i64,
    day: NaiveDate,
    now: i64,
) -> Result<()> {
    conn.execute(
        "UPDATE users
         SET current_streak = ?2, longest_streak = ?3, last_active_date = ?4, updated_at = ?5
         WHERE id = ?1",
        rusqlite::params![user_id, streak, longest, day, now],
    )?;
    Ok(())
}

/// Register or replace the push notification address.
pub fn set_push_token(conn: &Connection, subject: &str, token: &str, now: i64) -> Result<()> {
    let n = conn.execute(
        "UPDATE users SET push_token = ?2, updated_at = ?3 WHERE subject = ?1",
        rusqlite::params![subject, token, now],
    )?;
    if n == 0 {
        return Err(DbError::NotFound(format!("user '{subject}'")));
    }
    Ok(())
}

/// Case-insensitive substring search over username and email, excluding
/// the caller.
pub fn search(
    conn: &Connection,
    query: &str,
    exclude_subject: &str,
    limit: u32,
) -> Result<Vec<UserRow>> {
    let pattern = format!("%{query}%");
    let mut stmt = conn.prepare(
        "SELECT id, subject, username, email, coins, current_streak, longest_streak,
                last_active_date, push_token, created_at, updated_at
         FROM users
         WHERE (username LIKE ?1 OR email LIKE ?1) AND subject != ?2
         ORDER BY username
         LIMIT ?3",
    )?;
    let rows = stmt.query_map(
        rusqlite::params![pattern, exclude_subject, limit],
        row_to_user,
    )?;
    let mut users = Vec::new();
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}

fn row_to_target(row: &rusqlite::Row<'_>) -> rusqlite::Result<PushTarget> {
    Ok(PushTarget {
        subject: row.get(0)?,
        username: row.get(1)?,
        push_token: row.get(2)?,
        current_streak: row.get(3)?,
    })
}

/// Users with a push address who have not been active today.
pub fn reminder_targets(conn: &Connection, today: NaiveDate) -> Result<Vec<PushTarget>> {
    let mut stmt = conn.prepare(
        "SELECT subject, username, push_token, current_streak
         FROM users
         WHERE push_token IS NOT NULL AND last_active_date < ?1",
    )?;
    let rows = stmt.query_map([today], row_to_target)?;
    let mut targets = Vec::new();
    for row in rows {
        targets.push(row?);
    }
    Ok(targets)
}

/// Reminder targets who also have a live streak on the line.
pub fn warning_targets(conn: &Connection, today: NaiveDate) -> Result<Vec<PushTarget>> {
    let mut stmt = conn.prepare(
        "SELECT subject, username, push_token, current_streak
         FROM users
         WHERE push_token IS NOT NULL AND last_active_date < ?1 AND current_streak > 0",
    )?;
    let rows = stmt.query_map([today], row_to_target)?;
    let mut targets = Vec::new();
    for row in rows {
        targets.push(row?);
    }
    Ok(targets)
}
