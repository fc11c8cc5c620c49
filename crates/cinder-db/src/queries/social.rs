//! Social graph query functions.
//!
//! Friendship and synergy rows are keyed on the canonical pair: callers
//! pass `(lo, hi)` with `lo < hi`, the schema enforces it with a CHECK.

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::Result;

/// A friendship joined with the counterpart's profile.
#[derive(Debug, Clone)]
pub struct FriendRow {
    pub status: String,
    pub subject: String,
    pub username: String,
    pub current_streak: i64,
}

/// A synergy link with both members' activity dates, for boost checks.
#[derive(Debug, Clone)]
pub struct LinkRow {
    pub id: i64,
    pub user_lo: i64,
    pub user_hi: i64,
    pub is_boosted: bool,
    pub lo_last_active: NaiveDate,
    pub hi_last_active: NaiveDate,
}

/// A synergy link as presented to one member.
#[derive(Debug, Clone)]
pub struct SynergyRow {
    pub partner_username: String,
    pub link_date: NaiveDate,
    pub is_boosted: bool,
}

/// Record a friendship. Returns false when the pair already exists.
pub fn add_friendship(conn: &Connection, lo: i64, hi: i64, now: i64) -> Result<bool> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO friendships (user_lo, user_hi, status, created_at)
         VALUES (?1, ?2, 'pending', ?3)",
        rusqlite::params![lo, hi, now],
    )?;
    Ok(n > 0)
}

/// Every friendship involving the user, pending and accepted alike, each
/// joined with the other party.
pub fn friends_of(conn: &Connection, user_id: i64) -> Result<Vec<FriendRow>> {
    let mut stmt = conn.prepare(
        "SELECT f.status, u.subject, u.username, u.current_streak
         FROM friendships f
         JOIN users u ON u.id = CASE WHEN f.user_lo = ?1 THEN f.user_hi ELSE f.user_lo END
         WHERE f.user_lo = ?1 OR f.user_hi = ?1
         ORDER BY f.created_at DESC, f.id DESC",
    )?;
    let rows = stmt.query_map([user_id], |row| {
        Ok(FriendRow {
            status: row.get(0)?,
            subject: row.get(1)?,
            username: row.get(2)?,
            current_streak: row.get(3)?,
        })
    })?;
    let mut friends = Vec::new();
    for row in rows {
        friends.push(row?);
    }
    Ok(friends)
}

/// Record a synergy link for the day. Returns false on duplicates.
pub fn add_link(conn: &Connection, lo: i64, hi: i64, day: NaiveDate, now: i64) -> Result<bool> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO synergy_links (user_lo, user_hi, link_date, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![lo, hi, day, now],
    )?;
    Ok(n > 0)
}

/// The user's link for the given day with both activity dates attached.
pub fn link_for_day(conn: &Connection, user_id: i64, day: NaiveDate) -> Result<Option<LinkRow>> {
    match conn.query_row(
        "SELECT sl.id, sl.user_lo, sl.user_hi, sl.is_boosted,
                ulo.last_active_date, uhi.last_active_date
         FROM synergy_links sl
         JOIN users ulo ON ulo.id = sl.user_lo
         JOIN users uhi ON uhi.id = sl.user_hi
         WHERE (sl.user_lo = ?1 OR sl.user_hi = ?1) AND sl.link_date = ?2
         LIMIT 1",
        rusqlite::params![user_id, day],
        |row| {
            Ok(LinkRow {
                id: row.get(0)?,
                user_lo: row.get(1)?,
                user_hi: row.get(2)?,
                is_boosted: row.get(3)?,
                lo_last_active: row.get(4)?,
                hi_last_active: row.get(5)?,
            })
        },
    ) {
        Ok(link) => Ok(Some(link)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// The user's link for the given day, shaped for display.
pub fn synergy_for_day(
    conn: &Connection,
    user_id: i64,
    day: NaiveDate,
) -> Result<Option<SynergyRow>> {
    match conn.query_row(
        "SELECT u.username, sl.link_date, sl.is_boosted
         FROM synergy_links sl
         JOIN users u ON u.id = CASE WHEN sl.user_lo = ?1 THEN sl.user_hi ELSE sl.user_lo END
         WHERE (sl.user_lo = ?1 OR sl.user_hi = ?1) AND sl.link_date = ?2
         LIMIT 1",
        rusqlite::params![user_id, day],
        |row| {
            Ok(SynergyRow {
                partner_username: row.get(0)?,
                link_date: row.get(1)?,
                is_boosted: row.get(2)?,
            })
        },
    ) {
        Ok(synergy) => Ok(Some(synergy)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Set the boost flag. It never clears.
pub fn mark_boosted(conn: &Connection, link_id: i64) -> Result<()> {
    conn.execute(
        "UPDATE synergy_links SET is_boosted = 1 WHERE id = ?1",
        [link_id],
    )?;
    Ok(())
}
