//! Shop session query functions.
//!
//! Session rows are append-only history; at most one is live at a time.
//! Expiry is judged at read time against `end_time`.

use rusqlite::Connection;

use crate::Result;

/// One shop window.
#[derive(Debug, Clone)]
pub struct WindowRow {
    pub id: i64,
    pub start_time: i64,
    pub end_time: i64,
}

/// Clear the active flag on every window.
pub fn deactivate_all(conn: &Connection) -> Result<()> {
    conn.execute("UPDATE shop_sessions SET is_active = 0 WHERE is_active = 1", [])?;
    Ok(())
}

/// Insert a new live window and return its id.
pub fn insert(conn: &Connection, start: i64, end: i64) -> Result<i64> {
    conn.execute(
        "INSERT INTO shop_sessions (start_time, end_time, is_active) VALUES (?1, ?2, 1)",
        rusqlite::params![start, end],
    )?;
    Ok(conn.last_insert_rowid())
}

/// The live window containing `now`, if any.
pub fn active(conn: &Connection, now: i64) -> Result<Option<WindowRow>> {
    match conn.query_row(
        "SELECT id, start_time, end_time
         FROM shop_sessions
         WHERE is_active = 1 AND start_time <= ?1 AND ?1 < end_time
         ORDER BY id DESC
         LIMIT 1",
        [now],
        |row| {
            Ok(WindowRow {
                id: row.get(0)?,
                start_time: row.get(1)?,
                end_time: row.get(2)?,
            })
        },
    ) {
        Ok(window) => Ok(Some(window)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
