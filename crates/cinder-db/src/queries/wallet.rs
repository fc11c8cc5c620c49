//! Coin ledger query functions.
//!
//! `transactions` is append-only. Balance mutations pair with an appended
//! row inside a single transaction; cinder-wallet owns that pairing.

use rusqlite::Connection;

use crate::Result;

/// One ledger entry.
#[derive(Debug, Clone)]
pub struct TxRow {
    pub amount: i64,
    pub reason: String,
    pub created_at: i64,
}

/// Append a ledger entry.
pub fn append(conn: &Connection, user_id: i64, amount: i64, reason: &str, now: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO transactions (user_id, amount, reason, created_at) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![user_id, amount, reason, now],
    )?;
    Ok(())
}

/// Most recent entries first. Entries sharing a timestamp keep insertion
/// order via the rowid tiebreak.
pub fn recent(conn: &Connection, user_id: i64, limit: u32) -> Result<Vec<TxRow>> {
    let mut stmt = conn.prepare(
        "SELECT amount, reason, created_at
         FROM transactions
         WHERE user_id = ?1
         ORDER BY created_at DESC, id DESC
         LIMIT ?2",
    )?;
    let rows = stmt.query_map(rusqlite::params![user_id, limit], |row| {
        Ok(TxRow {
            amount: row.get(0)?,
            reason: row.get(1)?,
            created_at: row.get(2)?,
        })
    })?;
    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?);
    }
    Ok(entries)
}

/// Sum of all entries for a user. Equals the stored balance as long as
/// every mutation went through the ledger.
pub fn sum_for_user(conn: &Connection, user_id: i64) -> Result<i64> {
    conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE user_id = ?1",
        [user_id],
        |row| row.get(0),
    )
    .map_err(Into::into)
}
