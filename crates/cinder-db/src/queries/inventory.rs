//! User inventory query functions.

use rusqlite::Connection;

use crate::Result;

/// Inventory entry joined with its catalog item.
#[derive(Debug, Clone)]
pub struct OwnedRow {
    pub item_id: i64,
    pub name: String,
    pub category: String,
    pub price: i64,
    pub description: String,
    pub icon: String,
    pub quantity: i64,
    pub acquired_at: i64,
}

/// Record a purchase: first copy creates the entry, repeats bump the
/// quantity on the same row.
pub fn acquire(conn: &Connection, user_id: i64, item_id: i64, now: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO user_inventory (user_id, item_id, quantity, acquired_at)
         VALUES (?1, ?2, 1, ?3)
         ON CONFLICT(user_id, item_id) DO UPDATE SET quantity = quantity + 1",
        rusqlite::params![user_id, item_id, now],
    )?;
    Ok(())
}

/// Entry id of an unused consumable owned by the user, looked up by
/// catalog name. None when the user owns no unused copy.
pub fn unused_entry_by_name(
    conn: &Connection,
    user_id: i64,
    item_name: &str,
) -> Result<Option<i64>> {
    match conn.query_row(
        "SELECT ui.id
         FROM user_inventory ui
         JOIN shop_items si ON si.id = ui.item_id
         WHERE ui.user_id = ?1 AND si.name = ?2 AND ui.is_used = 0
         LIMIT 1",
        rusqlite::params![user_id, item_name],
        |row| row.get(0),
    ) {
        Ok(id) => Ok(Some(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Flip the used flag. The flag never flips back.
pub fn mark_used(conn: &Connection, entry_id: i64) -> Result<()> {
    conn.execute(
        "UPDATE user_inventory SET is_used = 1 WHERE id = ?1",
        [entry_id],
    )?;
    Ok(())
}

/// Unused inventory joined with item details, newest acquisitions first.
pub fn owned(conn: &Connection, user_id: i64) -> Result<Vec<OwnedRow>> {
    let mut stmt = conn.prepare(
        "SELECT si.id, si.name, si.category, si.price, si.description, si.icon,
                ui.quantity, ui.acquired_at
         FROM user_inventory ui
         JOIN shop_items si ON si.id = ui.item_id
         WHERE ui.user_id = ?1 AND ui.is_used = 0
         ORDER BY ui.acquired_at DESC, ui.id DESC",
    )?;
    let rows = stmt.query_map([user_id], |row| {
        Ok(OwnedRow {
            item_id: row.get(0)?,
            name: row.get(1)?,
            category: row.get(2)?,
            price: row.get(3)?,
            description: row.get(4)?,
            icon: row.get(5)?,
            quantity: row.get(6)?,
            acquired_at: row.get(7)?,
        })
    })?;
    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?);
    }
    Ok(entries)
}
