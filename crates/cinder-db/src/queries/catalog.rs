//! Shop catalog query functions. The catalog is seeded at migration time
//! and read-only at runtime.

use rusqlite::Connection;

use crate::{DbError, Result};

/// One catalog item.
#[derive(Debug, Clone)]
pub struct ItemRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: i64,
    pub description: String,
    pub icon: String,
}

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<ItemRow> {
    Ok(ItemRow {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        price: row.get(3)?,
        description: row.get(4)?,
        icon: row.get(5)?,
    })
}

/// Full catalog listing.
pub fn all(conn: &Connection) -> Result<Vec<ItemRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, category, price, description, icon FROM shop_items ORDER BY id",
    )?;
    let rows = stmt.query_map([], row_to_item)?;
    let mut items = Vec::new();
    for row in rows {
        items.push(row?);
    }
    Ok(items)
}

/// Fetch one item by id.
pub fn get(conn: &Connection, item_id: i64) -> Result<ItemRow> {
    conn.query_row(
        "SELECT id, name, category, price, description, icon FROM shop_items WHERE id = ?1",
        [item_id],
        row_to_item,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("shop item {item_id}")),
        other => other.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_catalog() {
        let conn = crate::open_memory().expect("open test db");
        let items = all(&conn).expect("list");
        assert_eq!(items.len(), 3);
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert!(names.contains(&"Streak Freeze"));
        assert!(names.contains(&"Golden Username"));
        assert!(names.contains(&"Double XP Hour"));
    }

    #[test]
    fn test_get_unknown_item() {
        let conn = crate::open_memory().expect("open test db");
        let err = get(&conn, 999).expect_err("missing item");
        assert!(matches!(err, DbError::NotFound(_)));
    }
}
