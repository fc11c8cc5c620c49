//! Crystal forge query functions.

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::{DbError, Result};

/// One crystal row.
#[derive(Debug, Clone)]
pub struct CrystalRow {
    pub id: i64,
    pub user_id: i64,
    pub staked_amount: i64,
    pub rarity: String,
    pub stage: i64,
    pub evolution_progress: i64,
    pub status: String,
    pub last_stoked_date: Option<NaiveDate>,
    pub created_at: i64,
    pub updated_at: i64,
}

fn row_to_crystal(row: &rusqlite::Row<'_>) -> rusqlite::Result<CrystalRow> {
    Ok(CrystalRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        staked_amount: row.get(2)?,
        rarity: row.get(3)?,
        stage: row.get(4)?,
        evolution_progress: row.get(5)?,
        status: row.get(6)?,
        last_stoked_date: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// The user's non-claimed crystal (active or matured), if any. The partial
/// unique index guarantees at most one.
pub fn open_for_user(conn: &Connection, user_id: i64) -> Result<Option<CrystalRow>> {
    match conn.query_row(
        "SELECT id, user_id, staked_amount, rarity, stage, evolution_progress, status,
                last_stoked_date, created_at, updated_at
         FROM user_crystals
         WHERE user_id = ?1 AND status != 'claimed'",
        [user_id],
        row_to_crystal,
    ) {
        Ok(crystal) => Ok(Some(crystal)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Fetch one crystal by id.
pub fn get(conn: &Connection, crystal_id: i64) -> Result<CrystalRow> {
    conn.query_row(
        "SELECT id, user_id, staked_amount, rarity, stage, evolution_progress, status,
                last_stoked_date, created_at, updated_at
         FROM user_crystals
         WHERE id = ?1",
        [crystal_id],
        row_to_crystal,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("crystal {crystal_id}")),
        other => other.into(),
    })
}

/// Create a fresh crystal: stage 1, no progress, active.
pub fn insert(
    conn: &Connection,
    user_id: i64,
    staked_amount: i64,
    rarity: &str,
    now: i64,
) -> Result<CrystalRow> {
    conn.execute(
        "INSERT INTO user_crystals (user_id, staked_amount, rarity, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)",
        rusqlite::params![user_id, staked_amount, rarity, now],
    )?;
    get(conn, conn.last_insert_rowid())
}

/// Persist the result of a stoke: progress, stage, status, and the stoke
/// date move together.
pub fn record_stoke(
    conn: &Connection,
    crystal_id: i64,
    progress: i64,
    stage: i64,
    status: &str,
    day: NaiveDate,
    now: i64,
) -> Result<()> {
    conn.execute(
        "UPDATE user_crystals
         SET evolution_progress = ?2, stage = ?3, status = ?4, last_stoked_date = ?5,
             updated_at = ?6
         WHERE id = ?1",
        rusqlite::params![crystal_id, progress, stage, status, day, now],
    )?;
    Ok(())
}

/// Terminal transition: the crystal leaves the open set for good.
pub fn set_claimed(conn: &Connection, crystal_id: i64, now: i64) -> Result<()> {
    conn.execute(
        "UPDATE user_crystals SET status = 'claimed', updated_at = ?2 WHERE id = ?1",
        rusqlite::params![crystal_id, now],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::users;

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    fn seed_user(conn: &Connection, subject: &str) -> i64 {
        users::upsert(
            conn,
            subject,
            subject,
            &format!("{subject}@cinder.app"),
            "2024-06-15".parse().expect("date"),
            0,
        )
        .expect("seed user")
        .id
    }

    #[test]
    fn test_insert_defaults() {
        let conn = test_db();
        let user = seed_user(&conn, "a");
        let crystal = insert(&conn, user, 500, "legendary", 100).expect("insert");
        assert_eq!(crystal.stage, 1);
        assert_eq!(crystal.evolution_progress, 0);
        assert_eq!(crystal.status, "active");
        assert_eq!(crystal.last_stoked_date, None);
    }

    #[test]
    fn test_one_open_crystal_per_user() {
        let conn = test_db();
        let user = seed_user(&conn, "a");
        insert(&conn, user, 500, "legendary", 100).expect("first");
        let err = insert(&conn, user, 100, "rare", 200).expect_err("second rejected");
        assert!(matches!(err, DbError::Constraint(_)));
    }

    #[test]
    fn test_claimed_reopens_slot() {
        let conn = test_db();
        let user = seed_user(&conn, "a");
        let first = insert(&conn, user, 500, "legendary", 100).expect("first");
        set_claimed(&conn, first.id, 200).expect("claim");
        assert!(open_for_user(&conn, user).expect("query").is_none());

        let second = insert(&conn, user, 100, "rare", 300).expect("new forge");
        let open = open_for_user(&conn, user).expect("query").expect("open");
        assert_eq!(open.id, second.id);
    }

    #[test]
    fn test_record_stoke_round_trip() {
        let conn = test_db();
        let user = seed_user(&conn, "a");
        let crystal = insert(&conn, user, 250, "epic", 100).expect("insert");
        let day: NaiveDate = "2024-06-16".parse().expect("date");

        record_stoke(&conn, crystal.id, 40, 1, "active", day, 200).expect("stoke");
        let updated = get(&conn, crystal.id).expect("get");
        assert_eq!(updated.evolution_progress, 40);
        assert_eq!(updated.last_stoked_date, Some(day));
        assert_eq!(updated.status, "active");
    }
}
