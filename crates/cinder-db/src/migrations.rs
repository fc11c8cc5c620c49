//! Database migration system.
//!
//! Schema version stored in `PRAGMA user_version`. Migrations are
//! forward-only; rollback requires rebuilding the database.
//!
//! Fresh databases are also provisioned with the reference data the
//! engines rely on: the shop catalog (the streak engine looks up the
//! Streak Freeze item by name) and the flash challenge pool.

use rusqlite::Connection;

use cinder_types::STREAK_FREEZE_ITEM;

use crate::{schema, DbError, Result, SCHEMA_VERSION};

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<()> {
    let current_version: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(DbError::Sqlite)?;

    if current_version == 0 {
        tracing::info!("Initializing database schema v{SCHEMA_VERSION}");
        conn.execute_batch(schema::SCHEMA_V1)?;

        insert_default_catalog(conn)?;
        insert_default_challenges(conn)?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(DbError::Sqlite)?;
    } else if current_version < SCHEMA_VERSION {
        for version in (current_version + 1)..=SCHEMA_VERSION {
            tracing::info!("Running migration to v{version}");
            run_migration(conn, version)?;
            conn.pragma_update(None, "user_version", version)
                .map_err(DbError::Sqlite)?;
        }
    } else if current_version > SCHEMA_VERSION {
        return Err(DbError::Migration(format!(
            "Database version {current_version} is newer than supported {SCHEMA_VERSION}"
        )));
    }

    Ok(())
}

/// Seed the shop catalog. Idempotent on the unique item name.
fn insert_default_catalog(conn: &Connection) -> Result<()> {
    let items = [
        (
            STREAK_FREEZE_ITEM,
            "utility",
            150,
            "Saves your streak if you miss a day. Auto-activates on reset.",
            "snow",
        ),
        (
            "Golden Username",
            "cosmetic",
            300,
            "Makes your name shine gold on the future leaderboards.",
            "star",
        ),
        (
            "Double XP Hour",
            "utility",
            100,
            "Earn 2x coins for every task completed in the next hour.",
            "flash",
        ),
    ];

    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO shop_items (name, category, price, description, icon)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;

    for (name, category, price, description, icon) in &items {
        stmt.execute(rusqlite::params![name, category, price, description, icon])?;
    }

    Ok(())
}

/// Seed the flash challenge pool.
fn insert_default_challenges(conn: &Connection) -> Result<()> {
    let challenges = [
        (
            "Which of the following is a key feature of Gen Z's digital behavior?",
            r#"["Preference for long-form content","Value for authenticity and transparency","Slow adaptation to new technology","Low engagement with social media"]"#,
            1,
        ),
        (
            "In productivity psychology, what is the 'Pomodoro Technique' named after?",
            r#"["A scientist","A timer shaped like a tomato","A city in Italy","A famous book"]"#,
            1,
        ),
        (
            "What is the primary benefit of maintaining a daily habit 'streak'?",
            r#"["Earning more money","Reducing brain size","Building neural pathways through repetition","Increasing social anxiety"]"#,
            2,
        ),
    ];

    let already: i64 = conn.query_row("SELECT COUNT(*) FROM flash_challenges", [], |row| {
        row.get(0)
    })?;
    if already > 0 {
        return Ok(());
    }

    let mut stmt = conn.prepare(
        "INSERT INTO flash_challenges (question, options, correct_index, points)
         VALUES (?1, ?2, ?3, 50)",
    )?;

    for (question, options, correct_index) in &challenges {
        stmt.execute(rusqlite::params![question, options, correct_index])?;
    }

    Ok(())
}

/// Run a specific migration.
fn run_migration(conn: &Connection, version: u32) -> Result<()> {
    let _ = conn;
    match version {
        // Future migrations go here:
        // 2 => migration_v2(conn),
        _ => Err(DbError::Migration(format!(
            "Unknown migration version: {version}"
        ))),
    }
}
