//! SQL schema definitions.

/// Complete schema for the Cinder v1 database.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Users & Economy
-- ============================================================

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    subject TEXT NOT NULL UNIQUE,
    username TEXT NOT NULL,
    email TEXT NOT NULL,
    coins INTEGER NOT NULL DEFAULT 0,
    current_streak INTEGER NOT NULL DEFAULT 0,
    longest_streak INTEGER NOT NULL DEFAULT 0,
    last_active_date TEXT NOT NULL,
    push_token TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- Append-only coin ledger. Rows are never updated or deleted.
CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id),
    amount INTEGER NOT NULL,
    reason TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transactions_user ON transactions(user_id, created_at DESC);

-- ============================================================
-- Shop & Inventory
-- ============================================================

CREATE TABLE IF NOT EXISTS shop_items (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    category TEXT NOT NULL,
    price INTEGER NOT NULL,
    description TEXT NOT NULL,
    icon TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS user_inventory (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id),
    item_id INTEGER NOT NULL REFERENCES shop_items(id),
    quantity INTEGER NOT NULL DEFAULT 1,
    is_used INTEGER NOT NULL DEFAULT 0,
    acquired_at INTEGER NOT NULL,
    UNIQUE (user_id, item_id)
);

CREATE TABLE IF NOT EXISTS shop_sessions (
    id INTEGER PRIMARY KEY,
    start_time INTEGER NOT NULL,
    end_time INTEGER NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_shop_sessions_active ON shop_sessions(is_active) WHERE is_active = 1;

-- ============================================================
-- Flash Challenges
-- ============================================================

CREATE TABLE IF NOT EXISTS flash_challenges (
    id INTEGER PRIMARY KEY,
    question TEXT NOT NULL,
    options TEXT NOT NULL,
    correct_index INTEGER NOT NULL,
    points INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS flash_sessions (
    id INTEGER PRIMARY KEY,
    challenge_id INTEGER NOT NULL REFERENCES flash_challenges(id),
    start_time INTEGER NOT NULL,
    end_time INTEGER NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_flash_sessions_active ON flash_sessions(is_active) WHERE is_active = 1;

CREATE TABLE IF NOT EXISTS flash_attempts (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id),
    session_id INTEGER NOT NULL REFERENCES flash_sessions(id),
    is_correct INTEGER NOT NULL,
    time_taken_ms INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    UNIQUE (user_id, session_id)
);

-- ============================================================
-- Crystal Forge
-- ============================================================

CREATE TABLE IF NOT EXISTS user_crystals (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id),
    staked_amount INTEGER NOT NULL,
    rarity TEXT NOT NULL,
    stage INTEGER NOT NULL DEFAULT 1,
    evolution_progress INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL DEFAULT 'active',
    last_stoked_date TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- At most one non-claimed crystal per user.
CREATE UNIQUE INDEX IF NOT EXISTS idx_crystals_open
    ON user_crystals(user_id) WHERE status != 'claimed';

-- ============================================================
-- Social Graph
-- ============================================================

-- Pair rows store the lower user id first; both orderings of a pair
-- collapse to the same row.
CREATE TABLE IF NOT EXISTS friendships (
    id INTEGER PRIMARY KEY,
    user_lo INTEGER NOT NULL REFERENCES users(id),
    user_hi INTEGER NOT NULL REFERENCES users(id),
    status TEXT NOT NULL DEFAULT 'pending',
    created_at INTEGER NOT NULL,
    UNIQUE (user_lo, user_hi),
    CHECK (user_lo < user_hi)
);

CREATE TABLE IF NOT EXISTS synergy_links (
    id INTEGER PRIMARY KEY,
    user_lo INTEGER NOT NULL REFERENCES users(id),
    user_hi INTEGER NOT NULL REFERENCES users(id),
    link_date TEXT NOT NULL,
    is_boosted INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    UNIQUE (user_lo, user_hi, link_date),
    CHECK (user_lo < user_hi)
);

CREATE INDEX IF NOT EXISTS idx_synergy_date ON synergy_links(link_date);
"#;
