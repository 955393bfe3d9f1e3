//! SQL schema for the Lifskill SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;

CREATE TABLE IF NOT EXISTS users (
    user_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    category_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

-- Expert roster: many-to-many between users and categories.
CREATE TABLE IF NOT EXISTS category_experts (
    user_id     INTEGER NOT NULL REFERENCES users(user_id),
    category_id INTEGER NOT NULL REFERENCES categories(category_id),
    PRIMARY KEY (user_id, category_id)
);

CREATE TABLE IF NOT EXISTS items (
    item_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id    INTEGER NOT NULL REFERENCES users(user_id),
    kind        TEXT NOT NULL,                     -- 'post' | 'request'
    title       TEXT NOT NULL,
    body        TEXT NOT NULL,
    status      TEXT NOT NULL DEFAULT 'pending',   -- 'pending' | 'approved'
    created_at  TEXT NOT NULL,
    approved_at TEXT,
    CHECK (status IN ('pending', 'approved'))
);

-- Category membership is written once, at item creation.
CREATE TABLE IF NOT EXISTS item_categories (
    item_id     INTEGER NOT NULL REFERENCES items(item_id),
    category_id INTEGER NOT NULL REFERENCES categories(category_id),
    PRIMARY KEY (item_id, category_id)
);

-- At most one vote per (item, voter); the primary key is the guard.
CREATE TABLE IF NOT EXISTS approvals (
    item_id     INTEGER NOT NULL REFERENCES items(item_id),
    voter_id    INTEGER NOT NULL REFERENCES users(user_id),
    voted_at    TEXT NOT NULL,
    PRIMARY KEY (item_id, voter_id)
);

CREATE TABLE IF NOT EXISTS bookmarks (
    user_id     INTEGER NOT NULL REFERENCES users(user_id),
    item_id     INTEGER NOT NULL REFERENCES items(item_id),
    created_at  TEXT NOT NULL,
    PRIMARY KEY (user_id, item_id)
);

-- Rows are created by the first increment and never deleted.
CREATE TABLE IF NOT EXISTS achievements (
    user_id     INTEGER NOT NULL REFERENCES users(user_id),
    category_id INTEGER NOT NULL REFERENCES categories(category_id),
    score       INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (user_id, category_id),
    CHECK (score >= 0)
);

CREATE INDEX IF NOT EXISTS items_status_idx          ON items(status);
CREATE INDEX IF NOT EXISTS item_categories_cat_idx   ON item_categories(category_id);
CREATE INDEX IF NOT EXISTS category_experts_cat_idx  ON category_experts(category_id);

PRAGMA user_version = 1;
";
