//! SQL schema for the Revisa SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS review_items (
    item_id           TEXT PRIMARY KEY,
    owner_id          TEXT NOT NULL,
    kind              TEXT NOT NULL,      -- 'correction' | 'vocabulary'
    content_json      TEXT NOT NULL,      -- JSON payload (inner data only)
    times_practiced   INTEGER NOT NULL DEFAULT 0 CHECK (times_practiced >= 0),
    mastery_status    TEXT CHECK (mastery_status IN ('learning', 'mastered')),
    next_review_date  TEXT,               -- NULL = never scheduled, due now
    last_practiced_at TEXT,
    total_reviews     INTEGER NOT NULL DEFAULT 0,
    correct_reviews   INTEGER NOT NULL DEFAULT 0,
    revision          INTEGER NOT NULL DEFAULT 0,
    created_at        TEXT NOT NULL,      -- fixed-width RFC 3339 UTC
    vocab_word        TEXT GENERATED ALWAYS AS (
        CASE WHEN kind = 'vocabulary' THEN json_extract(content_json, '$.word') END
    ) STORED
);

-- An owner saves each vocabulary word once.
CREATE UNIQUE INDEX IF NOT EXISTS review_items_vocab_word_idx
    ON review_items(owner_id, vocab_word)
    WHERE vocab_word IS NOT NULL;

CREATE INDEX IF NOT EXISTS review_items_owner_idx
    ON review_items(owner_id, mastery_status, next_review_date);

PRAGMA user_version = 1;
";
