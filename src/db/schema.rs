pub const SCHEMA: &str = r#"
-- news table
CREATE TABLE IF NOT EXISTS news (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    url TEXT NOT NULL UNIQUE,
    content TEXT,
    summary TEXT,
    source TEXT,
    content_hash TEXT UNIQUE,
    scraped_at TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
"#;

/// Run after column migration so older tables get the same guarantees.
pub const INDEXES: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS idx_news_content_hash ON news(content_hash);
CREATE INDEX IF NOT EXISTS idx_news_created_at ON news(created_at DESC);
"#;

/// Columns that may be missing from tables written by older versions.
pub const MIGRATED_COLUMNS: &[(&str, &str)] = &[
    ("content", "TEXT"),
    ("summary", "TEXT"),
    ("source", "TEXT"),
    ("content_hash", "TEXT"),
    ("scraped_at", "TEXT"),
    ("created_at", "TEXT"),
];

/// Without these the table is not ours and cannot be migrated.
pub const REQUIRED_COLUMNS: &[&str] = &["id", "title", "url"];
