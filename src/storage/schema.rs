//! Database schema definitions
//!
//! This module contains the SQL schema for the SQLite checkpoint backend.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Crawl counters (a single row, id = 1)
CREATE TABLE IF NOT EXISTS counters (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    root_path TEXT NOT NULL,
    max_depth_seen INTEGER,
    visited_dirs INTEGER NOT NULL DEFAULT 0,
    skipped_dirs INTEGER NOT NULL DEFAULT 0,
    processed_files INTEGER NOT NULL DEFAULT 0,
    skipped_files INTEGER NOT NULL DEFAULT 0,
    finished INTEGER NOT NULL DEFAULT 0,
    identity TEXT NOT NULL,
    started_at TEXT NOT NULL,
    updated_at TEXT
);

-- Handled file identities, in insertion order
CREATE TABLE IF NOT EXISTS identities (
    seq INTEGER PRIMARY KEY,
    hash INTEGER,
    path TEXT,
    CHECK ((hash IS NULL) != (path IS NULL))
);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize_schema(&conn).unwrap();
        let result = initialize_schema(&conn);

        assert!(result.is_ok());
    }

    #[test]
    fn test_tables_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for table in ["counters", "identities"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table {} should exist", table);
        }
    }

    #[test]
    fn test_identity_row_needs_exactly_one_value() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let both = conn.execute(
            "INSERT INTO identities (seq, hash, path) VALUES (0, 1, '/a')",
            [],
        );
        assert!(both.is_err());

        let neither = conn.execute("INSERT INTO identities (seq) VALUES (1)", []);
        assert!(neither.is_err());
    }
}
