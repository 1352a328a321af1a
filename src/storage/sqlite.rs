//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.
//! Identities are stored one row each; since the sequence only grows, a save
//! inserts just the rows beyond what the table already holds.

use crate::state::{CrawlCounters, FileIdentity, IdentityStrategy};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Database file created inside the storage folder
pub const DATABASE_FILE: &str = "crawl.db";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Opens the database inside a storage folder
    pub fn in_folder(folder: &Path) -> StorageResult<Self> {
        std::fs::create_dir_all(folder)?;
        Self::new(&folder.join(DATABASE_FILE))
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn stored_identity_count(&self) -> StorageResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM identities", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn parse_timestamp(raw: &str) -> StorageResult<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .map_err(|e| StorageError::Corrupt(format!("bad timestamp '{}': {}", raw, e)))
}

fn parse_strategy(raw: &str) -> StorageResult<IdentityStrategy> {
    match raw {
        "path-hash" => Ok(IdentityStrategy::PathHash),
        "exact-path" => Ok(IdentityStrategy::ExactPath),
        other => Err(StorageError::Corrupt(format!(
            "unknown identity strategy '{}'",
            other
        ))),
    }
}

/// Raw counters row before timestamps and enums are parsed
struct CountersRow {
    root_path: String,
    max_depth_seen: Option<i64>,
    visited_dirs: i64,
    skipped_dirs: i64,
    processed_files: i64,
    skipped_files: i64,
    finished: bool,
    identity: String,
    started_at: String,
    updated_at: Option<String>,
}

impl Storage for SqliteStorage {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn load_counters(&self) -> StorageResult<Option<CrawlCounters>> {
        let row = self
            .conn
            .query_row(
                "SELECT root_path, max_depth_seen, visited_dirs, skipped_dirs, processed_files,
                 skipped_files, finished, identity, started_at, updated_at
                 FROM counters WHERE id = 1",
                [],
                |row| {
                    Ok(CountersRow {
                        root_path: row.get(0)?,
                        max_depth_seen: row.get(1)?,
                        visited_dirs: row.get(2)?,
                        skipped_dirs: row.get(3)?,
                        processed_files: row.get(4)?,
                        skipped_files: row.get(5)?,
                        finished: row.get::<_, i64>(6)? != 0,
                        identity: row.get(7)?,
                        started_at: row.get(8)?,
                        updated_at: row.get(9)?,
                    })
                },
            )
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        let updated_at = match row.updated_at {
            Some(raw) => Some(parse_timestamp(&raw)?),
            None => None,
        };

        Ok(Some(CrawlCounters {
            root_path: row.root_path,
            max_depth_seen: row.max_depth_seen.map(|d| d as u32),
            visited_dirs: row.visited_dirs as u64,
            skipped_dirs: row.skipped_dirs as u64,
            processed_files: row.processed_files as u64,
            skipped_files: row.skipped_files as u64,
            finished: row.finished,
            identity: parse_strategy(&row.identity)?,
            started_at: parse_timestamp(&row.started_at)?,
            updated_at,
        }))
    }

    fn save_counters(&mut self, counters: &CrawlCounters) -> StorageResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO counters
             (id, root_path, max_depth_seen, visited_dirs, skipped_dirs, processed_files,
              skipped_files, finished, identity, started_at, updated_at)
             VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                counters.root_path,
                counters.max_depth_seen.map(i64::from),
                counters.visited_dirs as i64,
                counters.skipped_dirs as i64,
                counters.processed_files as i64,
                counters.skipped_files as i64,
                counters.finished as i64,
                counters.identity.to_string(),
                counters.started_at.to_rfc3339(),
                counters.updated_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    fn load_identities(&self) -> StorageResult<Option<Vec<FileIdentity>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT hash, path FROM identities ORDER BY seq")?;

        let rows = stmt.query_map([], |row| {
            let hash: Option<i32> = row.get(0)?;
            let path: Option<String> = row.get(1)?;
            Ok((hash, path))
        })?;

        let mut identities = Vec::new();
        for row in rows {
            let identity = match row? {
                (Some(hash), _) => FileIdentity::Hash(hash),
                (None, Some(path)) => FileIdentity::Path(path),
                (None, None) => {
                    return Err(StorageError::Corrupt(
                        "identity row without a value".to_string(),
                    ))
                }
            };
            identities.push(identity);
        }

        if identities.is_empty() {
            Ok(None)
        } else {
            Ok(Some(identities))
        }
    }

    fn save_identities(&mut self, identities: &[FileIdentity]) -> StorageResult<()> {
        let mut stored = self.stored_identity_count()?;

        let tx = self.conn.transaction()?;
        if stored > identities.len() {
            // Not produced by an append-only set; start over
            tx.execute("DELETE FROM identities", [])?;
            stored = 0;
        }

        {
            let mut stmt =
                tx.prepare("INSERT INTO identities (seq, hash, path) VALUES (?1, ?2, ?3)")?;
            for (seq, identity) in identities.iter().enumerate().skip(stored) {
                match identity {
                    FileIdentity::Hash(hash) => {
                        stmt.execute(params![seq as i64, hash, None::<String>])?
                    }
                    FileIdentity::Path(path) => {
                        stmt.execute(params![seq as i64, None::<i32>, path])?
                    }
                };
            }
        }
        tx.commit()?;

        tracing::trace!(
            "Appended {} identities",
            identities.len().saturating_sub(stored)
        );
        Ok(())
    }
}
