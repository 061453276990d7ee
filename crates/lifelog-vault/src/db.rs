//! `SQLite` connection handle and migration runner.
//!
//! The database file itself is plain `SQLite`: confidentiality comes from
//! per-field encryption in the session layer, so this module only deals
//! with opaque bytes. The `date` and `key` columns stay in plaintext for
//! indexed lookups.

use std::fmt;
use std::path::Path;

use rusqlite::{Connection, OpenFlags, OptionalExtension, Transaction};

use crate::error::VaultError;

// ---------------------------------------------------------------------------
// Embedded migrations
// ---------------------------------------------------------------------------

/// Forward-only SQL migrations, embedded at compile time.
/// Index 0 → version 1, index 1 → version 2, etc.
const MIGRATIONS: &[&str] = &[include_str!("../migrations/001_initial_schema.sql")];

/// Schema version after all embedded migrations have run.
pub const LATEST_SCHEMA_VERSION: i32 = 1;

// ---------------------------------------------------------------------------
// VaultDb
// ---------------------------------------------------------------------------

/// Handle to an open vault database.
///
/// Holds the single [`rusqlite::Connection`] used for the lifetime of a
/// vault session. All entry and settings I/O flows through it.
pub struct VaultDb {
    conn: Connection,
}

impl fmt::Debug for VaultDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VaultDb(***)")
    }
}

impl VaultDb {
    /// Open (or create) a vault database at `path`.
    ///
    /// 1. Opens the `SQLite` database file.
    /// 2. Touches `sqlite_master` so a non-database file fails early.
    /// 3. Runs any pending migrations.
    ///
    /// # Errors
    ///
    /// - [`VaultError::NotAVault`] if the file is not an `SQLite` database.
    /// - [`VaultError::Database`] for other `SQLite` errors.
    /// - [`VaultError::Migration`] if a migration fails.
    pub fn open(path: &Path) -> Result<Self, VaultError> {
        let conn = Connection::open(path)?;

        // A non-SQLite file only fails on first read (SQLITE_NOTADB).
        conn.execute_batch("SELECT count(*) FROM sqlite_master;")?;

        let mut db = Self { conn };
        db.run_migrations()?;

        Ok(db)
    }

    /// Open an existing vault database without creating anything.
    ///
    /// The file must already carry a vault schema (`user_version > 0` and a
    /// `settings` table). Anything else is rejected before a single write,
    /// so a foreign `SQLite` file is left untouched. Pending migrations run
    /// only after that check.
    ///
    /// # Errors
    ///
    /// - [`VaultError::NotAVault`] if the file is not an `SQLite` database
    ///   or has no vault schema.
    /// - [`VaultError::Database`] for other `SQLite` errors.
    /// - [`VaultError::Migration`] if a migration fails.
    pub fn open_existing(path: &Path) -> Result<Self, VaultError> {
        let flags = OpenFlags::default().difference(OpenFlags::SQLITE_OPEN_CREATE);
        let conn = Connection::open_with_flags(path, flags)?;
        conn.execute_batch("SELECT count(*) FROM sqlite_master;")?;

        let mut db = Self { conn };
        if !db.has_vault_schema()? {
            return Err(VaultError::NotAVault(path.display().to_string()));
        }
        db.run_migrations()?;

        Ok(db)
    }

    /// Open an in-memory database with the full schema. Used by tests and
    /// by callers that want a scratch vault.
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open).
    pub fn open_in_memory() -> Result<Self, VaultError> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    /// Returns a reference to the underlying [`rusqlite::Connection`].
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction for multi-statement writes (vault creation,
    /// re-keying). Single statements are already atomic.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if `BEGIN` fails.
    pub fn transaction(&mut self) -> Result<Transaction<'_>, VaultError> {
        Ok(self.conn.transaction()?)
    }

    /// Returns the current schema version (`PRAGMA user_version`).
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if the pragma query fails.
    pub fn schema_version(&self) -> Result<i32, VaultError> {
        let v: i32 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;
        Ok(v)
    }

    /// `true` if migrations have run on this file and created `settings`.
    fn has_vault_schema(&self) -> Result<bool, VaultError> {
        if self.schema_version()? <= 0 {
            return Ok(false);
        }
        let settings: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'settings'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(settings.is_some())
    }

    // -----------------------------------------------------------------------
    // Migration runner
    // -----------------------------------------------------------------------

    /// Apply all pending migrations sequentially.
    ///
    /// Each migration is wrapped in a transaction. The `user_version` pragma
    /// is bumped atomically on commit.
    fn run_migrations(&mut self) -> Result<(), VaultError> {
        let current = self.schema_version()?;

        for (idx, sql) in MIGRATIONS.iter().enumerate() {
            // Migration versions are 1-indexed: index 0 → version 1.
            let version = idx
                .checked_add(1)
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(|| VaultError::Migration("migration index overflow".into()))?;

            if version <= current {
                continue;
            }

            let tx = self.conn.transaction().map_err(|e| {
                VaultError::Migration(format!(
                    "failed to start transaction for migration {version}: {e}"
                ))
            })?;

            tx.execute_batch(sql)
                .map_err(|e| VaultError::Migration(format!("migration {version} failed: {e}")))?;

            tx.pragma_update(None, "user_version", version)
                .map_err(|e| {
                    VaultError::Migration(format!(
                        "failed to update user_version to {version}: {e}"
                    ))
                })?;

            tx.commit().map_err(|e| {
                VaultError::Migration(format!("failed to commit migration {version}: {e}"))
            })?;

            tracing::debug!(version, "applied vault schema migration");
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_db_is_fully_migrated() {
        let db = VaultDb::open_in_memory().unwrap();
        assert_eq!(db.schema_version().unwrap(), LATEST_SCHEMA_VERSION);
    }

    #[test]
    fn migrations_constant_matches_latest_version() {
        assert_eq!(
            i32::try_from(MIGRATIONS.len()).unwrap(),
            LATEST_SCHEMA_VERSION
        );
    }

    #[test]
    fn schema_has_entries_and_settings_tables() {
        let db = VaultDb::open_in_memory().unwrap();
        let mut stmt = db
            .connection()
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        let names: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert!(names.contains(&"entries".to_string()));
        assert!(names.contains(&"settings".to_string()));
    }

    #[test]
    fn schema_declares_no_foreign_keys() {
        let db = VaultDb::open_in_memory().unwrap();
        for table in ["entries", "settings"] {
            let count: i64 = db
                .connection()
                .query_row(
                    "SELECT COUNT(*) FROM pragma_foreign_key_list(?1)",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 0, "{table} has a foreign key");
        }
    }

    #[test]
    fn debug_is_masked() {
        let db = VaultDb::open_in_memory().unwrap();
        assert_eq!(format!("{db:?}"), "VaultDb(***)");
    }

    /// `VaultDb` must be `Send` so an embedding app can keep it behind a mutex.
    #[allow(dead_code)]
    const fn assert_send<T: Send>() {}

    #[allow(dead_code)]
    const _: () = assert_send::<VaultDb>();
}
