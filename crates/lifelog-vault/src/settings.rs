//! Key/value settings table.
//!
//! Holds the per-vault salts, the password-verification hash and the KDF
//! cost parameters. Values are raw bytes and never encrypted: none of them
//! is secret on its own.

use rusqlite::{params, OptionalExtension};

use crate::error::VaultError;

/// 16-byte salt for deriving the field encryption key.
pub const ENCRYPTION_SALT: &str = "encryption_salt";

/// 16-byte salt for deriving the password-verification hash.
pub const PASSWORD_VERIFICATION_SALT: &str = "password_verification_salt";

/// 32-byte scrypt output compared against on unlock.
pub const PASSWORD_VERIFICATION_HASH: &str = "password_verification_hash";

/// JSON-encoded scrypt cost parameters. Optional; defaults apply when absent.
pub const KDF_PARAMS: &str = "kdf_params";

/// Insert or overwrite a setting.
///
/// # Errors
///
/// Returns [`VaultError::Database`] if the statement fails.
pub fn put_setting(conn: &rusqlite::Connection, key: &str, value: &[u8]) -> Result<(), VaultError> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )
    .map_err(|e| VaultError::Database(format!("failed to write setting {key}: {e}")))?;
    Ok(())
}

/// Read an optional setting.
///
/// # Errors
///
/// Returns [`VaultError::Database`] if the query fails.
pub fn find_setting(conn: &rusqlite::Connection, key: &str) -> Result<Option<Vec<u8>>, VaultError> {
    conn.query_row(
        "SELECT value FROM settings WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| VaultError::Database(format!("failed to read setting {key}: {e}")))
}

/// Read a required setting.
///
/// # Errors
///
/// - [`VaultError::MissingSetting`] if the key is absent.
/// - [`VaultError::Database`] if the query fails.
pub fn get_setting(conn: &rusqlite::Connection, key: &str) -> Result<Vec<u8>, VaultError> {
    find_setting(conn, key)?.ok_or_else(|| VaultError::MissingSetting(key.to_string()))
}
