//! Vault lifecycle: create, open, and the authenticated session.
//!
//! Key hierarchy for one vault file:
//!
//! ```text
//! password ──scrypt(verification_salt)──► verification hash  (stored)
//! password ──scrypt(encryption_salt)────► field key          (memory only)
//! ```
//!
//! The two salts are independent, so the stored hash reveals nothing about
//! the field key. A [`VaultSession`] only exists after the hash check
//! passed (or the vault was just created), which makes "authenticated" a
//! property of holding one.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use lifelog_crypto_core::kdf::{self, ScryptParams, OUTPUT_LEN, SALT_LEN};
use lifelog_crypto_core::memory::SecretBytes;
use lifelog_crypto_core::symmetric::FieldCipher;

use crate::date::EntryDate;
use crate::db::VaultDb;
use crate::entries::{self, DiaryEntry, EntryRecord, Mood, NewEntryRecord};
use crate::error::VaultError;
use crate::search::SearchQuery;
use crate::settings::{
    self, ENCRYPTION_SALT, KDF_PARAMS, PASSWORD_VERIFICATION_HASH, PASSWORD_VERIFICATION_SALT,
};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Parameters for vault creation.
pub struct CreateVaultRequest<'a> {
    /// The user's password (raw bytes). Must not be empty.
    pub password: &'a [u8],
    /// Path of the vault file to create. Must not exist yet.
    pub path: &'a Path,
    /// scrypt cost parameters recorded in the vault.
    pub kdf: ScryptParams,
}

/// Parameters for opening an existing vault.
pub struct OpenVaultRequest<'a> {
    /// The user's password (raw bytes).
    pub password: &'a [u8],
    /// Path of the vault file.
    pub path: &'a Path,
}

// ---------------------------------------------------------------------------
// Key material
// ---------------------------------------------------------------------------

/// Freshly generated salts plus everything derived from them.
struct FreshKeys {
    encryption_salt: [u8; SALT_LEN],
    verification_salt: [u8; SALT_LEN],
    verification_hash: SecretBytes<OUTPUT_LEN>,
    field_key: SecretBytes<OUTPUT_LEN>,
    params: ScryptParams,
}

impl FreshKeys {
    fn generate(password: &[u8], params: ScryptParams) -> Result<Self, VaultError> {
        let encryption_salt = kdf::generate_salt()?;
        let verification_salt = kdf::generate_salt()?;
        let verification_hash = kdf::derive(password, &verification_salt, &params)?;
        let field_key = kdf::derive(password, &encryption_salt, &params)?;
        Ok(Self {
            encryption_salt,
            verification_salt,
            verification_hash,
            field_key,
            params,
        })
    }

    /// Write salts, hash and cost parameters to the settings table.
    fn persist(&self, conn: &rusqlite::Connection) -> Result<(), VaultError> {
        let params_json = serde_json::to_vec(&self.params)
            .map_err(|e| VaultError::Serialization(format!("failed to encode kdf params: {e}")))?;

        settings::put_setting(conn, ENCRYPTION_SALT, &self.encryption_salt)?;
        settings::put_setting(conn, PASSWORD_VERIFICATION_SALT, &self.verification_salt)?;
        settings::put_setting(
            conn,
            PASSWORD_VERIFICATION_HASH,
            self.verification_hash.expose(),
        )?;
        settings::put_setting(conn, KDF_PARAMS, &params_json)?;
        Ok(())
    }

    fn into_cipher(self) -> FieldCipher {
        FieldCipher::new(self.field_key)
    }
}

/// Read the vault's scrypt parameters, falling back to the defaults for
/// vaults that predate the `kdf_params` setting.
fn load_kdf_params(conn: &rusqlite::Connection) -> Result<ScryptParams, VaultError> {
    match settings::find_setting(conn, KDF_PARAMS)? {
        Some(bytes) => serde_json::from_slice(&bytes)
            .map_err(|e| VaultError::Serialization(format!("failed to decode kdf params: {e}"))),
        None => Ok(ScryptParams::default()),
    }
}

/// Check `password` against the stored verification hash.
fn verify_password(
    conn: &rusqlite::Connection,
    password: &[u8],
    params: &ScryptParams,
) -> Result<bool, VaultError> {
    let salt = settings::get_setting(conn, PASSWORD_VERIFICATION_SALT)?;
    let expected = settings::get_setting(conn, PASSWORD_VERIFICATION_HASH)?;
    Ok(kdf::verify(password, &salt, params, &expected)?)
}

// ---------------------------------------------------------------------------
// Vault creation
// ---------------------------------------------------------------------------

/// Create a new vault file and return an open session on it.
///
/// 1. Reject an empty password
/// 2. Claim `path` with an exclusive create, so an existing file (or one
///    created concurrently) is never overwritten
/// 3. Generate independent encryption and verification salts
/// 4. Derive the verification hash and the field key
/// 5. Create the schema and write all settings in one transaction
///
/// If anything after the claim fails, the partial file and any parent
/// directories created for it are removed, so a retry does not hit
/// [`VaultError::VaultAlreadyExists`].
///
/// # Errors
///
/// - [`VaultError::EmptyPassword`] if the password is empty
/// - [`VaultError::VaultAlreadyExists`] if `path` exists
/// - [`VaultError::Crypto`] if salt generation or derivation fails
/// - [`VaultError::Database`] / [`VaultError::Migration`] on storage errors
/// - [`VaultError::Io`] if the file or its directories cannot be created
pub fn create_vault(req: &CreateVaultRequest<'_>) -> Result<VaultSession, VaultError> {
    if req.password.is_empty() {
        return Err(VaultError::EmptyPassword);
    }
    if req.path.exists() {
        return Err(VaultError::VaultAlreadyExists(req.path.display().to_string()));
    }

    let created_dirs = create_parent_dirs(req.path)?;

    let result = claim_path(req.path).and_then(|()| {
        initialize_vault(req).inspect_err(|_| {
            let _ = std::fs::remove_file(req.path);
        })
    });

    match result {
        Ok(session) => {
            tracing::info!(path = %req.path.display(), "vault created");
            Ok(session)
        }
        Err(e) => {
            // Innermost first; `remove_dir` only succeeds on empty directories.
            for dir in created_dirs.iter().rev() {
                let _ = std::fs::remove_dir(dir);
            }
            Err(e)
        }
    }
}

/// Create the missing ancestors of `path`, returning the ones that did not
/// exist before, outermost first.
fn create_parent_dirs(path: &Path) -> Result<Vec<PathBuf>, VaultError> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(Vec::new());
    };
    let mut missing: Vec<PathBuf> = parent
        .ancestors()
        .take_while(|dir| !dir.as_os_str().is_empty() && !dir.exists())
        .map(Path::to_path_buf)
        .collect();
    missing.reverse();

    if let Err(e) = std::fs::create_dir_all(parent) {
        for dir in missing.iter().rev() {
            let _ = std::fs::remove_dir(dir);
        }
        return Err(e.into());
    }
    Ok(missing)
}

/// Atomically create an empty file at `path`, failing if it exists.
fn claim_path(path: &Path) -> Result<(), VaultError> {
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            Err(VaultError::VaultAlreadyExists(path.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

fn initialize_vault(req: &CreateVaultRequest<'_>) -> Result<VaultSession, VaultError> {
    let mut db = VaultDb::open(req.path)?;
    let keys = FreshKeys::generate(req.password, req.kdf)?;

    let tx = db.transaction()?;
    keys.persist(&tx)?;
    tx.commit()?;

    Ok(VaultSession {
        db,
        cipher: keys.into_cipher(),
        path: req.path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Vault open
// ---------------------------------------------------------------------------

/// Open an existing vault with its password.
///
/// A wrong password drops the database handle before returning, so
/// nothing stays open and the caller may simply retry.
///
/// # Errors
///
/// - [`VaultError::EmptyPassword`] if the password is empty
/// - [`VaultError::NotFound`] if `path` does not exist
/// - [`VaultError::NotAVault`] if the file is not an `SQLite` database or
///   was never initialized as a vault (the file is left untouched)
/// - [`VaultError::MissingSetting`] if a salt or the hash is absent
/// - [`VaultError::InvalidPassword`] if verification fails
/// - [`VaultError::Crypto`] if derivation fails (e.g. a truncated salt)
pub fn open_vault(req: &OpenVaultRequest<'_>) -> Result<VaultSession, VaultError> {
    if req.password.is_empty() {
        return Err(VaultError::EmptyPassword);
    }
    if !req.path.exists() {
        return Err(VaultError::NotFound(req.path.display().to_string()));
    }

    let db = VaultDb::open_existing(req.path)?;
    let conn = db.connection();

    let params = load_kdf_params(conn)?;
    let encryption_salt = settings::get_setting(conn, ENCRYPTION_SALT)?;

    if !verify_password(conn, req.password, &params)? {
        tracing::warn!(path = %req.path.display(), "vault open rejected: invalid password");
        return Err(VaultError::InvalidPassword);
    }

    let field_key = kdf::derive(req.password, &encryption_salt, &params)?;

    tracing::info!(path = %req.path.display(), "vault opened");
    Ok(VaultSession {
        db,
        cipher: FieldCipher::new(field_key),
        path: req.path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// An authenticated, open vault.
///
/// Owns the database connection and the field cipher. Dropping the
/// session (or calling [`close`](Self::close)) closes the connection and
/// zeroizes the key.
pub struct VaultSession {
    db: VaultDb,
    cipher: FieldCipher,
    path: PathBuf,
}

impl fmt::Debug for VaultSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultSession")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl VaultSession {
    /// Path of the open vault file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Encrypt and store `entry`, overwriting any entry on the same date.
    ///
    /// # Errors
    ///
    /// - [`VaultError::Crypto`] if encryption fails
    /// - [`VaultError::Database`] if the write fails
    pub fn save_entry(&self, entry: &DiaryEntry) -> Result<(), VaultError> {
        let record = seal_entry(&self.cipher, entry)?;
        entries::upsert_entry(self.db.connection(), &record)
    }

    /// Load and decrypt the entry for `date`. `Ok(None)` if there is none.
    ///
    /// Fields that fail to decrypt come back empty (mood falls back to its
    /// default); this never errors on corrupted ciphertext.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if the query fails.
    pub fn load_entry(&self, date: EntryDate) -> Result<Option<DiaryEntry>, VaultError> {
        Ok(entries::get_entry(self.db.connection(), date)?
            .map(|record| open_record(&self.cipher, &record)))
    }

    /// Day numbers of the given month that have an entry.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if the query fails.
    pub fn list_marked_days(&self, year: i32, month: u32) -> Result<BTreeSet<u32>, VaultError> {
        Ok(entries::list_entry_dates(self.db.connection(), year, month)?
            .into_iter()
            .map(EntryDate::day)
            .collect())
    }

    /// Decrypted entries in the query's date range whose chosen field
    /// matches, ascending by date.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if the range query fails.
    pub fn search_entries(&self, query: &SearchQuery) -> Result<Vec<DiaryEntry>, VaultError> {
        if query.is_empty_range() {
            return Ok(Vec::new());
        }
        let records = entries::list_entries_in_range(self.db.connection(), query.from, query.to)?;
        Ok(records
            .iter()
            .map(|record| open_record(&self.cipher, record))
            .filter(|entry| query.matches(entry))
            .collect())
    }

    /// Delete the entry for `date`. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if the delete fails.
    pub fn delete_entry(&self, date: EntryDate) -> Result<bool, VaultError> {
        entries::delete_entry(self.db.connection(), date)
    }

    /// Number of stored entries.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if the query fails.
    pub fn entry_count(&self) -> Result<u64, VaultError> {
        entries::count_entries(self.db.connection())
    }

    /// Change the vault password.
    ///
    /// Verifies `current`, generates fresh salts, re-encrypts every entry
    /// under the new field key and rewrites the settings, all in one
    /// transaction. The session switches to the new key only after commit;
    /// on any error the vault and the session are unchanged.
    ///
    /// # Errors
    ///
    /// - [`VaultError::EmptyPassword`] if `new` is empty
    /// - [`VaultError::InvalidPassword`] if `current` is wrong
    /// - [`VaultError::Crypto`] / [`VaultError::Database`] on failure
    pub fn change_password(&mut self, current: &[u8], new: &[u8]) -> Result<(), VaultError> {
        if new.is_empty() {
            return Err(VaultError::EmptyPassword);
        }

        let params = load_kdf_params(self.db.connection())?;
        if !verify_password(self.db.connection(), current, &params)? {
            tracing::warn!(path = %self.path.display(), "password change rejected: invalid password");
            return Err(VaultError::InvalidPassword);
        }

        let keys = FreshKeys::generate(new, params)?;

        let tx = self.db.transaction()?;
        keys.persist(&tx)?;
        let new_cipher = keys.into_cipher();
        let records = entries::list_all_entries(&tx)?;
        for record in &records {
            let entry = open_record(&self.cipher, record);
            entries::upsert_entry(&tx, &seal_entry(&new_cipher, &entry)?)?;
        }
        tx.commit()?;

        self.cipher = new_cipher;
        tracing::info!(
            path = %self.path.display(),
            entries = records.len(),
            "vault password changed"
        );
        Ok(())
    }

    /// Close the session, releasing the connection and zeroizing the key.
    pub fn close(self) {
        tracing::info!(path = %self.path.display(), "vault closed");
        drop(self);
    }
}

// ---------------------------------------------------------------------------
// Field encryption helpers
// ---------------------------------------------------------------------------

fn seal_entry(cipher: &FieldCipher, entry: &DiaryEntry) -> Result<NewEntryRecord, VaultError> {
    Ok(NewEntryRecord {
        date: entry.date,
        title: cipher.encrypt(entry.title.as_bytes())?,
        tags: cipher.encrypt(entry.tags.as_bytes())?,
        mood: cipher.encrypt(entry.mood.as_text().as_bytes())?,
        content: cipher.encrypt(&entry.content)?,
    })
}

fn open_record(cipher: &FieldCipher, record: &EntryRecord) -> DiaryEntry {
    let title = cipher.decrypt(&record.title).into_bytes();
    let tags = cipher.decrypt(&record.tags).into_bytes();
    let mood_text = cipher.decrypt(&record.mood).into_bytes();
    let mood = Mood::parse(&String::from_utf8_lossy(&mood_text)).unwrap_or_else(|| {
        tracing::debug!(date = %record.date, "unreadable mood, using default");
        Mood::default()
    });

    DiaryEntry {
        date: record.date,
        title: String::from_utf8_lossy(&title).into_owned(),
        tags: String::from_utf8_lossy(&tags).into_owned(),
        mood,
        content: cipher.decrypt(&record.content).into_bytes(),
    }
}

// Sessions are held behind a `Mutex` by embedding applications.
const _: () = {
    const fn assert_send<T: Send>() {}
    assert_send::<VaultSession>();
};

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
