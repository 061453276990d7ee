//! Entry store: date-keyed rows of per-field ciphertext.
//!
//! Every function here takes a [`rusqlite::Connection`] and moves opaque
//! bytes in and out. Encryption and decryption happen one layer up in
//! [`VaultSession`](crate::lifecycle::VaultSession); only the `date`
//! column is plaintext, so month and range scans never decrypt anything.

use std::fmt;

use rusqlite::{params, OptionalExtension, Row};

use crate::date::{month_pattern, EntryDate};
use crate::error::VaultError;

/// Upper bound of the mood scale.
pub const MOOD_MAX: u8 = 100;

/// Mood assigned to new entries and to entries whose mood cannot be read.
pub const MOOD_DEFAULT: u8 = 50;

// ---------------------------------------------------------------------------
// Domain model
// ---------------------------------------------------------------------------

/// Mood rating on a 0–100 scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mood(u8);

impl Mood {
    /// Build a mood, rejecting values above [`MOOD_MAX`].
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidMood`] if `value > 100`.
    pub fn new(value: u32) -> Result<Self, VaultError> {
        if value > u32::from(MOOD_MAX) {
            return Err(VaultError::InvalidMood(value));
        }
        u8::try_from(value)
            .map(Self)
            .map_err(|_| VaultError::InvalidMood(value))
    }

    /// The numeric rating.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Decimal text form, as encrypted into the `mood` column.
    #[must_use]
    pub fn as_text(self) -> String {
        self.0.to_string()
    }

    /// Parse the decimal text form. Returns `None` for anything that is
    /// not an integer in range.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        text.trim()
            .parse::<u32>()
            .ok()
            .and_then(|v| Self::new(v).ok())
    }
}

impl Default for Mood {
    fn default() -> Self {
        Self(MOOD_DEFAULT)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A decrypted diary entry as seen by the embedding application.
///
/// `content` is an opaque serialized rich-text document; the vault never
/// looks inside it.
#[derive(Clone, PartialEq, Eq)]
pub struct DiaryEntry {
    /// The day this entry belongs to.
    pub date: EntryDate,
    /// Free-text title.
    pub title: String,
    /// Free-text tags, conventionally space separated.
    pub tags: String,
    /// Mood rating.
    pub mood: Mood,
    /// Opaque rich-text payload.
    pub content: Vec<u8>,
}

impl DiaryEntry {
    /// An empty entry for `date` with the default mood.
    #[must_use]
    pub fn blank(date: EntryDate) -> Self {
        Self {
            date,
            title: String::new(),
            tags: String::new(),
            mood: Mood::default(),
            content: Vec::new(),
        }
    }
}

impl fmt::Debug for DiaryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiaryEntry")
            .field("date", &self.date)
            .field("title", &"***")
            .field("tags", &"***")
            .field("mood", &"***")
            .field("content_len", &self.content.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Stored rows
// ---------------------------------------------------------------------------

/// A stored entry row. Every field except `id` and `date` is ciphertext
/// (`IV || body`), apart from `image` which is a reserved empty blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryRecord {
    /// Surrogate row id; stable across overwrites.
    pub id: i64,
    /// Plaintext date key.
    pub date: EntryDate,
    /// Encrypted title.
    pub title: Vec<u8>,
    /// Encrypted tags.
    pub tags: Vec<u8>,
    /// Encrypted mood text.
    pub mood: Vec<u8>,
    /// Encrypted content.
    pub content: Vec<u8>,
    /// Reserved, always empty.
    pub image: Vec<u8>,
}

/// Values for an insert-or-overwrite. All byte fields are ciphertext.
#[derive(Clone, Debug)]
pub struct NewEntryRecord {
    /// Date key to write.
    pub date: EntryDate,
    /// Encrypted title.
    pub title: Vec<u8>,
    /// Encrypted tags.
    pub tags: Vec<u8>,
    /// Encrypted mood text.
    pub mood: Vec<u8>,
    /// Encrypted content.
    pub content: Vec<u8>,
}

const SELECT_COLUMNS: &str = "SELECT id, date, title, tags, mood, content, image FROM entries";

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<EntryRecord> {
    Ok(EntryRecord {
        id: row.get(0)?,
        date: row.get(1)?,
        title: row.get(2)?,
        tags: row.get(3)?,
        mood: row.get(4)?,
        content: row.get(5)?,
        image: row.get(6)?,
    })
}

// ---------------------------------------------------------------------------
// CRUD operations
// ---------------------------------------------------------------------------

/// Insert an entry, or overwrite every field of the existing entry for
/// the same date. The row id of an existing entry is preserved.
///
/// # Errors
///
/// Returns [`VaultError::Database`] if the statement fails.
pub fn upsert_entry(
    conn: &rusqlite::Connection,
    entry: &NewEntryRecord,
) -> Result<(), VaultError> {
    conn.execute(
        "INSERT INTO entries (date, title, tags, mood, content, image) \
         VALUES (?1, ?2, ?3, ?4, ?5, x'') \
         ON CONFLICT(date) DO UPDATE SET \
         title = excluded.title, tags = excluded.tags, mood = excluded.mood, \
         content = excluded.content, image = excluded.image",
        params![entry.date, entry.title, entry.tags, entry.mood, entry.content],
    )
    .map_err(|e| VaultError::Database(format!("failed to upsert entry: {e}")))?;

    tracing::debug!(date = %entry.date, "entry written");
    Ok(())
}

/// Fetch the entry for `date`, if any.
///
/// # Errors
///
/// Returns [`VaultError::Database`] if the query fails.
pub fn get_entry(
    conn: &rusqlite::Connection,
    date: EntryDate,
) -> Result<Option<EntryRecord>, VaultError> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE date = ?1"),
        params![date],
        record_from_row,
    )
    .optional()
    .map_err(|e| VaultError::Database(format!("failed to query entry: {e}")))
}

/// Dates that have an entry in the given month, ascending.
///
/// # Errors
///
/// Returns [`VaultError::Database`] if the query fails.
pub fn list_entry_dates(
    conn: &rusqlite::Connection,
    year: i32,
    month: u32,
) -> Result<Vec<EntryDate>, VaultError> {
    let mut stmt = conn
        .prepare("SELECT date FROM entries WHERE date LIKE ?1 ORDER BY date ASC")
        .map_err(|e| VaultError::Database(format!("failed to prepare month query: {e}")))?;

    let dates = stmt
        .query_map(params![month_pattern(year, month)], |row| row.get(0))
        .map_err(|e| VaultError::Database(format!("failed to execute month query: {e}")))?
        .collect::<Result<Vec<EntryDate>, _>>()
        .map_err(|e| VaultError::Database(format!("row read error: {e}")))?;

    Ok(dates)
}

/// Entries with `from <= date <= to`, ascending by date.
///
/// An inverted range (`from > to`) matches nothing.
///
/// # Errors
///
/// Returns [`VaultError::Database`] if the query fails.
pub fn list_entries_in_range(
    conn: &rusqlite::Connection,
    from: EntryDate,
    to: EntryDate,
) -> Result<Vec<EntryRecord>, VaultError> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE date BETWEEN ?1 AND ?2 ORDER BY date ASC"
        ))
        .map_err(|e| VaultError::Database(format!("failed to prepare range query: {e}")))?;

    let records = stmt
        .query_map(params![from, to], record_from_row)
        .map_err(|e| VaultError::Database(format!("failed to execute range query: {e}")))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| VaultError::Database(format!("row read error: {e}")))?;

    Ok(records)
}

/// Every stored entry, ascending by date.
///
/// # Errors
///
/// Returns [`VaultError::Database`] if the query fails.
pub fn list_all_entries(conn: &rusqlite::Connection) -> Result<Vec<EntryRecord>, VaultError> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_COLUMNS} ORDER BY date ASC"))
        .map_err(|e| VaultError::Database(format!("failed to prepare list query: {e}")))?;

    let records = stmt
        .query_map([], record_from_row)
        .map_err(|e| VaultError::Database(format!("failed to execute list query: {e}")))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| VaultError::Database(format!("row read error: {e}")))?;

    Ok(records)
}

/// Delete the entry for `date`. Returns whether a row was removed.
///
/// # Errors
///
/// Returns [`VaultError::Database`] if the DELETE fails.
pub fn delete_entry(conn: &rusqlite::Connection, date: EntryDate) -> Result<bool, VaultError> {
    let affected = conn
        .execute("DELETE FROM entries WHERE date = ?1", params![date])
        .map_err(|e| VaultError::Database(format!("failed to delete entry: {e}")))?;

    if affected > 0 {
        tracing::debug!(date = %date, "entry deleted");
    }
    Ok(affected > 0)
}

/// Number of stored entries.
///
/// # Errors
///
/// Returns [`VaultError::Database`] if the query fails.
pub fn count_entries(conn: &rusqlite::Connection) -> Result<u64, VaultError> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
        .map_err(|e| VaultError::Database(format!("failed to count entries: {e}")))?;
    Ok(u64::try_from(count).unwrap_or(0))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
