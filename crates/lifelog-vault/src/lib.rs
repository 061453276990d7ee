//! `lifelog-vault`: Encrypted diary storage for Lifelog.
//!
//! Stores date-keyed diary entries in a single `SQLite` file with every
//! text field encrypted independently, and manages the vault lifecycle
//! (create, open, change password, close).

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod date;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod state;

pub mod entries;
pub mod settings;

pub mod search;

pub mod logging;
pub mod preferences;

pub use date::EntryDate;
pub use db::VaultDb;
pub use entries::{
    count_entries, delete_entry, get_entry, list_all_entries, list_entries_in_range,
    list_entry_dates, upsert_entry, DiaryEntry, EntryRecord, Mood, NewEntryRecord,
};
pub use error::VaultError;
pub use lifecycle::{create_vault, open_vault, CreateVaultRequest, OpenVaultRequest, VaultSession};
pub use logging::init_logging;
pub use preferences::Preferences;
pub use search::{SearchField, SearchQuery};
pub use settings::{find_setting, get_setting, put_setting};
pub use state::VaultState;

pub use lifelog_crypto_core::ScryptParams;
