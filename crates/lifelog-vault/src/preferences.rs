//! Non-sensitive user preferences, stored as plain JSON outside any vault.
//!
//! Readable before a vault is opened so the application can offer the
//! last used diary and configure logging on start.  Nothing secret lives
//! here: per-vault settings (salts, KDF cost) stay inside the vault file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Maximum number of entries kept in [`Preferences::recent_vaults`].
pub const MAX_RECENT_VAULTS: usize = 10;

// ── Top-level preferences ──────────────────────────────────────────

/// Non-sensitive application preferences.
///
/// Persisted to `{data_dir}/preferences.json`.  All fields have defaults,
/// so a partial file loads cleanly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Vault opened most recently.
    #[serde(default)]
    pub last_vault: Option<PathBuf>,

    /// Recently opened vaults, most recent first, without duplicates.
    #[serde(default)]
    pub recent_vaults: Vec<PathBuf>,

    /// `tracing` filter directive used by [`init_logging`](crate::logging::init_logging).
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            last_vault: None,
            recent_vaults: Vec::new(),
            log_filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".into()
}

// ── Recent vaults ──────────────────────────────────────────────────

impl Preferences {
    /// Record `path` as the most recently used vault.
    ///
    /// Moves an existing occurrence to the front and drops the oldest
    /// entries beyond [`MAX_RECENT_VAULTS`].
    pub fn remember_vault(&mut self, path: &Path) {
        self.recent_vaults.retain(|p| p != path);
        self.recent_vaults.insert(0, path.to_path_buf());
        self.recent_vaults.truncate(MAX_RECENT_VAULTS);
        self.last_vault = Some(path.to_path_buf());
    }

    /// Remove `path` from the recent list (e.g. after it was deleted).
    pub fn forget_vault(&mut self, path: &Path) {
        self.recent_vaults.retain(|p| p != path);
        if self.last_vault.as_deref() == Some(path) {
            self.last_vault = None;
        }
    }
}

// ── File I/O ───────────────────────────────────────────────────────

const PREFERENCES_FILE: &str = "preferences.json";

impl Preferences {
    /// Load preferences from `{data_dir}/preferences.json`.
    ///
    /// Returns [`Default::default()`] when the file is missing or
    /// contains invalid JSON.
    #[must_use]
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(PREFERENCES_FILE);
        fs::read_to_string(&path).map_or_else(
            |_| Self::default(),
            |contents| {
                serde_json::from_str(&contents).unwrap_or_else(|e| {
                    tracing::warn!(path = %path.display(), "corrupt preferences, using defaults: {e}");
                    Self::default()
                })
            },
        )
    }

    /// Persist preferences to `{data_dir}/preferences.json`.
    ///
    /// Writes to a `.tmp` file first and renames it over the target, so a
    /// crash never leaves a half-written file.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the directory does not exist or the
    /// file system rejects the write/rename.
    pub fn save(&self, data_dir: &Path) -> std::io::Result<()> {
        let path = data_dir.join(PREFERENCES_FILE);
        let tmp = data_dir.join(".preferences.json.tmp");

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(&tmp, &json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp, &path)?;

        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────
