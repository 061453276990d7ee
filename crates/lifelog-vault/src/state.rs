//! Application-level vault state.
//!
//! An embedding application keeps one [`VaultState`] (typically behind a
//! `Mutex`) instead of a global database handle. Opening or creating a
//! vault always closes the previous session first, so at most one vault is
//! open at a time and a failed open leaves the state [`VaultState::Closed`].

use crate::error::VaultError;
use crate::lifecycle::{self, CreateVaultRequest, OpenVaultRequest, VaultSession};

/// Whether a vault is currently open.
#[derive(Debug, Default)]
pub enum VaultState {
    /// No vault open.
    #[default]
    Closed,
    /// An authenticated session.
    Open(VaultSession),
}

impl VaultState {
    /// Close any open session, then create a new vault and keep it open.
    ///
    /// # Errors
    ///
    /// Any error of [`lifecycle::create_vault`]; the state is then `Closed`.
    pub fn create(&mut self, req: &CreateVaultRequest<'_>) -> Result<(), VaultError> {
        self.close();
        *self = Self::Open(lifecycle::create_vault(req)?);
        Ok(())
    }

    /// Close any open session, then open an existing vault.
    ///
    /// # Errors
    ///
    /// Any error of [`lifecycle::open_vault`]; the state is then `Closed`.
    pub fn open(&mut self, req: &OpenVaultRequest<'_>) -> Result<(), VaultError> {
        self.close();
        *self = Self::Open(lifecycle::open_vault(req)?);
        Ok(())
    }

    /// Close the open session, if any.
    pub fn close(&mut self) {
        if let Self::Open(session) = std::mem::take(self) {
            session.close();
        }
    }

    /// `true` while a session is open.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// The open session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&VaultSession> {
        match self {
            Self::Open(session) => Some(session),
            Self::Closed => None,
        }
    }

    /// Mutable access to the open session (needed for password changes).
    pub fn session_mut(&mut self) -> Option<&mut VaultSession> {
        match self {
            Self::Open(session) => Some(session),
            Self::Closed => None,
        }
    }
}
