#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Integration tests for `VaultState`: one open vault at a time, and
//! failed opens never leave a session behind.

use lifelog_vault::{
    CreateVaultRequest, DiaryEntry, OpenVaultRequest, ScryptParams, VaultError, VaultState,
};

const TEST_KDF: ScryptParams = ScryptParams {
    log_n: 4,
    r: 8,
    p: 1,
};

#[test]
fn create_open_wrong_password_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diary.db");
    let mut state = VaultState::default();

    state
        .create(&CreateVaultRequest {
            password: b"secret123",
            path: &path,
            kdf: TEST_KDF,
        })
        .unwrap();
    state.close();

    state
        .open(&OpenVaultRequest {
            password: b"secret123",
            path: &path,
        })
        .unwrap();
    assert!(state.is_authenticated());

    let err = state
        .open(&OpenVaultRequest {
            password: b"wrong1234",
            path: &path,
        })
        .unwrap_err();
    assert!(matches!(err, VaultError::InvalidPassword));
    assert!(
        !state.is_authenticated(),
        "previous session must be closed before the failed attempt"
    );
}

#[test]
fn opening_second_vault_replaces_first() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.db");
    let second = dir.path().join("second.db");
    let mut state = VaultState::default();

    state
        .create(&CreateVaultRequest {
            password: b"secret123",
            path: &first,
            kdf: TEST_KDF,
        })
        .unwrap();
    state
        .session()
        .unwrap()
        .save_entry(&DiaryEntry::blank("2024-01-01".parse().unwrap()))
        .unwrap();

    state
        .create(&CreateVaultRequest {
            password: b"other-pass",
            path: &second,
            kdf: TEST_KDF,
        })
        .unwrap();

    let session = state.session().unwrap();
    assert_eq!(session.path(), second);
    assert_eq!(session.entry_count().unwrap(), 0);
}

#[test]
fn password_change_through_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diary.db");
    let mut state = VaultState::default();

    state
        .create(&CreateVaultRequest {
            password: b"secret123",
            path: &path,
            kdf: TEST_KDF,
        })
        .unwrap();
    state
        .session_mut()
        .unwrap()
        .change_password(b"secret123", b"n3w-pass")
        .unwrap();

    state
        .open(&OpenVaultRequest {
            password: b"n3w-pass",
            path: &path,
        })
        .unwrap();
    assert!(state.is_authenticated());
}

#[test]
fn session_mut_is_none_when_closed() {
    let mut state = VaultState::default();
    assert!(state.session_mut().is_none());
    state.close();
    assert!(!state.is_authenticated());
}
