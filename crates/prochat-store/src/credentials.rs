use prochat_types::models::{CREDENTIALS_KEY, normalize_username};
use prochat_types::{CredentialTable, Session};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{KeyValueStore, StoreError, seed};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user and wrong password are deliberately indistinguishable.
    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("New passwords do not match.")]
    Mismatch,

    #[error("New password must be at least {min} characters long.", min = MIN_PASSWORD_LEN)]
    TooShort,

    #[error("no account named {0:?}")]
    UnknownUser(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The persisted username -> credential table, layered over any
/// [`KeyValueStore`].
pub struct CredentialStore<S> {
    store: S,
}

impl<S: KeyValueStore> CredentialStore<S> {
    /// Wrap `store` without touching it. Call [`initialize`](Self::initialize)
    /// before use, or use [`open`](Self::open).
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Wrap `store` and seed it if it has no table yet.
    pub fn open(store: S) -> Result<Self, StoreError> {
        let creds = Self::new(store);
        creds.initialize()?;
        Ok(creds)
    }

    /// Write the seed table if none is stored. Returns whether it seeded.
    pub fn initialize(&self) -> Result<bool, StoreError> {
        if self.store.get(CREDENTIALS_KEY)?.is_some() {
            debug!("Credential table already present");
            return Ok(false);
        }

        let table = seed::seed_table();
        self.write_table(&table)?;
        info!("Seeded credential table with {} accounts", table.len());
        Ok(true)
    }

    pub fn read_table(&self) -> Result<Option<CredentialTable>, StoreError> {
        let Some(raw) = self.store.get(CREDENTIALS_KEY)? else {
            return Ok(None);
        };

        let table = serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            key: CREDENTIALS_KEY.to_string(),
            source,
        })?;
        Ok(Some(table))
    }

    pub fn write_table(&self, table: &CredentialTable) -> Result<(), StoreError> {
        let raw = serde_json::to_string(table).map_err(|source| StoreError::Encode {
            key: CREDENTIALS_KEY.to_string(),
            source,
        })?;
        self.store.set(CREDENTIALS_KEY, &raw)
    }

    #[cfg(test)]
    pub fn lookup(
        &self,
        username: &str,
    ) -> Result<Option<prochat_types::CredentialRecord>, StoreError> {
        Ok(self.load_table()?.get(username).cloned())
    }

    /// Check `password` against the record for `username_input` (any case).
    ///
    /// A non-blank `display_name_override` is trimmed, persisted into the
    /// record and used for the returned session.
    pub fn authenticate(
        &self,
        username_input: &str,
        password: &str,
        display_name_override: Option<&str>,
    ) -> Result<Session, AuthError> {
        let username = normalize_username(username_input);
        let mut table = self.load_table()?;

        let Some(record) = table.get_mut(&username) else {
            warn!("Login rejected for {:?}", username);
            return Err(AuthError::InvalidCredentials);
        };
        if record.password != password {
            warn!("Login rejected for {:?}", username);
            return Err(AuthError::InvalidCredentials);
        }

        let display_name_override = display_name_override
            .map(str::trim)
            .filter(|name| !name.is_empty());

        let session = Session {
            username: username.clone(),
            display_name: display_name_override.unwrap_or(record.display_name.as_str()).to_string(),
            email: record.email.clone(),
            uid: username.clone(),
        };

        if let Some(name) = display_name_override {
            record.display_name = name.to_string();
            self.write_table(&table)?;
            debug!("Stored display name {:?} for {}", name, username);
        }

        info!("{} logged in as {:?}", username, session.display_name);
        Ok(session)
    }

    /// Overwrite the password for `username`. No current-password check.
    pub fn change_password(
        &self,
        username: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), PasswordError> {
        if new_password != confirm_password {
            return Err(PasswordError::Mismatch);
        }
        // measured in UTF-16 code units, like a browser string's length
        if new_password.encode_utf16().count() < MIN_PASSWORD_LEN {
            return Err(PasswordError::TooShort);
        }

        let mut table = self.load_table()?;
        let record = table
            .get_mut(username)
            .ok_or_else(|| PasswordError::UnknownUser(normalize_username(username)))?;
        record.password = new_password.to_string();
        self.write_table(&table)?;

        info!("Password changed for {}", normalize_username(username));
        Ok(())
    }

    #[cfg(test)]
    pub fn backend(&self) -> &S {
        &self.store
    }

    /// A table that vanished after startup reads as empty.
    fn load_table(&self) -> Result<CredentialTable, StoreError> {
        Ok(self.read_table()?.unwrap_or_else(|| {
            warn!("Credential table missing from store; treating as empty");
            CredentialTable::new()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use crate::seed::DEFAULT_PASSWORD;

    fn seeded() -> CredentialStore<MemoryStore> {
        CredentialStore::open(MemoryStore::new()).unwrap()
    }

    #[test]
    fn initialize_is_idempotent() {
        let creds = CredentialStore::new(MemoryStore::new());
        assert!(creds.initialize().unwrap());

        creds.change_password("ryan", "abcdef", "abcdef").unwrap();
        assert!(!creds.initialize().unwrap());
        assert_eq!(creds.lookup("ryan").unwrap().unwrap().password, "abcdef");
    }

    #[test]
    fn every_seeded_user_logs_in_any_case() {
        let creds = seeded();
        for input in ["ryan", "Ryan", "GUEST", "Guest1", "gUeSt2", "guest3"] {
            let session = creds.authenticate(input, DEFAULT_PASSWORD, None).unwrap();
            assert_eq!(session.uid, input.to_lowercase());
            assert_eq!(session.username, session.uid);
        }
    }

    #[test]
    fn unknown_user_and_wrong_password_fail_alike() {
        let creds = seeded();
        assert!(matches!(
            creds.authenticate("nobody", DEFAULT_PASSWORD, None),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            creds.authenticate("ryan", "ryo123", None),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            creds.authenticate(" ryan", DEFAULT_PASSWORD, None),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn display_name_override_is_persisted() {
        let creds = seeded();

        let session = creds
            .authenticate("guest", DEFAULT_PASSWORD, Some("  Night Owl "))
            .unwrap();
        assert_eq!(session.display_name, "Night Owl");

        let again = creds.authenticate("guest", DEFAULT_PASSWORD, None).unwrap();
        assert_eq!(again.display_name, "Night Owl");
    }

    #[test]
    fn blank_override_keeps_stored_name() {
        let creds = seeded();
        let session = creds.authenticate("guest1", DEFAULT_PASSWORD, Some("   ")).unwrap();
        assert_eq!(session.display_name, "Guest1");
        assert_eq!(creds.lookup("guest1").unwrap().unwrap().display_name, "Guest1");
    }

    #[test]
    fn failed_login_does_not_store_override() {
        let creds = seeded();
        let _ = creds.authenticate("guest2", "wrong", Some("Sneaky"));
        assert_eq!(creds.lookup("guest2").unwrap().unwrap().display_name, "Guest2");
    }

    #[test]
    fn change_password_validation_order() {
        let creds = seeded();
        assert!(matches!(
            creds.change_password("ryan", "abc", "abd"),
            Err(PasswordError::Mismatch)
        ));
        assert!(matches!(
            creds.change_password("ryan", "abcde", "abcde"),
            Err(PasswordError::TooShort)
        ));
        assert!(matches!(
            creds.change_password("ghost", "abcdef", "abcdef"),
            Err(PasswordError::UnknownUser(name)) if name == "ghost"
        ));
        // untouched after every failure
        assert!(creds.authenticate("ryan", DEFAULT_PASSWORD, None).is_ok());
    }

    #[test]
    fn password_length_counts_utf16_units() {
        let creds = seeded();
        // each emoji is a surrogate pair
        assert!(matches!(
            creds.change_password("ryan", "😀😀", "😀😀"),
            Err(PasswordError::TooShort)
        ));
        creds.change_password("ryan", "😀😀😀", "😀😀😀").unwrap();
        assert!(creds.authenticate("ryan", "😀😀😀", None).is_ok());

        // five BMP characters are still too short
        assert!(matches!(
            creds.change_password("ryan", "ééééé", "ééééé"),
            Err(PasswordError::TooShort)
        ));
    }

    #[test]
    fn change_password_swaps_old_for_new() {
        let creds = seeded();
        creds.change_password("ryan", "abcdef", "abcdef").unwrap();

        assert!(matches!(
            creds.authenticate("ryan", DEFAULT_PASSWORD, None),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(creds.authenticate("Ryan", "abcdef", None).is_ok());
        // other accounts keep the shared password
        assert!(creds.authenticate("guest", DEFAULT_PASSWORD, None).is_ok());
    }

    #[test]
    fn stored_value_is_plain_json_object() {
        let creds = seeded();
        let raw = creds.backend().get(CREDENTIALS_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["ryan"]["displayName"], "Ryan");
        assert_eq!(value["guest3"]["email"], "guest3@chat.com");
    }

    #[test]
    fn missing_table_rejects_logins() {
        let creds = CredentialStore::new(MemoryStore::new());
        assert!(matches!(
            creds.authenticate("ryan", DEFAULT_PASSWORD, None),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn corrupt_table_surfaces_store_error() {
        let store = MemoryStore::new();
        store.set(CREDENTIALS_KEY, "[1, 2").unwrap();
        let creds = CredentialStore::new(store);

        assert!(matches!(
            creds.authenticate("ryan", DEFAULT_PASSWORD, None),
            Err(AuthError::Store(StoreError::Corrupt { .. }))
        ));
    }
}
