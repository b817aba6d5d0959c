pub mod credentials;
pub mod error;
pub mod file;
pub mod memory;
pub mod migrations;
pub mod queries;
pub mod seed;
pub mod sqlite;

use std::sync::Arc;

pub use credentials::{AuthError, CredentialStore, PasswordError};
pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A string-to-string key-value store, the shape of a browser's local
/// storage. Values are written wholesale; there are no partial updates.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}
