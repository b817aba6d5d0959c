use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key the credential table is persisted under.
pub const CREDENTIALS_KEY: &str = "chatAppUsers";

/// Usernames are matched case-insensitively; the table is keyed by the
/// lowercase form.
pub fn normalize_username(input: &str) -> String {
    input.to_lowercase()
}

/// One account in the credential table. The password is stored as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub password: String,
    pub display_name: String,
    pub email: String,
}

impl CredentialRecord {
    pub fn new(password: &str, display_name: &str, email: &str) -> Self {
        Self {
            password: password.to_string(),
            display_name: display_name.to_string(),
            email: email.to_string(),
        }
    }
}

/// Persisted mapping of lowercase username -> record.
///
/// Serializes as a plain JSON object so the stored value stays
/// `{"ryan": {"password": .., "displayName": .., "email": ..}, ..}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialTable {
    records: BTreeMap<String, CredentialRecord>,
}

impl CredentialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for `username` (normalized).
    pub fn insert(&mut self, username: &str, record: CredentialRecord) -> Option<CredentialRecord> {
        self.records.insert(normalize_username(username), record)
    }

    pub fn get(&self, username: &str) -> Option<&CredentialRecord> {
        self.records.get(&normalize_username(username))
    }

    pub fn get_mut(&mut self, username: &str) -> Option<&mut CredentialRecord> {
        self.records.get_mut(&normalize_username(username))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CredentialRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// The identity of whoever is logged in. `uid` is always the lowercase
/// username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub uid: String,
}

pub type MessageId = i64;

/// A locally authored chat message. Never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Millisecond timestamp of creation, bumped when needed to stay unique
    /// within a feed.
    pub id: MessageId,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    /// Display name of the author at send time.
    #[serde(rename = "username")]
    pub display_username: String,
}

impl Message {
    pub fn is_from(&self, session: &Session) -> bool {
        self.user_id == session.uid
    }
}
