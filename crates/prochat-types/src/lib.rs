pub mod api;
pub mod models;

pub use models::{CredentialRecord, CredentialTable, Message, MessageId, Session};
