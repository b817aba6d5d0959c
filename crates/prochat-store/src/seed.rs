use prochat_types::{CredentialRecord, CredentialTable};

/// Password shared by every seeded account.
pub const DEFAULT_PASSWORD: &str = "Ryo123";

/// (username, display name, email)
static SEED_ACCOUNTS: [(&str, &str, &str); 5] = [
    ("ryan", "Ryan", "ryan@chat.com"),
    ("guest", "Guest", "guest@chat.com"),
    ("guest1", "Guest1", "guest1@chat.com"),
    ("guest2", "Guest2", "guest2@chat.com"),
    ("guest3", "Guest3", "guest3@chat.com"),
];

/// The table written on first run.
pub fn seed_table() -> CredentialTable {
    let mut table = CredentialTable::new();
    for (username, display_name, email) in SEED_ACCOUNTS {
        table.insert(username, CredentialRecord::new(DEFAULT_PASSWORD, display_name, email));
    }
    table
}

/// Display names of the seeded accounts, for the login hint.
pub fn seed_display_names() -> impl Iterator<Item = &'static str> {
    SEED_ACCOUNTS.iter().map(|(_, display_name, _)| *display_name)
}
