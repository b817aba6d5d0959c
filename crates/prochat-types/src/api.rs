use serde::{Deserialize, Serialize};

// -- Auth --

/// Login form contents. An empty (or whitespace) display name means "keep
/// the stored one".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub display_name: String,
}

impl LoginRequest {
    pub fn new(username: &str, password: &str, display_name: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            display_name: display_name.to_string(),
        }
    }

    /// The trimmed override, if one was given.
    pub fn display_name_override(&self) -> Option<&str> {
        let trimmed = self.display_name.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

// -- Password change --

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChangePasswordRequest {
    pub new_password: String,
    pub confirm_password: String,
}

impl ChangePasswordRequest {
    pub fn new(new_password: &str, confirm_password: &str) -> Self {
        Self {
            new_password: new_password.to_string(),
            confirm_password: confirm_password.to_string(),
        }
    }
}
