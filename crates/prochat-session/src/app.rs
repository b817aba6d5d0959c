use tracing::{error, info};

use prochat_store::{AuthError, KeyValueStore, PasswordError};
use prochat_types::api::{ChangePasswordRequest, LoginRequest};

use crate::controller::{SessionController, SessionError};
use crate::view::ViewState;

pub const PASSWORD_CHANGED: &str =
    "Password updated successfully! (Note: This change is local to this device.)";

/// Command handlers behind the UI. Each one clears the banner, runs the
/// operation, and leaves any failure in the banner; none of them fail.
pub struct ChatApp<S> {
    controller: SessionController<S>,
    view: ViewState,
}

impl<S: KeyValueStore> ChatApp<S> {
    pub fn new(controller: SessionController<S>, dark_mode: bool) -> Self {
        Self {
            controller,
            view: ViewState::new(dark_mode),
        }
    }

    /// Returns whether a session is now active.
    pub fn login(&mut self, req: &LoginRequest) -> bool {
        self.view.clear_banner();
        match self.controller.login(req) {
            Ok(_) => true,
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Returns whether a message was appended.
    pub fn send(&mut self, text: &str) -> bool {
        self.view.clear_banner();
        self.controller.send_message(text).is_some()
    }

    pub fn change_password(&mut self, req: &ChangePasswordRequest) -> bool {
        self.view.clear_banner();
        match self.controller.change_password(req) {
            Ok(()) => {
                self.view.set_notice(PASSWORD_CHANGED);
                true
            }
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    pub fn logout(&mut self) {
        self.controller.logout();
        self.view.clear_banner();
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        let dark = self.view.toggle_dark_mode();
        info!("Dark mode {}", if dark { "on" } else { "off" });
        dark
    }

    /// Surface a front-end input error the same way as any other failure.
    pub fn show_error(&mut self, text: impl Into<String>) {
        self.view.set_error(text);
    }

    pub fn controller(&self) -> &SessionController<S> {
        &self.controller
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    fn report(&mut self, err: &SessionError) {
        if let SessionError::Auth(AuthError::Store(e)) | SessionError::Password(PasswordError::Store(e)) = err {
            error!("Credential store failure: {}", e);
        }
        self.view.set_error(banner_text(err));
    }
}

/// What the user sees for `err`.
pub fn banner_text(err: &SessionError) -> String {
    match err {
        SessionError::Auth(AuthError::InvalidCredentials) => err.to_string(),
        SessionError::Auth(AuthError::Store(e)) => format!("Failed to log in: {e}"),
        SessionError::Password(PasswordError::Mismatch | PasswordError::TooShort) => err.to_string(),
        SessionError::Password(e) => format!("Failed to change password: {e}"),
        SessionError::NotLoggedIn => format!("Failed to change password: {err}"),
        SessionError::AlreadyLoggedIn(_) => format!("Log out first: {err}"),
    }
}
