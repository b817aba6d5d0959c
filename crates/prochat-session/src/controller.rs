use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};

use prochat_store::{AuthError, CredentialStore, KeyValueStore, PasswordError};
use prochat_types::api::{ChangePasswordRequest, LoginRequest};
use prochat_types::{Message, Session};

use crate::feed::Feed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("already logged in as {0}")]
    AlreadyLoggedIn(String),

    #[error("not logged in")]
    NotLoggedIn,
}

/// Who is logged in, plus the feed that belongs to that login.
///
/// The feed lives exactly as long as the session: logging out clears it.
pub struct SessionController<S> {
    credentials: CredentialStore<S>,
    session: Option<Session>,
    feed: Feed,
}

impl<S: KeyValueStore> SessionController<S> {
    pub fn new(credentials: CredentialStore<S>) -> Self {
        Self {
            credentials,
            session: None,
            feed: Feed::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        match self.session {
            Some(_) => SessionState::LoggedIn,
            None => SessionState::LoggedOut,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn login(&mut self, req: &LoginRequest) -> Result<&Session, SessionError> {
        if let Some(current) = &self.session {
            return Err(SessionError::AlreadyLoggedIn(current.uid.clone()));
        }

        let session = self.credentials.authenticate(
            &req.username,
            &req.password,
            req.display_name_override(),
        )?;

        Ok(self.session.insert(session))
    }

    /// End the session and drop its messages. Returns the session that
    /// ended, if any.
    pub fn logout(&mut self) -> Option<Session> {
        let ended = self.session.take();
        let dropped = self.feed.len();
        self.feed.clear();

        if let Some(session) = &ended {
            info!("{} logged out, cleared {} messages", session.uid, dropped);
        }
        ended
    }

    /// Append `text` to the feed as the current user. Blank text, or no
    /// session, is a no-op.
    pub fn send_message(&mut self, text: &str) -> Option<&Message> {
        if text.trim().is_empty() {
            return None;
        }
        let session = self.session.as_ref()?;

        let message = self.feed.push(text, session, Utc::now());
        debug!("{} sent message {}", message.user_id, message.id);
        Some(message)
    }

    /// Change the logged-in user's password.
    pub fn change_password(&mut self, req: &ChangePasswordRequest) -> Result<(), SessionError> {
        let session = self.session.as_ref().ok_or(SessionError::NotLoggedIn)?;
        self.credentials
            .change_password(&session.username, &req.new_password, &req.confirm_password)?;
        Ok(())
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> + '_ {
        self.feed.iter()
    }

    pub fn credentials(&self) -> &CredentialStore<S> {
        &self.credentials
    }
}

#[cfg(test)]
mod tests {
    use prochat_store::MemoryStore;
    use prochat_store::seed::DEFAULT_PASSWORD;

    use super::*;

    fn controller() -> SessionController<MemoryStore> {
        SessionController::new(CredentialStore::open(MemoryStore::new()).unwrap())
    }

    fn login_as(ctl: &mut SessionController<MemoryStore>, username: &str) {
        ctl.login(&LoginRequest::new(username, DEFAULT_PASSWORD, "")).unwrap();
    }

    #[test]
    fn starts_logged_out() {
        let ctl = controller();
        assert_eq!(ctl.state(), SessionState::LoggedOut);
        assert!(ctl.session().is_none());
        assert!(ctl.feed().is_empty());
    }

    #[test]
    fn login_uses_override_or_stored_name() {
        let mut ctl = controller();
        let session = ctl
            .login(&LoginRequest::new("Guest", DEFAULT_PASSWORD, " Ryan Chat "))
            .unwrap();
        assert_eq!(session.uid, "guest");
        assert_eq!(session.display_name, "Ryan Chat");
        assert_eq!(ctl.state(), SessionState::LoggedIn);

        ctl.logout();
        let session = ctl.login(&LoginRequest::new("guest", DEFAULT_PASSWORD, "")).unwrap();
        assert_eq!(session.display_name, "Ryan Chat");
    }

    #[test]
    fn failed_login_stays_logged_out() {
        let mut ctl = controller();
        let err = ctl.login(&LoginRequest::new("ryan", "nope", "")).unwrap_err();
        assert!(matches!(err, SessionError::Auth(AuthError::InvalidCredentials)));
        assert_eq!(ctl.state(), SessionState::LoggedOut);
    }

    #[test]
    fn second_login_is_rejected() {
        let mut ctl = controller();
        login_as(&mut ctl, "ryan");

        let err = ctl.login(&LoginRequest::new("guest", DEFAULT_PASSWORD, "")).unwrap_err();
        assert!(matches!(err, SessionError::AlreadyLoggedIn(uid) if uid == "ryan"));
        assert_eq!(ctl.session().unwrap().uid, "ryan");
    }

    #[test]
    fn blank_messages_are_ignored() {
        let mut ctl = controller();
        login_as(&mut ctl, "ryan");

        assert!(ctl.send_message("").is_none());
        assert!(ctl.send_message("   ").is_none());
        assert!(ctl.send_message("\n\t").is_none());
        assert!(ctl.feed().is_empty());

        let msg = ctl.send_message("hi").unwrap();
        assert_eq!(msg.text, "hi");
        assert_eq!(ctl.feed().len(), 1);
    }

    #[test]
    fn text_is_kept_as_typed() {
        let mut ctl = controller();
        login_as(&mut ctl, "ryan");
        assert_eq!(ctl.send_message("  padded  ").unwrap().text, "  padded  ");
    }

    #[test]
    fn send_without_session_is_noop() {
        let mut ctl = controller();
        assert!(ctl.send_message("hello?").is_none());
        assert!(ctl.feed().is_empty());
    }

    #[test]
    fn logout_clears_feed() {
        let mut ctl = controller();
        login_as(&mut ctl, "guest1");
        ctl.send_message("one");
        ctl.send_message("two");

        let ended = ctl.logout().unwrap();
        assert_eq!(ended.uid, "guest1");
        assert_eq!(ctl.state(), SessionState::LoggedOut);
        assert!(ctl.feed().is_empty());

        login_as(&mut ctl, "guest1");
        assert_eq!(ctl.messages().count(), 0);
    }

    #[test]
    fn logout_when_logged_out_is_harmless() {
        let mut ctl = controller();
        assert!(ctl.logout().is_none());
        assert_eq!(ctl.state(), SessionState::LoggedOut);
    }

    #[test]
    fn change_password_requires_session() {
        let mut ctl = controller();
        let err = ctl
            .change_password(&ChangePasswordRequest::new("abcdef", "abcdef"))
            .unwrap_err();
        assert!(matches!(err, SessionError::NotLoggedIn));
    }

    #[test]
    fn change_password_applies_to_current_user() {
        let mut ctl = controller();
        login_as(&mut ctl, "Guest2");

        let err = ctl
            .change_password(&ChangePasswordRequest::new("abcdef", "abcdeg"))
            .unwrap_err();
        assert!(matches!(err, SessionError::Password(PasswordError::Mismatch)));

        let err = ctl
            .change_password(&ChangePasswordRequest::new("abc", "abc"))
            .unwrap_err();
        assert!(matches!(err, SessionError::Password(PasswordError::TooShort)));

        ctl.change_password(&ChangePasswordRequest::new("abcdef", "abcdef"))
            .unwrap();
        assert!(ctl.credentials().authenticate("guest2", "abcdef", None).is_ok());
        assert!(ctl.credentials().authenticate("guest2", DEFAULT_PASSWORD, None).is_err());
    }
}
