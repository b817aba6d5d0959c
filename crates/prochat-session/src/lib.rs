//! Session lifecycle and the session-scoped message feed.
//!
//! [`SessionController`] owns the login state and the feed and delegates
//! credential checks to a [`CredentialStore`](prochat_store::CredentialStore).
//! [`ChatApp`] wraps it with the transient view state (status banner, dark
//! mode) and is what a front-end dispatches its commands to.

pub mod app;
pub mod controller;
pub mod feed;
pub mod view;

pub use app::ChatApp;
pub use controller::{SessionController, SessionError, SessionState};
pub use feed::Feed;
pub use view::{Banner, BannerKind, ViewState};
