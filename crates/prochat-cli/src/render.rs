use std::fmt::Write;

use chrono::Local;

use prochat_session::{BannerKind, ChatApp};
use prochat_store::KeyValueStore;
use prochat_store::seed::{DEFAULT_PASSWORD, seed_display_names};
use prochat_types::{Message, Session};

pub const TITLE: &str = "Pro Chat (Local)";
pub const EMPTY_FEED: &str = "No messages yet. Start chatting!";

/// Draw the whole screen. Called after every command; the full history is
/// redrawn each time.
pub fn screen<S: KeyValueStore>(app: &ChatApp<S>) -> String {
    let mut out = String::new();
    let theme = if app.view().dark_mode() { "dark" } else { "light" };
    let _ = writeln!(out, "== {TITLE} == [{theme}]");

    if let Some(banner) = app.view().banner() {
        let tag = match banner.kind {
            BannerKind::Error => "!",
            BannerKind::Notice => "*",
        };
        let _ = writeln!(out, "[{tag}] {}", banner.text);
    }

    match app.controller().session() {
        None => {
            out.push_str("Please log in to start chatting.\n");
            let _ = writeln!(out, "{}", login_hint());
        }
        Some(session) => {
            let _ = writeln!(out, "Welcome, {}!", session.display_name);
            out.push_str(&feed(app.controller().messages(), session));
            let _ = writeln!(out, "Your User ID: {}", session.uid);
        }
    }

    out
}

pub fn login_hint() -> String {
    let names: Vec<&str> = seed_display_names().collect();
    format!(
        "Predefined IDs: {} (Password: {DEFAULT_PASSWORD})",
        names.join(", ")
    )
}

pub fn feed<'a>(messages: impl Iterator<Item = &'a Message>, viewer: &Session) -> String {
    let mut out = String::new();
    let mut any = false;
    for msg in messages {
        any = true;
        let _ = writeln!(out, "{}", message_line(msg, viewer));
    }
    if !any {
        let _ = writeln!(out, "  {EMPTY_FEED}");
    }
    out
}

fn message_line(msg: &Message, viewer: &Session) -> String {
    let author = if msg.is_from(viewer) {
        "You"
    } else {
        msg.display_username.as_str()
    };
    let time = msg.timestamp.with_timezone(&Local).format("%H:%M:%S");
    format!("  [{time}] {author}: {}", msg.text)
}
