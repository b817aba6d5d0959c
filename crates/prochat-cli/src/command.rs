use prochat_session::ChatApp;
use prochat_store::KeyValueStore;
use prochat_types::api::{ChangePasswordRequest, LoginRequest};

pub const HELP: &str = "\
Commands:
  /login <username> <password> [display name]
  /passwd <new password> <confirm password>
  /logout
  /dark          toggle dark mode
  /help
  /quit
Anything else is sent as a message (start with // to send a leading /).";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login(String, String, String),
    ChangePassword(String, String),
    Logout,
    ToggleDarkMode,
    Help,
    Quit,
    Send(String),
    /// A `/command` that needs arguments it didn't get, or doesn't exist.
    Invalid(String),
}

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Render,
    ShowHelp,
    Exit,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);

        if let Some(escaped) = line.strip_prefix("//") {
            return Self::Send(format!("/{escaped}"));
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Self::Send(line.to_string());
        };

        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };

        match name {
            "login" => {
                let (user, rest) = next_word(args);
                let (pass, display) = next_word(rest);
                if user.is_empty() || pass.is_empty() {
                    return Self::Invalid("usage: /login <username> <password> [display name]".into());
                }
                Self::Login(user.into(), pass.into(), display.trim().into())
            }
            "passwd" => {
                let parts: Vec<&str> = args.split_whitespace().collect();
                match parts.as_slice() {
                    [new, confirm] => Self::ChangePassword((*new).into(), (*confirm).into()),
                    _ => Self::Invalid("usage: /passwd <new password> <confirm password>".into()),
                }
            }
            "logout" => Self::Logout,
            "dark" => Self::ToggleDarkMode,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => Self::Invalid(format!("unknown command /{other}, try /help")),
        }
    }

    /// Run against `app`. `Invalid` lands in the banner like any other error.
    pub fn apply<S: KeyValueStore>(self, app: &mut ChatApp<S>) -> Flow {
        match self {
            Self::Login(username, password, display_name) => {
                app.login(&LoginRequest {
                    username,
                    password,
                    display_name,
                });
            }
            Self::ChangePassword(new_password, confirm_password) => {
                app.change_password(&ChangePasswordRequest {
                    new_password,
                    confirm_password,
                });
            }
            Self::Logout => app.logout(),
            Self::ToggleDarkMode => {
                app.toggle_dark_mode();
            }
            Self::Send(text) => {
                app.send(&text);
            }
            Self::Invalid(reason) => app.show_error(reason),
            Self::Help => return Flow::ShowHelp,
            Self::Quit => return Flow::Exit,
        }
        Flow::Render
    }
}

/// Split off the first whitespace-delimited word, skipping any run of
/// whitespace before and after it.
fn next_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (input, ""),
    }
}
