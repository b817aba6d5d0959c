mod command;
mod config;
mod render;

use std::io::{self, BufRead, Write};

use tracing::info;

use prochat_session::{ChatApp, SessionController};
use prochat_store::{CredentialStore, JsonFileStore, KeyValueStore, MemoryStore, SqliteStore};

use crate::command::{Command, Flow, HELP};
use crate::config::{Backend, Config};

fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr so they don't interleave with the conversation
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prochat=info,prochat_store=info,prochat_session=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let store: Box<dyn KeyValueStore> = match &config.backend {
        Backend::Memory => Box::new(MemoryStore::new()),
        Backend::File(path) => Box::new(JsonFileStore::open(path)?),
        Backend::Sqlite(path) => Box::new(SqliteStore::open(path)?),
    };
    info!("Using {:?} credential store", config.backend);

    let credentials = CredentialStore::open(store)?;
    let mut app = ChatApp::new(SessionController::new(credentials), config.dark_mode);

    run(&mut app, io::stdin().lock(), io::stdout().lock())
}

/// Read commands until EOF or `/quit`, redrawing after each one.
fn run<S: KeyValueStore>(
    app: &mut ChatApp<S>,
    input: impl BufRead,
    mut output: impl Write,
) -> anyhow::Result<()> {
    write!(output, "{}", render::screen(app))?;
    writeln!(output, "Type /help for commands.")?;
    prompt(&mut output)?;

    for line in input.lines() {
        match Command::parse(&line?).apply(app) {
            Flow::Exit => break,
            Flow::ShowHelp => writeln!(output, "{HELP}")?,
            Flow::Render => write!(output, "{}", render::screen(app))?,
        }
        prompt(&mut output)?;
    }

    Ok(())
}

fn prompt(output: &mut impl Write) -> io::Result<()> {
    write!(output, "> ")?;
    output.flush()
}
