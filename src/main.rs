use anyhow::Result;
use clap::Parser;
use std::io;
use tracing_subscriber::EnvFilter;

use bzwatch::bugzilla::BugzillaClient;
use bzwatch::commands::{self, prompt::ConsolePrompter};
use bzwatch::config::Config;
use bzwatch::store::StatusStore;

#[derive(Parser)]
#[command(name = "bzwatch")]
#[command(about = "Review the open bugs blocking each release tracker")]
#[command(version)]
struct Cli {}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    Cli::parse();
    init_tracing();
    #[cfg(unix)]
    bzwatch::interrupt::install()?;

    let config = Config::default();
    let client = BugzillaClient::connect(&config)?;
    let store = StatusStore::open(&config.status_dir)?;
    let mut prompter = ConsolePrompter::stdio();
    let mut out = io::stdout();

    commands::report::run_all(&client, &config.trackers, &store, &mut prompter, &mut out)
}
