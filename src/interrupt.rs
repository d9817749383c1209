//! Ctrl-C handling.
//!
//! A watcher thread waits for SIGINT or SIGTERM and ends the run with a
//! message, even while the main thread is blocked reading the operator's
//! answer or waiting on the server.

use anyhow::{Context, Result};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use std::io::{self, Write};
use std::os::raw::c_int;
use std::{process, thread};
use tracing::debug;

pub const INTERRUPTED: &str = "Interrupted.";

/// Report the first signal delivered and return the exit code for it.
///
/// Returns `None` if the iterator ends without a signal.
pub fn report(signals: impl IntoIterator<Item = c_int>, err: &mut impl Write) -> Option<i32> {
    let signal = signals.into_iter().next()?;
    debug!(signal, "received signal");
    // Start on a fresh line; the terminal echoes ^C after the prompt.
    let _ = writeln!(err);
    let _ = writeln!(err, "{}", INTERRUPTED);
    let _ = err.flush();
    Some(128 + signal)
}

/// Install the watcher. Must be called once, before the first prompt.
pub fn install() -> Result<()> {
    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("Failed to register signal handlers")?;

    thread::Builder::new()
        .name("interrupt".to_string())
        .spawn(move || {
            if let Some(code) = report(signals.forever(), &mut io::stderr()) {
                process::exit(code);
            }
        })
        .context("Failed to start signal watcher")?;

    Ok(())
}
