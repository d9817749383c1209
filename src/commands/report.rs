use anyhow::{bail, Context, Result};
use std::io::Write;
use tracing::{info, warn};

use super::prompt::Prompter;
use super::reconcile::reconcile;
use crate::bugzilla::{build_query, BugzillaClient, Transport};
use crate::models::{Bug, BugStatus, Tracker};
use crate::store::StatusStore;

/// Order bugs by workflow position, NEW first. Stable for equal statuses.
pub fn sort_by_status(bugs: &mut [Bug]) {
    for bug in bugs.iter() {
        if let BugStatus::Other(status) = &bug.status {
            warn!(bug_id = bug.id, status = %status, "unexpected status, sorting last");
        }
    }
    bugs.sort_by_key(|b| b.status.rank());
}

/// Report on every open bug blocking one tracker, refreshing stale actions.
pub fn run<T: Transport>(
    client: &BugzillaClient<T>,
    tracker: &Tracker,
    store: &StatusStore,
    prompter: &mut impl Prompter,
    out: &mut impl Write,
) -> Result<()> {
    let query = build_query(tracker.id);
    let mut bugs = client.search(&query)?;
    let count = bugs.len();
    info!(tracker = tracker.id, count, "search complete");

    writeln!(out, "Found {} bugs blocking {}", count, tracker.release)?;
    sort_by_status(&mut bugs);

    for bug in &bugs {
        writeln!(out)?;
        writeln!(out, "{} - {} - {}", bug.weburl, bug.status, bug.summary)?;
        out.flush()?;

        let action = reconcile(bug, store, &mut *prompter)?;
        writeln!(out, "    action: {}", action)?;
    }

    Ok(())
}

pub const NOT_LOGGED_IN: &str = "Not logged in, see ~/.bugzillatoken.";

/// Check the login once, then report on each tracker in turn.
pub fn run_all<T: Transport>(
    client: &BugzillaClient<T>,
    trackers: &[Tracker],
    store: &StatusStore,
    prompter: &mut impl Prompter,
    out: &mut impl Write,
) -> Result<()> {
    let logged_in = client.logged_in().context("Bugzilla login check failed")?;
    if !logged_in {
        bail!(NOT_LOGGED_IN);
    }

    for tracker in trackers {
        run(client, tracker, store, &mut *prompter, &mut *out)?;
    }

    Ok(())
}
