use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::cmp::Ordering;
use tracing::{debug, warn};

use super::prompt::Prompter;
use crate::models::Bug;
use crate::store::StatusStore;

/// XML-RPC style `dateTime.iso8601`, as older Bugzilla clients store it.
const XMLRPC_FORMAT: &str = "%Y%m%dT%H:%M:%S";

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, XMLRPC_FORMAT)
        .ok()
        .map(|dt| dt.and_utc())
}

/// Whether `remote` is strictly later than `recorded`.
pub fn is_newer(remote: &str, recorded: &str) -> bool {
    let ordering = match (parse_timestamp(remote), parse_timestamp(recorded)) {
        (Some(r), Some(l)) => r.cmp(&l),
        _ => {
            warn!(remote, recorded, "unparseable timestamp, comparing as text");
            remote.cmp(recorded)
        }
    };
    ordering == Ordering::Greater
}

/// Return the current action for a bug, asking the operator for a new one
/// when the bug changed since the action was recorded.
pub fn reconcile(bug: &Bug, store: &StatusStore, prompter: &mut impl Prompter) -> Result<String> {
    let record = store.load(bug.id)?;

    let stale = match &record.last_change_time {
        None => true,
        Some(recorded) => is_newer(&bug.last_change_time, recorded),
    };

    if !stale {
        debug!(bug_id = bug.id, "status record is current");
        return Ok(record.action.unwrap_or_default());
    }

    let action = prompter.prompt_new_action(record.action.as_deref())?;
    store.save(bug.id, &action, &bug.last_change_time)?;
    Ok(action)
}
