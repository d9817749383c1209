//! Hardcoded settings for a run.

use std::path::PathBuf;

use crate::models::Tracker;

pub const BUGZILLA_URL: &str = "https://bugzilla.redhat.com";

/// Name of the token file the Bugzilla command line tooling writes in `$HOME`.
pub const TOKEN_FILE_NAME: &str = ".bugzillatoken";

pub const STATUS_DIR: &str = "status";

pub const TRACKERS: [Tracker; 2] = [
    Tracker {
        id: "1548353",
        release: "OSP13",
    },
    Tracker {
        id: "1553640",
        release: "OSP14",
    },
];

#[derive(Debug, Clone)]
pub struct Config {
    pub url: String,
    /// `None` when the home directory cannot be determined.
    pub token_file: Option<PathBuf>,
    pub status_dir: PathBuf,
    pub trackers: Vec<Tracker>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: BUGZILLA_URL.to_string(),
            token_file: dirs::home_dir().map(|h| h.join(TOKEN_FILE_NAME)),
            status_dir: PathBuf::from(STATUS_DIR),
            trackers: TRACKERS.to_vec(),
        }
    }
}
