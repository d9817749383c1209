use serde::{Deserialize, Serialize};
use std::fmt;

/// Bugzilla workflow status of a bug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BugStatus {
    New,
    Assigned,
    Post,
    OnDev,
    Modified,
    OnQa,
    /// Anything outside the active workflow, e.g. CLOSED or VERIFIED.
    Other(String),
}

impl BugStatus {
    /// Statuses a bug can be in while it still blocks a release.
    pub const ACTIVE: [BugStatus; 6] = [
        BugStatus::New,
        BugStatus::Assigned,
        BugStatus::Post,
        BugStatus::OnDev,
        BugStatus::Modified,
        BugStatus::OnQa,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            BugStatus::New => "NEW",
            BugStatus::Assigned => "ASSIGNED",
            BugStatus::Post => "POST",
            BugStatus::OnDev => "ON_DEV",
            BugStatus::Modified => "MODIFIED",
            BugStatus::OnQa => "ON_QA",
            BugStatus::Other(s) => s,
        }
    }

    /// Position in the workflow. Unknown statuses sort after everything else.
    pub fn rank(&self) -> u8 {
        match self {
            BugStatus::New => 0,
            BugStatus::Assigned => 1,
            BugStatus::Post => 2,
            BugStatus::OnDev => 3,
            BugStatus::Modified => 4,
            BugStatus::OnQa => 5,
            BugStatus::Other(_) => u8::MAX,
        }
    }
}

impl From<&str> for BugStatus {
    fn from(s: &str) -> Self {
        match s {
            "NEW" => BugStatus::New,
            "ASSIGNED" => BugStatus::Assigned,
            "POST" => BugStatus::Post,
            "ON_DEV" => BugStatus::OnDev,
            "MODIFIED" => BugStatus::Modified,
            "ON_QA" => BugStatus::OnQa,
            other => BugStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for BugStatus {
    fn from(s: String) -> Self {
        BugStatus::from(s.as_str())
    }
}

impl From<BugStatus> for String {
    fn from(status: BugStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for BugStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bug {
    pub id: u64,
    pub summary: String,
    pub status: BugStatus,
    pub last_change_time: String,
    pub weburl: String,
}

/// A release tracker bug and the release it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tracker {
    pub id: &'static str,
    pub release: &'static str,
}

/// The locally persisted note for one bug.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub last_change_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_known_names() {
        for status in BugStatus::ACTIVE {
            assert_eq!(BugStatus::from(status.as_str()), status);
        }
    }

    #[test]
    fn test_status_keeps_unknown_text() {
        let status = BugStatus::from("CLOSED");
        assert_eq!(status, BugStatus::Other("CLOSED".to_string()));
        assert_eq!(status.to_string(), "CLOSED");
        assert_eq!(status.rank(), u8::MAX);
    }

    #[test]
    fn test_status_serde_uses_bugzilla_names() {
        let json = serde_json::to_string(&BugStatus::OnQa).unwrap();
        assert_eq!(json, "\"ON_QA\"");

        let parsed: BugStatus = serde_json::from_str("\"ON_DEV\"").unwrap();
        assert_eq!(parsed, BugStatus::OnDev);
    }

    #[test]
    fn test_empty_record_deserializes_from_empty_object() {
        let record: StatusRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, StatusRecord::default());
    }
}
