use serde_json::{json, Value};

use crate::models::BugStatus;

/// Fields requested from `Bug.search`.
pub const INCLUDE_FIELDS: [&str; 4] = ["id", "summary", "status", "last_change_time"];

/// A `Bug.search` request for the open bugs blocking one tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub blocked_by: String,
    pub statuses: Vec<BugStatus>,
    pub include_fields: Vec<String>,
}

impl SearchQuery {
    /// Render as Bugzilla boolean chart parameters.
    pub fn to_params(&self) -> Value {
        let statuses: Vec<&str> = self.statuses.iter().map(BugStatus::as_str).collect();
        json!({
            "include_fields": self.include_fields,
            "f1": "blocked",
            "o1": "equals",
            "v1": self.blocked_by,
            "f2": "bug_status",
            "o2": "anywords",
            "v2": statuses.join(" "),
        })
    }
}

pub fn build_query(tracker_id: &str) -> SearchQuery {
    SearchQuery {
        blocked_by: tracker_id.to_string(),
        statuses: BugStatus::ACTIVE.to_vec(),
        include_fields: INCLUDE_FIELDS.iter().map(|f| f.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TRACKERS;

    #[test]
    fn test_query_filters_on_tracker_and_active_statuses() {
        for tracker in TRACKERS {
            let query = build_query(tracker.id);
            assert_eq!(query.blocked_by, tracker.id);
            assert_eq!(query.statuses, BugStatus::ACTIVE.to_vec());

            let params = query.to_params();
            assert_eq!(params["f1"], "blocked");
            assert_eq!(params["o1"], "equals");
            assert_eq!(params["v1"], tracker.id);
            assert_eq!(params["f2"], "bug_status");
            assert_eq!(params["o2"], "anywords");
        }
    }

    #[test]
    fn test_query_lists_exactly_six_statuses() {
        let params = build_query("1548353").to_params();
        let words: Vec<&str> = params["v2"].as_str().unwrap().split(' ').collect();
        assert_eq!(
            words,
            vec!["NEW", "ASSIGNED", "POST", "ON_DEV", "MODIFIED", "ON_QA"]
        );
    }

    #[test]
    fn test_query_requests_last_change_time() {
        let params = build_query("1548353").to_params();
        let fields: Vec<&str> = params["include_fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["id", "summary", "status", "last_change_time"]);
    }

    #[test]
    fn test_queries_do_not_alias() {
        let mut first = build_query("1548353");
        first.statuses.push(BugStatus::Other("CLOSED".to_string()));
        first.include_fields.clear();

        let second = build_query("1548353");
        assert_eq!(second.statuses.len(), 6);
        assert_eq!(second.include_fields.len(), 4);
    }
}
