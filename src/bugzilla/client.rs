use anyhow::{Context, Result};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::query::SearchQuery;
use super::token::TokenCache;
use super::transport::{Fault, HttpTransport, Transport};
use crate::config::Config;
use crate::models::{Bug, BugStatus};

/// Fault codes Bugzilla uses for "you must log in".
const LOGIN_REQUIRED_FAULTS: [i64; 2] = [505, 32000];

#[derive(Deserialize)]
struct SearchResult {
    bugs: Vec<RawBug>,
}

#[derive(Deserialize)]
struct RawBug {
    id: u64,
    #[serde(default)]
    summary: String,
    status: BugStatus,
    #[serde(default)]
    last_change_time: String,
}

pub struct BugzillaClient<T: Transport = HttpTransport> {
    transport: T,
    base_url: String,
    token: Option<String>,
}

impl BugzillaClient<HttpTransport> {
    /// Build the HTTP client for the configured server and pick up its token.
    pub fn connect(config: &Config) -> Result<Self> {
        let url = Url::parse(&config.url)
            .with_context(|| format!("Invalid Bugzilla URL '{}'", config.url))?;
        let host = url.host_str().unwrap_or_default().to_string();

        let token = match &config.token_file {
            Some(path) => TokenCache::load(path)?.get(&host).map(str::to_string),
            None => None,
        };
        debug!(host = %host, has_token = token.is_some(), "connecting to bugzilla");

        let transport = HttpTransport::new(&config.url)?;
        Ok(BugzillaClient::new(transport, &config.url, token))
    }
}

impl<T: Transport> BugzillaClient<T> {
    pub fn new(transport: T, base_url: &str, token: Option<String>) -> Self {
        BugzillaClient {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn call(&self, method: &str, mut params: Value) -> Result<Value> {
        if let (Some(token), Some(map)) = (&self.token, params.as_object_mut()) {
            map.insert("Bugzilla_token".to_string(), Value::String(token.clone()));
        }
        self.transport.call(method, params)
    }

    /// Whether the stored token is accepted by the server.
    pub fn logged_in(&self) -> Result<bool> {
        if self.token.is_none() {
            return Ok(false);
        }

        match self.call("User.get", json!({ "ids": [] })) {
            Ok(_) => Ok(true),
            Err(e) => match e.downcast_ref::<Fault>() {
                Some(fault) if LOGIN_REQUIRED_FAULTS.contains(&fault.code) => Ok(false),
                _ => Err(e),
            },
        }
    }

    pub fn search(&self, query: &SearchQuery) -> Result<Vec<Bug>> {
        let result = self
            .call("Bug.search", query.to_params())
            .with_context(|| format!("Bug.search for tracker {} failed", query.blocked_by))?;
        let result: SearchResult =
            serde_json::from_value(result).context("Unexpected Bug.search result")?;

        Ok(result
            .bugs
            .into_iter()
            .map(|raw| Bug {
                weburl: self.weburl(raw.id),
                id: raw.id,
                summary: raw.summary,
                status: raw.status,
                last_change_time: raw.last_change_time,
            })
            .collect())
    }

    pub fn weburl(&self, id: u64) -> String {
        format!("{}/{}", self.base_url, id)
    }
}
