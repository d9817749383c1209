use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::cell::Cell;
use tracing::debug;

/// An error object returned by the server in place of a result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Bugzilla fault {code}: {message}")]
pub struct Fault {
    pub code: i64,
    pub message: String,
}

/// Sends one RPC call and returns its `result` member.
///
/// Server-side errors come back as a [`Fault`] inside the `anyhow::Error`.
pub trait Transport {
    fn call(&self, method: &str, params: Value) -> Result<Value>;
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// JSON-RPC over HTTP against `<base>/jsonrpc.cgi`.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    next_id: Cell<u64>,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self> {
        // No timeout: a stalled server blocks the run.
        let client = Client::builder()
            .timeout(None)
            .user_agent(concat!("bzwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(HttpTransport {
            client,
            endpoint: format!("{}/jsonrpc.cgi", base_url.trim_end_matches('/')),
            next_id: Cell::new(1),
        })
    }
}

impl Transport for HttpTransport {
    fn call(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        debug!(method, id, endpoint = %self.endpoint, "sending rpc call");

        let body = json!({
            "method": method,
            "params": [params],
            "id": id,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .with_context(|| format!("{} request to {} failed", method, self.endpoint))?;

        let status = response.status();
        let text = response
            .text()
            .with_context(|| format!("Failed to read {} response", method))?;

        let decoded: RpcResponse = match serde_json::from_str(&text) {
            Ok(decoded) => decoded,
            Err(_) if !status.is_success() => {
                bail!("{} request failed with status {}: {}", method, status, text)
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Malformed {} response", method));
            }
        };

        decode_response(decoded)
    }
}

fn decode_response(response: RpcResponse) -> Result<Value> {
    if let Some(error) = response.error {
        return Err(Fault {
            code: error.code,
            message: error.message,
        }
        .into());
    }
    Ok(response.result.unwrap_or(Value::Null))
}
