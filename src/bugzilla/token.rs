//! Login tokens saved by the Bugzilla command line tooling.
//!
//! The token file is INI-style, one section per server host:
//!
//! ```text
//! [bugzilla.redhat.com]
//! token = 123456-AbCdEf
//! ```

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenCache {
    tokens: HashMap<String, String>,
}

impl TokenCache {
    /// A missing file is an empty cache.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Self::parse(&contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read token file {}", path.display()))
            }
        }
    }

    pub fn parse(contents: &str) -> Self {
        let mut tokens = HashMap::new();
        let mut section: Option<String> = None;

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = Some(name.trim().to_string());
                continue;
            }
            let Some(host) = &section else {
                continue;
            };
            if let Some((key, value)) = line.split_once(['=', ':']) {
                if key.trim() == "token" && !value.trim().is_empty() {
                    tokens.insert(host.clone(), value.trim().to_string());
                }
            }
        }

        TokenCache { tokens }
    }

    pub fn get(&self, host: &str) -> Option<&str> {
        self.tokens.get(host).map(String::as_str)
    }
}
