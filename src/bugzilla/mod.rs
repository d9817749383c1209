//! Talking to a Bugzilla server over JSON-RPC.

pub mod client;
pub mod query;
pub mod token;
pub mod transport;

pub use client::BugzillaClient;
pub use query::{build_query, SearchQuery};
pub use token::TokenCache;
pub use transport::{Fault, HttpTransport, Transport};
