pub mod bugzilla;
pub mod commands;
pub mod config;
#[cfg(unix)]
pub mod interrupt;
pub mod models;
pub mod store;
