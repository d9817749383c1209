pub mod prompt;
pub mod reconcile;
pub mod report;
