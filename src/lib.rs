pub mod analytics;
pub mod config;
pub mod error;
pub mod journal;
pub mod logging;
pub mod models;
pub mod report;
pub mod server;
#[cfg(test)]
pub mod test_helpers;
