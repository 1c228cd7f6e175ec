// Shared plumbing for the dugout crates: configuration and tracing setup.

pub mod config;
pub mod logging;
