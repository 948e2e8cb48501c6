pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod query;
pub mod records;

#[cfg(test)]
pub mod test_utils;

pub use error::{CqError, Result};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
