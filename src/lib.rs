pub mod app;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod index;
pub mod matcher;
pub mod terms;
pub mod test_utils;

pub use error::{AlignError, Result};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
