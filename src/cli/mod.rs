//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `export` - Write the hero dataset to a JSON file

pub mod args;

pub use args::{Cli, Commands};
