//! Herodex - Game data API
//!
//! A REST service over a hosted Postgres data API, managing heroes,
//! equipment, campaign chapters and missions, and the player event
//! calendar for a mobile-game companion site.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Game data entities and payload validation
//! - **infra**: Outbound clients (data API, auth admin) and repositories
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Export the hero dataset
//! cargo run -- export --out heroes.json
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use errors::{AppError, AppResult};
