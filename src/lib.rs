//! Case tracking service - ownership and lifecycle management
//!
//! A legal case-tracking API built on Axum and SeaORM with a clean
//! architecture layout. The core concerns are case ownership: lazy
//! per-user personal file cases, single and bulk ownership transfers,
//! transactional user deletion, and cascading case deletion with
//! remote file cleanup.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and logic
//! - **services**: Application use cases and business logic
//! - **infra**: Infrastructure concerns (database, object storage)
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Seed the initial admin account
//! cargo run -- seed
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Actor, Case, Upload, User, UserRole};
pub use errors::{AppError, AppResult};
