//! Resto Server - restaurant management backend
//!
//! # Architecture
//!
//! - **Database** (`db`): embedded SurrealDB store, one table per entity kind
//! - **Authentication** (`auth`): JWT session/refresh tokens + Argon2 hashes
//! - **Billing** (`billing`): order billing aggregation pipeline
//! - **HTTP API** (`api`): RESTful routers and handlers
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # configuration, state, server
//! ├── auth/          # JWT tokens, passwords, middleware
//! ├── billing/       # order billing aggregator
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # models and repositories
//! └── utils/         # errors, logging, pagination
//! ```

pub mod api;
pub mod auth;
pub mod billing;
pub mod core;
pub mod db;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
