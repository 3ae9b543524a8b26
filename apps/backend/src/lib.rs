#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod middleware;
pub mod realtime;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod test_bootstrap;
pub mod trace_ctx;

// Re-exports for public API
pub use config::db::{DbKind, DbSettings};
pub use config::engine::EngineConfig;
pub use error::AppError;
pub use infra::db::{bootstrap_db, connect_db};
pub use infra::state::build_state;
pub use middleware::request_trace::RequestTrace;
pub use services::engine::GameEngine;
pub use state::app_state::AppState;
