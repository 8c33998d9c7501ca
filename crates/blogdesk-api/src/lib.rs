//! # blogdesk-api
//!
//! HTTP API layer for BlogDesk built on Axum.
//!
//! Provides all REST endpoints, middleware (CORS, logging, compression,
//! timeouts), extractors, DTOs, and error mapping into the JSON envelope.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
