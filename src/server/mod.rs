//! Axum-based HTTP API for the CMS dashboard.
//!
//! The dashboard posts English (or Japanese) field text here when an editor
//! saves a section and receives the counterpart translation, served from the
//! translation memory whenever possible.
//!
//! # Components
//!
//! - `handlers`: translate, batch, auto-detect, memory maintenance, health and metrics endpoints.
//! - `middleware`: request ID tracking and CORS.
//! - `routes`: the router and shared application state.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use handlers::{BatchTranslateResponse, EvictResponse, HealthResponse, HealthStatus};
pub use routes::{create_router, AppState};
