//! Utility functions and helpers for en2ja.
//!
//! This module provides cross-cutting concerns like structured logging,
//! API key scrubbing, and retry logic with backoff.
//!
//! # Submodules
//!
//! - `logging`: Tracing and logging initialization with secret filters.
//! - `retry`: Retry mechanisms that respect upstream API hints.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
pub mod retry;
