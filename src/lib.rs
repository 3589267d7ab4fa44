// en2ja - English/Japanese translation with a local translation memory
// Author: kelexine (https://github.com/kelexine)

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod models;
pub mod server;
pub mod translator;
pub mod utils;
