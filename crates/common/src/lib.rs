//! rsurf Common Utilities
//!
//! Shared infrastructure for all rsurf crates:
//! - Error types, result aliases and exit-code mapping
//! - Creation-time resolution for reproducible output
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
