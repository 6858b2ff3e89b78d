//! Handwave Common Utilities
//!
//! Shared infrastructure for all Handwave crates:
//! - Error types and result aliases
//! - Session clock for pacing and timestamping sensor frames
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
