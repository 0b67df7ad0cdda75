//! Utilities module for error handling and logging
//!
//! This module provides:
//! - Error handling types for manifest, access, and archive failures
//! - Structured logging with tracing

pub mod error;
pub mod logging;

// Re-export main types for convenience
pub use error::{Result, SpoofError};
pub use logging::init_logging;
