//! Shared utilities for the relief portal.

pub mod logging;

pub use logging::{init_tracing_with, LogFormat, LoggingError};
