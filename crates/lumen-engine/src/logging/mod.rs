//! Logging utilities.
//!
//! Everything in the engine logs through the `log` facade. This module only
//! owns backend initialization so binaries and tests get the same output.

mod init;

pub use init::{init_logging, LoggingConfig};
