//! Logging utilities.
//!
//! Centralizes logger initialization. Everything else logs through the `log`
//! facade; `env_logger` is only touched here.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
