//! Logging setup.
//!
//! Everything in the engine reports through the `log` facade; this module only
//! wires `env_logger` up once for binaries that want console output.

mod init;

pub use init::{init_logging, LoggingConfig};
