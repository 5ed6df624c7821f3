//! Logger bootstrap.
//!
//! The crate itself only logs through the `log` facade. Binaries and tests
//! that want to see those records call [`init_logging`] once.

mod init;

pub use init::{init_logging, LoggingConfig};
