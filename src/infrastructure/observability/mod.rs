//! Log output for the batch binaries.
//!
//! Logs go to stderr through `tracing`; artifacts are the only thing written
//! to disk.

mod logging;

pub use logging::init_logging;
