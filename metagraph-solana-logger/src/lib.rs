//! `tracing` initialisation for Metagraph services.
//!
//! Downstream binaries (and the ingester's integration tests) describe their
//! logging with a serde-deserialisable [`LogConfig`] and call [`init`] once at
//! startup.

mod logging;

pub use logging::{init, LogConfig, LogFormat, LogOutput};
