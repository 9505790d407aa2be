//! Observability
//!
//! Structured logging for the `storypages` binary. The library itself only
//! emits `tracing` events; installing a subscriber is the binary's job.

pub mod logging;

pub use logging::{LogFormat, init_logging};
