//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → tower-http TraceLayer (one span per request, tagged with x-request-id)
//! ```

pub mod logging;

pub use logging::init_logging;
