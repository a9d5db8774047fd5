//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (request_id, stream, error)
//!     → TraceLayer spans per HTTP request
//!
//! Consumer:
//!     → logging.rs (fmt subscriber, pretty or JSON, to stdout)
//! ```

pub mod logging;

pub use logging::init_logging;
