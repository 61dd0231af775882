//! Structured logging for devcon.
//!
//! Console and rolling-file `tracing` output plus redaction of secrets in
//! logged command lines.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::{redact_command_line, redact_sensitive_data};
