//! Structured logging for vidwatch.
//!
//! Handles subscriber setup (console plus optional rolling NDJSON file) and
//! redaction of credentials from strings that leave the process.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;
