//! Utility modules.

/// Date/time serialization helpers shared by drivers.
pub mod datetime;

/// Number/string tolerant deserializers for vendor payloads.
pub(crate) mod lenient;

/// Log sanitization utilities to prevent sensitive data exposure.
pub(crate) mod log_sanitizer;
