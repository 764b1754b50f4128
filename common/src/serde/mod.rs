//! Serde adapters for the configuration types.

pub mod duration_ms;
