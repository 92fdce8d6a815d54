//! Configuration module for the Aircall MCP server.
//!
//! Settings come from an optional TOML file, overridden by `AIRCALL_*`
//! environment variables.

mod settings;

pub use settings::{AircallSettings, GeneralSettings, Settings, DEFAULT_BASE_URL};
