//! obfmeter-core
//!
//! Core library for measuring how much an obfuscator changed a compiled binary.
//!
//! This crate defines the instruction model, the disassembly-listing parser,
//! per-function metrics, the disassembler backends, and the comparison logic
//! that turns two binaries into a scored report.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends (CLI, CI gates, etc.).

pub mod analysis;
pub mod backends;
pub mod config;
pub mod logging;
pub mod model;
pub mod parser;
pub mod services;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
