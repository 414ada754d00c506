//! Configuration, logging, and minting for the `snowgen` binary.
//!
//! ## Structure
//!
//! - [`config`] - command-line and environment configuration.
//! - [`mint`] - builds the configured generator and writes identifiers.
//! - [`telemetry`] - stderr logging.

pub mod config;
pub mod mint;
pub mod telemetry;
