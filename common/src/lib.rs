//! Shared building blocks for the `scan_os` workspace.
//!
//! Everything in here is free of network I/O: configuration, typed errors,
//! the range expander, probe outcomes and the result file format.

pub mod config;
pub mod error;
pub mod log;
pub mod network;
pub mod output;
pub mod scan;
