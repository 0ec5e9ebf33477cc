//! Shared utilities for the omerta workspace.
//!
//! Logging setup and time helpers used by both the game server and the
//! CLI client binaries.

pub mod logger;
pub mod time;
