//! CLI client for the Omerta game coordination server.
//!
//! Logs in to a room over WebSocket, renders the role-filtered view the
//! server projects for this participant and sends channel messages from
//! stdin.

mod domain;
mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use error::ClientError;
pub use runner::{ClientConfig, run_client};
