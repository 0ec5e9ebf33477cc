//! Real-time coordination server for Mafia-style social deduction games.
//!
//! Rooms are keyed by the organizer's participant id and created on first
//! login. Participant state is projected per viewer and messages are routed
//! per recipient, so what each connection sees depends on its role.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
