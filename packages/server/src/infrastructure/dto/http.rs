//! HTTP API response DTOs.
//!
//! The HTTP API is an operator surface. It returns the true room
//! state without per-viewer filtering, like an organizer would see.

use serde::{Deserialize, Serialize};

/// Room summary for the room list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    /// Participant ids in join order.
    pub participants: Vec<String>,
    pub created_at: String,
}

/// Participant entry in the room detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantDetailDto {
    pub id: String,
    pub name: String,
    pub role: String,
    pub alive: bool,
    pub connected: bool,
    pub joined_at: String,
}

/// Room detail for the room detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub participants: Vec<ParticipantDetailDto>,
    /// Message count per channel.
    pub message_counts: std::collections::BTreeMap<String, usize>,
    pub created_at: String,
}
