//! WebSocket event DTOs.
//!
//! Inbound events arrive as a tagged union on the `type` field.
//! Outbound events are separate envelope structs that carry their
//! `type` explicitly, mirroring what clients switch on.
//!
//! Outbound payloads are built from projected views, never from the
//! raw domain entities. A serialized participant or message has
//! already passed through the per-viewer rules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{MessageView, ParticipantView, RoomProjection};

/// Outbound message type discriminator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    LoginSuccess,
    UpdateParticipants,
    NewMessage,
    Error,
}

// ========================================
// Inbound events (client → server)
// ========================================

/// Participant claim inside a login event.
///
/// `role` is part of the wire format and validated on receipt, but roles
/// are assigned server-side and the claimed value is not stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantClaimDto {
    pub id: String,
    pub name: String,
    pub role: String,
}

/// Inbound client event.
///
/// Unknown `type` values fail to parse and are answered with an error
/// event rather than being silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Join a room, creating it when absent.
    Login {
        room_id: String,
        participant: ParticipantClaimDto,
    },
    /// Send a message to a channel of the bound room.
    SendMessage {
        room_id: String,
        text: String,
        channel: String,
    },
    /// Change a participant's role (organizer only).
    AssignRole {
        room_id: String,
        participant_id: String,
        role: String,
    },
}

// ========================================
// Outbound events (server → client)
// ========================================

/// One participant, projected for the receiving connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantViewDto {
    pub id: String,
    pub name: String,
    pub role: String,
    pub alive: bool,
    pub connected: bool,
    pub color: String,
}

/// One message, projected for the receiving connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageViewDto {
    pub sender_id: String,
    pub sender_name: String,
    pub text: String,
    pub sent_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Room snapshot inside a login response.
///
/// Channel keys are a sorted map so the serialized form is stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSnapshotDto {
    pub id: String,
    pub participants: Vec<ParticipantViewDto>,
    pub channels: BTreeMap<String, Vec<MessageViewDto>>,
}

/// Login response, sent once to the logging-in connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginSuccessMessage {
    pub r#type: MessageType,
    pub room: RoomSnapshotDto,
}

impl LoginSuccessMessage {
    /// Build from a per-viewer room projection.
    pub fn from_projection(projection: RoomProjection) -> Self {
        Self {
            r#type: MessageType::LoginSuccess,
            room: projection.into(),
        }
    }
}

/// Participant list update, pushed to every connection in the room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateParticipantsMessage {
    pub r#type: MessageType,
    pub participants: Vec<ParticipantViewDto>,
}

impl UpdateParticipantsMessage {
    /// Build from per-viewer participant views.
    pub fn from_views(views: Vec<ParticipantView>) -> Self {
        Self {
            r#type: MessageType::UpdateParticipants,
            participants: views.into_iter().map(Into::into).collect(),
        }
    }
}

/// Message delivery, pushed to every connection in the room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessageMessage {
    pub r#type: MessageType,
    pub message: MessageViewDto,
    pub channel: String,
}

impl NewMessageMessage {
    /// Build from a per-recipient message variant.
    pub fn from_view(view: MessageView) -> Self {
        let channel = view.channel.as_str().to_string();
        Self {
            r#type: MessageType::NewMessage,
            message: view.into(),
            channel,
        }
    }
}

/// Error event, sent to the connection that caused it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub r#type: MessageType,
    pub code: String,
    pub msg: String,
}

impl ErrorMessage {
    /// Build from an error code and a human-readable description.
    pub fn new(code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            r#type: MessageType::Error,
            code: code.into(),
            msg: msg.into(),
        }
    }
}
