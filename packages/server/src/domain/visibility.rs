//! Per-viewer projection of participant state.
//!
//! Pure functions that compute what a given viewer is allowed to see.
//! The stored room state always carries true names and roles; nothing
//! in this module mutates it. Each viewer gets their own projection,
//! so two players looking at the same room see different lists.
//!
//! Projection rules:
//!
//! - The organizer sees everything: true names, true roles, and the
//!   role color of every participant.
//! - Every player sees their own true name and role.
//! - Mafia members see each other with true names and roles, in red.
//! - The organizer is never anonymized. Players see the organizer's
//!   true name with the `organizer` role.
//! - Everyone else appears as an anonymous placeholder with a hidden
//!   role.
//! - Liveness and connectivity flags pass through unfiltered. Votes
//!   and eliminations need them regardless of who is looking.

use super::entity::{Participant, Room};
use super::routing::{build_recipient_variant, MessageView};
use super::value_object::{Channel, Color, ParticipantId, Role, RoomId};

/// Role as presented to a specific viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleLabel {
    /// The viewer is allowed to see the true role.
    Revealed(Role),
    /// The role is hidden from this viewer.
    Hidden,
}

impl RoleLabel {
    /// Wire representation. Hidden roles render as the neutral
    /// `participant` label.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleLabel::Revealed(role) => role.as_str(),
            RoleLabel::Hidden => "participant",
        }
    }
}

/// One participant as a specific viewer sees them.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantView {
    /// Participant id (never anonymized; ids are public).
    pub id: ParticipantId,
    /// Display name, possibly replaced by an anonymous placeholder.
    pub name: String,
    /// Role label for this viewer.
    pub role: RoleLabel,
    /// True liveness flag.
    pub alive: bool,
    /// True connectivity flag.
    pub connected: bool,
    /// Highlight color for this entry.
    pub color: Color,
}

/// Full room state as a specific viewer sees it.
///
/// This is the payload of a login snapshot: participant list plus the
/// archived history of every channel, all projected for the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomProjection {
    /// Room id.
    pub room_id: RoomId,
    /// Participant list in join order, projected for the viewer.
    pub participants: Vec<ParticipantView>,
    /// Channel history in channel declaration order, projected for
    /// the viewer.
    pub channels: Vec<(Channel, Vec<MessageView>)>,
}

/// Placeholder name shown for anonymized participants.
///
/// Ids are public, so the placeholder embeds the id. Two anonymized
/// entries stay distinguishable without revealing who they are.
pub fn anonymous_label(participant_id: &ParticipantId) -> String {
    format!("Participant {}", participant_id.as_str())
}

/// Project a single participant for a specific viewer.
///
/// # Arguments
///
/// * `viewer` - The participant the projection is built for
/// * `target` - The participant being looked at
///
/// # Returns
///
/// The view of `target` that `viewer` is allowed to receive
pub fn view_of(viewer: &Participant, target: &Participant) -> ParticipantView {
    let (name, role, color) = if viewer.role == Role::Organizer {
        // Organizer sees the true state with role colors.
        (
            target.name.as_str().to_string(),
            RoleLabel::Revealed(target.role),
            target.role.color(),
        )
    } else if target.id == viewer.id {
        // Own entry: true name and role. Mafia members see their own
        // entry in red, everyone else in black.
        let color = if viewer.role == Role::Mafia {
            Color::Red
        } else {
            Color::Black
        };
        (
            target.name.as_str().to_string(),
            RoleLabel::Revealed(target.role),
            color,
        )
    } else if viewer.role == Role::Mafia && target.role == Role::Mafia {
        // Mafia members recognize each other.
        (
            target.name.as_str().to_string(),
            RoleLabel::Revealed(Role::Mafia),
            Color::Red,
        )
    } else if target.role == Role::Organizer {
        // The organizer is public knowledge.
        (
            target.name.as_str().to_string(),
            RoleLabel::Revealed(Role::Organizer),
            Color::Black,
        )
    } else {
        (anonymous_label(&target.id), RoleLabel::Hidden, Color::Black)
    };

    ParticipantView {
        id: target.id.clone(),
        name,
        role,
        alive: target.alive,
        connected: target.connected,
        color,
    }
}

/// Project the whole participant list for a specific viewer.
///
/// The order of the input is preserved, so every viewer sees the
/// participants in the same join order.
pub fn build_personal_view(viewer: &Participant, participants: &[Participant]) -> Vec<ParticipantView> {
    participants
        .iter()
        .map(|target| view_of(viewer, target))
        .collect()
}

/// Project the full room state for a specific viewer.
///
/// Used for the login snapshot. Archived history is replayed through
/// the same per-recipient rules as live delivery, so a rejoining
/// player cannot learn true names from old general-channel messages.
pub fn project_room(room: &Room, viewer: &Participant) -> RoomProjection {
    let participants = build_personal_view(viewer, &room.participants);
    let channels = Channel::ALL
        .iter()
        .map(|channel| {
            let history = room
                .messages(*channel)
                .iter()
                .map(|message| {
                    let sender_role = room.participant(&message.sender_id).map(|p| p.role);
                    build_recipient_variant(message, sender_role, viewer)
                })
                .collect();
            (*channel, history)
        })
        .collect();

    RoomProjection {
        room_id: room.id.clone(),
        participants,
        channels,
    }
}
