//! Per-recipient message variants.
//!
//! A message is archived once, as its true record, and then delivered
//! to every connection in the room. What each recipient receives is a
//! variant computed here from the true record and the recipient's
//! role. Anonymization depends on the channel; the red highlight for
//! mafia senders does not.
//!
//! Rules:
//!
//! - General channel: every non-organizer recipient sees the sender as
//!   an anonymous placeholder. This includes the sender's own echo and
//!   fellow mafia members. The organizer always sees the true name.
//! - Role and organizer channels never anonymize. They are only shown
//!   to peers who already know the sender.
//! - A mafia sender is highlighted in red for mafia and organizer
//!   recipients on every channel, even when the name itself is
//!   anonymized. The channel does not gate the highlight.

use super::entity::{Participant, StoredMessage};
use super::value_object::{Channel, Color, MessageText, ParticipantId, Role, Timestamp};
use super::visibility::anonymous_label;

/// One message as a specific recipient receives it.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageView {
    /// Sender's participant id (ids are public).
    pub sender_id: ParticipantId,
    /// Sender's name, possibly replaced by an anonymous placeholder.
    pub sender_name: String,
    /// Message body, never altered.
    pub text: MessageText,
    /// Channel the message was addressed to.
    pub channel: Channel,
    /// Server-stamped send time.
    pub sent_at: Timestamp,
    /// Red highlight for mafia senders, when the recipient is allowed
    /// to see it.
    pub color: Option<Color>,
}

/// Compute the variant of a message for one recipient.
///
/// # Arguments
///
/// * `message` - The true archived record
/// * `sender_role` - The sender's current role, `None` when the sender
///   has left no record in the room
/// * `recipient` - The participant the variant is built for
pub fn build_recipient_variant(
    message: &StoredMessage,
    sender_role: Option<Role>,
    recipient: &Participant,
) -> MessageView {
    let anonymize = message.channel == Channel::General && recipient.role != Role::Organizer;
    let sender_name = if anonymize {
        anonymous_label(&message.sender_id)
    } else {
        message.sender_name.as_str().to_string()
    };

    let color = match sender_role {
        Some(Role::Mafia) if matches!(recipient.role, Role::Mafia | Role::Organizer) => {
            Some(Color::Red)
        }
        _ => None,
    };

    MessageView {
        sender_id: message.sender_id.clone(),
        sender_name,
        text: message.text.clone(),
        channel: message.channel,
        sent_at: message.sent_at,
        color,
    }
}
