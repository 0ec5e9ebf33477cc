//! Message formatting utilities for client display.
//!
//! サーバから届くのは自分向けに投影済みのビューなので、ここでは受け取った
//! ものをそのまま整形するだけです。匿名化や強調色の判断は行いません。

use omerta_server::infrastructure::dto::websocket::{
    MessageViewDto, ParticipantViewDto, RoomSnapshotDto,
};
use omerta_shared::time::timestamp_to_jst_rfc3339;

/// ログイン時に表示するチャンネル履歴の最大行数（チャンネル毎）
const RECENT_HISTORY_LINES: usize = 10;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the room snapshot received on login
    ///
    /// # Arguments
    ///
    /// * `room` - The projected room snapshot
    /// * `current_participant_id` - The current participant's ID (to mark as "me")
    ///
    /// # Returns
    ///
    /// A formatted string with the participant list and recent history
    pub fn format_login_success(room: &RoomSnapshotDto, current_participant_id: &str) -> String {
        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        output.push_str(&format!("Room: {}\n", room.id));
        output.push_str("Participants:\n");
        output.push_str(&Self::participant_lines(
            &room.participants,
            current_participant_id,
        ));

        for (channel, messages) in &room.channels {
            if messages.is_empty() {
                continue;
            }
            output.push_str(&format!(
                "--- #{} ({} messages) ---\n",
                channel,
                messages.len()
            ));
            let skipped = messages.len().saturating_sub(RECENT_HISTORY_LINES);
            for message in messages.iter().skip(skipped) {
                output.push_str(&Self::message_line(message));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format a participant list update
    ///
    /// # Arguments
    ///
    /// * `participants` - The projected participant list
    /// * `current_participant_id` - The current participant's ID (to mark as "me")
    ///
    /// # Returns
    ///
    /// A formatted string with the participant list
    pub fn format_participant_list(
        participants: &[ParticipantViewDto],
        current_participant_id: &str,
    ) -> String {
        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        output.push_str("Participants:\n");
        output.push_str(&Self::participant_lines(participants, current_participant_id));
        output.push_str("============================================================\n");
        output
    }

    /// Format a delivered message
    ///
    /// # Arguments
    ///
    /// * `channel` - The channel the message was sent to
    /// * `message` - The projected message
    ///
    /// # Returns
    ///
    /// A formatted string with the message
    pub fn format_new_message(channel: &str, message: &MessageViewDto) -> String {
        let timestamp_str = timestamp_to_jst_rfc3339(message.sent_at);
        let color_tag = match &message.color {
            Some(color) => format!(" [{}]", color),
            None => String::new(),
        };
        format!(
            "\n\n------------------------------------------------------------\n\
             #{} @{}{}: {}\n\
             sent at {}\n\
             ------------------------------------------------------------\n",
            channel, message.sender_name, color_tag, message.text, timestamp_str
        )
    }

    /// Format an error event from the server
    ///
    /// # Arguments
    ///
    /// * `code` - The machine-readable error code
    /// * `msg` - The human-readable description
    ///
    /// # Returns
    ///
    /// A formatted string with the error
    pub fn format_error_event(code: &str, msg: &str) -> String {
        format!("\n! {}: {}\n", code, msg)
    }

    /// Format a binary message notification
    ///
    /// # Arguments
    ///
    /// * `byte_count` - The number of bytes received
    ///
    /// # Returns
    ///
    /// A formatted string with the binary data notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    ///
    /// # Arguments
    ///
    /// * `text` - The raw text received
    ///
    /// # Returns
    ///
    /// A formatted string with the raw message
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    fn participant_lines(
        participants: &[ParticipantViewDto],
        current_participant_id: &str,
    ) -> String {
        let mut output = String::new();
        if participants.is_empty() {
            output.push_str("(No participants)\n");
            return output;
        }
        for participant in participants {
            let is_me = participant.id == current_participant_id;
            let me_suffix = if is_me { " (me)" } else { "" };
            let mut tags = Vec::new();
            if participant.color != "black" {
                tags.push(participant.color.as_str());
            }
            if !participant.alive {
                tags.push("eliminated");
            }
            if !participant.connected {
                tags.push("away");
            }
            let tag_str = if tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", tags.join(", "))
            };
            output.push_str(&format!(
                "{}{} - {}{}\n",
                participant.name, me_suffix, participant.role, tag_str
            ));
        }
        output
    }

    fn message_line(message: &MessageViewDto) -> String {
        let color_tag = match &message.color {
            Some(color) => format!(" [{}]", color),
            None => String::new(),
        };
        format!("@{}{}: {}\n", message.sender_name, color_tag, message.text)
    }
}
