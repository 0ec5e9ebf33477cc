//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement client behavior
//! without side effects, making them easy to test.

use crate::error::ClientError;

/// Parsed form of one line of stdin input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// Send a message to a channel of the joined room
    Say { channel: &'static str, text: String },
    /// Change a participant's role (organizer only)
    Assign { participant_id: String, role: String },
}

/// Parse one line of stdin input into a command.
///
/// Lines starting with `/role`, `/org` or `/assign` are commands, every
/// other line is a message to the general channel.
///
/// # Arguments
///
/// * `line` - The raw input line (not empty after trimming)
///
/// # Returns
///
/// The parsed command, or a usage message to show the user
pub fn parse_input(line: &str) -> Result<InputCommand, String> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "/role" => {
            if rest.is_empty() {
                Err("usage: /role <text>".to_string())
            } else {
                Ok(InputCommand::Say {
                    channel: "role",
                    text: rest.to_string(),
                })
            }
        }
        "/org" => {
            if rest.is_empty() {
                Err("usage: /org <text>".to_string())
            } else {
                Ok(InputCommand::Say {
                    channel: "organizer",
                    text: rest.to_string(),
                })
            }
        }
        "/assign" => {
            let args: Vec<&str> = rest.split_whitespace().collect();
            match args.as_slice() {
                [participant_id, role] => Ok(InputCommand::Assign {
                    participant_id: participant_id.to_string(),
                    role: role.to_string(),
                }),
                _ => Err("usage: /assign <participant-id> <role>".to_string()),
            }
        }
        _ if command.starts_with('/') => Err(format!("unknown command '{}'", command)),
        _ => Ok(InputCommand::Say {
            channel: "general",
            text: line.to_string(),
        }),
    }
}

/// Check if the client should exit immediately based on the error type.
///
/// # Arguments
///
/// * `error` - The client error to check
///
/// # Returns
///
/// `true` if the error requires immediate exit (e.g., a rejected login),
/// `false` otherwise
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::LoginRejected { .. })
}
