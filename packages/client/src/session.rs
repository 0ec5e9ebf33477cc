//! WebSocket client session management.
//!
//! セッションはログインフェーズとストリーミングフェーズに分かれます。
//! 接続直後に login イベントを送り、loginSuccess かログイン拒否の
//! エラーイベントを受け取るまではストリーミングを開始しません。

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use omerta_server::infrastructure::dto::websocket::{
    ClientEvent, ErrorMessage, LoginSuccessMessage, NewMessageMessage, ParticipantClaimDto,
    UpdateParticipantsMessage,
};

use super::{
    domain::{InputCommand, parse_input},
    error::ClientError,
    formatter::MessageFormatter,
    runner::ClientConfig,
    ui::redisplay_prompt,
};

/// Run the WebSocket client session
pub async fn run_client_session(config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (ws_stream, _response) = match connect_async(&config.url).await {
        Ok(result) => result,
        Err(e) => {
            return Err(Box::new(ClientError::ConnectionError(e.to_string())));
        }
    };

    tracing::info!("Connected to the coordination server");

    let (mut write, mut read) = ws_stream.split();

    // Send the login event as the first frame
    let login_event = ClientEvent::Login {
        room_id: config.room_id.clone(),
        participant: ParticipantClaimDto {
            id: config.participant_id.clone(),
            name: config.name.clone(),
            role: config.role.clone(),
        },
    };
    let login_json = serde_json::to_string(&login_event)?;
    write
        .send(Message::Text(login_json.into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    // Wait for the login response before starting the streaming phase
    let room = loop {
        let message = match read.next().await {
            Some(Ok(message)) => message,
            Some(Err(e)) => {
                return Err(Box::new(ClientError::ConnectionError(e.to_string())));
            }
            None => {
                return Err(Box::new(ClientError::ConnectionError(
                    "connection closed during login".to_string(),
                )));
            }
        };
        match message {
            Message::Text(text) => {
                if let Ok(login_msg) = serde_json::from_str::<LoginSuccessMessage>(&text) {
                    break login_msg.room;
                }
                if let Ok(error_msg) = serde_json::from_str::<ErrorMessage>(&text) {
                    return Err(Box::new(ClientError::LoginRejected {
                        code: error_msg.code,
                        msg: error_msg.msg,
                    }));
                }
                // ログイン応答より先に届いたブロードキャストは読み飛ばす
                tracing::debug!("Skipping message before login response: {}", text);
            }
            Message::Close(_) => {
                return Err(Box::new(ClientError::ConnectionError(
                    "server closed the connection during login".to_string(),
                )));
            }
            _ => {}
        }
    };

    print!(
        "{}",
        MessageFormatter::format_login_success(&room, &config.participant_id)
    );
    println!(
        "\nYou are '{}' in room '{}'. Type a message to talk in #general,\n\
         /role <text> and /org <text> for the other channels,\n\
         /assign <participant-id> <role> to assign roles (organizer only).\n\
         Press Ctrl+C to exit.\n",
        config.name, config.room_id
    );

    // Clone for the read task
    let participant_id_for_read = config.participant_id.clone();
    let name_for_read = config.name.clone();

    // Spawn a task to handle incoming messages
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    // Try to parse as UpdateParticipantsMessage first
                    if let Ok(update_msg) =
                        serde_json::from_str::<UpdateParticipantsMessage>(&text)
                    {
                        let formatted = MessageFormatter::format_participant_list(
                            &update_msg.participants,
                            &participant_id_for_read,
                        );
                        print!("{}", formatted);
                        redisplay_prompt(&name_for_read);
                    }
                    // Try to parse as NewMessageMessage
                    else if let Ok(new_msg) = serde_json::from_str::<NewMessageMessage>(&text) {
                        let formatted =
                            MessageFormatter::format_new_message(&new_msg.channel, &new_msg.message);
                        print!("{}", formatted);
                        redisplay_prompt(&name_for_read);
                    }
                    // Try to parse as ErrorMessage
                    else if let Ok(error_msg) = serde_json::from_str::<ErrorMessage>(&text) {
                        let formatted =
                            MessageFormatter::format_error_event(&error_msg.code, &error_msg.msg);
                        print!("{}", formatted);
                        redisplay_prompt(&name_for_read);
                    }
                    // If parsing fails, display as raw text
                    else {
                        let formatted = MessageFormatter::format_raw_message(&text);
                        print!("{}", formatted);
                        redisplay_prompt(&name_for_read);
                    }
                }
                Ok(Message::Binary(data)) => {
                    let formatted = MessageFormatter::format_binary_message(data.len());
                    print!("{}", formatted);
                    redisplay_prompt(&name_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Clone for the input loop
    let name_for_prompt = config.name.clone();
    let name_for_write = config.name.clone();
    let room_id_for_write = config.room_id.clone();

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", name_for_prompt);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to handle stdin input and send to WebSocket
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            // Parse the line into a command and build the event
            let event = match parse_input(&line) {
                Ok(InputCommand::Say { channel, text }) => ClientEvent::SendMessage {
                    room_id: room_id_for_write.clone(),
                    text,
                    channel: channel.to_string(),
                },
                Ok(InputCommand::Assign {
                    participant_id,
                    role,
                }) => ClientEvent::AssignRole {
                    room_id: room_id_for_write.clone(),
                    participant_id,
                    role,
                },
                Err(usage) => {
                    println!("{}", usage);
                    redisplay_prompt(&name_for_write);
                    continue;
                }
            };

            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize event: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send event: {}", e);
                write_error = true;
                break;
            }
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            let connection_error = read_result.unwrap_or(false);
            if connection_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            let write_error = write_result.unwrap_or(false);
            if write_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
    }

    Ok(())
}
