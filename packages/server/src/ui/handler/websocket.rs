//! WebSocket connection handlers.
//!
//! コネクションはログイン前の状態で確立され、最初の `login` イベントで
//! ルームと参加者に紐づきます。紐づけはこのモジュールの `SessionState` が
//! コネクション毎に保持し、以降のイベントはバインディング経由で検証されます。

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{
        Channel, ConnectionId, LoginClaim, MessageText, ParticipantId, PusherChannel, Role, RoomId,
        SessionBinding, SessionState,
    },
    infrastructure::dto::websocket::{
        ClientEvent, ErrorMessage, LoginSuccessMessage, ParticipantClaimDto,
    },
    ui::state::AppState,
    usecase::{AssignRoleError, LoginError, SendMessageError},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // ログインはコネクション確立後のイベントで行うため、ここでは検証しない
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives payloads from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound flow: payloads projected for this
/// connection (via rx channel) are sent to this connection's WebSocket.
///
/// # Arguments
///
/// * `rx` - Channel receiver for payloads addressed to this connection
/// * `sender` - WebSocket sink to send payloads to this connection
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the payload to this connection
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive pushed payloads
    let (tx, rx) = mpsc::unbounded_channel();

    tracing::info!("Connection '{}' established", connection_id);

    // Spawn a task to push payloads addressed to this connection
    let mut send_task = pusher_loop(rx, sender);

    let state_clone = state.clone();
    let tx_clone = tx.clone();

    // Spawn a task to receive events from this connection
    let mut recv_task = tokio::spawn(async move {
        // ルームと参加者への紐づけ（ログインで確定）
        let mut session = SessionState::default();

        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::info!("Received text: {}", text);
                    handle_event(&state_clone, &tx_clone, connection_id, &mut session, &text)
                        .await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Use DisconnectParticipantUseCase to handle teardown
    // (marks the participant absent when no other connection remains)
    match state
        .disconnect_participant_usecase
        .execute(&connection_id)
        .await
    {
        Some(binding) => {
            tracing::info!(
                "Connection '{}' for participant '{}' closed",
                connection_id,
                binding.participant_id
            );

            // Notify the remaining connections in the room
            match state
                .disconnect_participant_usecase
                .broadcast_participant_views(&binding.room_id)
                .await
            {
                Ok(delivered) => {
                    tracing::info!(
                        "Broadcasted participant views to {} connections after disconnect",
                        delivered
                    );
                }
                Err(e) => {
                    tracing::warn!("Failed to broadcast participant views: {}", e);
                }
            }
        }
        None => {
            tracing::info!("Connection '{}' closed before login", connection_id);
        }
    }
}

/// Dispatches one inbound event on a connection.
///
/// このコネクションだけに返す応答（ログイン応答、エラーイベント）は `tx` に
/// 直接送り、ルーム全体への配信はユースケース内の MessagePusher に任せます。
async fn handle_event(
    state: &Arc<AppState>,
    tx: &PusherChannel,
    connection_id: ConnectionId,
    session: &mut SessionState,
    text: &str,
) {
    // Parse the incoming event
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Failed to parse client event: {}", e);
            send_error(tx, "INVALID_EVENT", "unrecognized event");
            return;
        }
    };

    match event {
        ClientEvent::Login {
            room_id,
            participant,
        } => {
            handle_login(state, tx, connection_id, session, room_id, participant).await;
        }
        ClientEvent::SendMessage {
            room_id,
            text,
            channel,
        } => {
            handle_send_message(state, tx, session, room_id, text, channel).await;
        }
        ClientEvent::AssignRole {
            room_id,
            participant_id,
            role,
        } => {
            handle_assign_role(state, tx, session, room_id, participant_id, role).await;
        }
    }
}

async fn handle_login(
    state: &Arc<AppState>,
    tx: &PusherChannel,
    connection_id: ConnectionId,
    session: &mut SessionState,
    room_id: String,
    participant: ParticipantClaimDto,
) {
    // Convert String -> Domain Models
    let room_id = match RoomId::new(room_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Invalid room id in login event: {}", e);
            send_error(tx, "INVALID_LOGIN", "invalid room id");
            return;
        }
    };
    let claim = match LoginClaim::try_from(participant) {
        Ok(claim) => claim,
        Err(e) => {
            tracing::warn!("Invalid participant claim in login event: {}", e);
            send_error(tx, "INVALID_LOGIN", "invalid participant claim");
            return;
        }
    };

    // Use LoginParticipantUseCase to join the room and register the connection
    let participant_id = claim.participant_id.clone();
    match state
        .login_participant_usecase
        .execute(connection_id, room_id.clone(), claim, tx.clone())
        .await
    {
        Ok(outcome) => {
            let binding = SessionBinding {
                room_id: room_id.clone(),
                participant_id: participant_id.clone(),
            };
            if let Some(previous) = session.bind(binding.clone()) {
                release_displaced_binding(state, previous, &binding, connection_id).await;
            }
            tracing::info!(
                "Participant '{}' logged in to room '{}' (created: {}, rejoined: {})",
                participant_id,
                room_id,
                outcome.room_created,
                outcome.rejoined
            );

            // Send the projected room snapshot to the logging-in connection
            match state
                .login_participant_usecase
                .personal_snapshot(&room_id, &participant_id)
                .await
            {
                Ok(projection) => {
                    let login_msg = LoginSuccessMessage::from_projection(projection);
                    let login_json = serde_json::to_string(&login_msg).unwrap();
                    if tx.send(login_json).is_err() {
                        tracing::warn!(
                            "Connection '{}' closed before the login response",
                            connection_id
                        );
                        return;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to build login snapshot: {}", e);
                    return;
                }
            }

            // Notify every connection in the room, including this one
            if let Err(e) = state
                .login_participant_usecase
                .broadcast_participant_views(&room_id)
                .await
            {
                tracing::warn!("Failed to broadcast participant views: {}", e);
            }
        }
        Err(LoginError::RoomCapacityExceeded) => {
            tracing::warn!(
                "Room '{}' is full. Rejecting participant '{}'",
                room_id,
                participant_id
            );
            send_error(tx, "ROOM_FULL", "room capacity exceeded");
        }
        Err(e) => {
            tracing::error!("Login failed for participant '{}': {}", participant_id, e);
            send_error(tx, "LOGIN_FAILED", "login failed");
        }
    }
}

/// Releases the binding a re-login displaced.
///
/// コネクションの登録は既に新しいバインディングで上書きされているため、
/// ここでは外れた側の離席処理と旧ルームへの再配信だけを行います。
/// 同一バインディングへの再ログイン（再接続）では何もしません。
async fn release_displaced_binding(
    state: &Arc<AppState>,
    previous: SessionBinding,
    current: &SessionBinding,
    connection_id: ConnectionId,
) {
    if previous == *current {
        return;
    }
    tracing::warn!(
        "Connection '{}' rebound from participant '{}' in room '{}' without disconnecting",
        connection_id,
        previous.participant_id,
        previous.room_id
    );

    state
        .disconnect_participant_usecase
        .release_binding(&previous)
        .await;

    // 同じルーム内の付け替えなら、この後のログイン時配信が反映する
    if previous.room_id == current.room_id {
        return;
    }
    match state
        .disconnect_participant_usecase
        .broadcast_participant_views(&previous.room_id)
        .await
    {
        Ok(delivered) => {
            tracing::info!(
                "Broadcasted participant views to {} connections after rebind",
                delivered
            );
        }
        Err(e) => {
            tracing::warn!("Failed to broadcast participant views: {}", e);
        }
    }
}

async fn handle_send_message(
    state: &Arc<AppState>,
    tx: &PusherChannel,
    session: &SessionState,
    room_id: String,
    text: String,
    channel: String,
) {
    let Some(binding) = session.binding() else {
        send_error(tx, "NOT_LOGGED_IN", "login required before sending messages");
        return;
    };

    // Convert String -> Domain Models
    // ルーム ID が不正な文字列ならバインディングと一致しようがない
    let room_id = match RoomId::new(room_id) {
        Ok(id) => id,
        Err(_) => {
            send_error(tx, "ROOM_MISMATCH", "room does not match the login");
            return;
        }
    };
    let text = match MessageText::new(text) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Invalid message text: {}", e);
            send_error(tx, "INVALID_MESSAGE", "message text must be 1-500 characters");
            return;
        }
    };
    let channel = match channel.parse::<Channel>() {
        Ok(channel) => channel,
        Err(e) => {
            tracing::warn!("Unknown channel in sendMessage event: {}", e);
            send_error(tx, "UNKNOWN_CHANNEL", "unknown channel");
            return;
        }
    };

    // Use SendMessageUseCase to archive and deliver the message
    match state
        .send_message_usecase
        .execute(binding, room_id, text, channel)
        .await
    {
        Ok(delivered) => {
            tracing::info!(
                "Delivered message from '{}' to {} connections",
                binding.participant_id,
                delivered
            );
        }
        Err(SendMessageError::RoomMismatch(claimed)) => {
            send_error(
                tx,
                "ROOM_MISMATCH",
                format!("room '{}' does not match the login", claimed),
            );
        }
        Err(SendMessageError::MessageCapacityExceeded) => {
            send_error(tx, "MESSAGE_LIMIT", "channel history is full");
        }
        Err(e) => {
            tracing::warn!("Failed to send message: {}", e);
            send_error(tx, "SEND_FAILED", "failed to send message");
        }
    }
}

async fn handle_assign_role(
    state: &Arc<AppState>,
    tx: &PusherChannel,
    session: &SessionState,
    room_id: String,
    participant_id: String,
    role: String,
) {
    let Some(binding) = session.binding() else {
        send_error(tx, "NOT_LOGGED_IN", "login required before assigning roles");
        return;
    };

    // Convert String -> Domain Models
    let room_id = match RoomId::new(room_id) {
        Ok(id) => id,
        Err(_) => {
            send_error(tx, "ROOM_MISMATCH", "room does not match the login");
            return;
        }
    };
    // 対象 ID が不正な文字列ならルームに存在しようがない
    let target_id = match ParticipantId::new(participant_id) {
        Ok(id) => id,
        Err(_) => {
            send_error(tx, "PARTICIPANT_NOT_FOUND", "participant not found in room");
            return;
        }
    };
    let role = match role.parse::<Role>() {
        Ok(role) => role,
        Err(e) => {
            tracing::warn!("Unknown role in assignRole event: {}", e);
            send_error(tx, "UNKNOWN_ROLE", "unknown role");
            return;
        }
    };

    // Use AssignRoleUseCase to change the role
    let target_id_for_log = target_id.clone();
    match state
        .assign_role_usecase
        .execute(binding, room_id, target_id, role)
        .await
    {
        Ok(()) => {
            tracing::info!(
                "Role of participant '{}' changed by organizer '{}'",
                target_id_for_log,
                binding.participant_id
            );

            // 役職変更は見え方を変えるため、全コネクションに再投影を配る
            if let Err(e) = state
                .assign_role_usecase
                .broadcast_participant_views(&binding.room_id)
                .await
            {
                tracing::warn!("Failed to broadcast participant views: {}", e);
            }
        }
        Err(AssignRoleError::RoomMismatch(claimed)) => {
            send_error(
                tx,
                "ROOM_MISMATCH",
                format!("room '{}' does not match the login", claimed),
            );
        }
        Err(AssignRoleError::NotOrganizer(_)) => {
            send_error(tx, "NOT_ORGANIZER", "only the organizer can assign roles");
        }
        Err(AssignRoleError::ParticipantNotFound(id)) => {
            send_error(
                tx,
                "PARTICIPANT_NOT_FOUND",
                format!("participant '{}' not found in room", id),
            );
        }
        Err(e) => {
            tracing::warn!("Failed to assign role: {}", e);
            send_error(tx, "ASSIGN_FAILED", "failed to assign role");
        }
    }
}

/// Sends an error event to this connection only.
fn send_error(tx: &PusherChannel, code: &str, msg: impl Into<String>) {
    let error_msg = ErrorMessage::new(code, msg);
    let error_json = serde_json::to_string(&error_msg).unwrap();
    if tx.send(error_json).is_err() {
        tracing::warn!("Failed to deliver error event '{}'", code);
    }
}
