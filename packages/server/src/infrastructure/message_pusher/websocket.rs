//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 生きている WebSocket コネクションと紐づけ先のレジストリを管理
//! - コネクションへのメッセージ送信（push_to）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//!
//! これにより、「WebSocket の生成」と「メッセージの送信」が分離されます：
//! - UI 層: WebSocket 接続の受付、sender の生成
//! - Infrastructure 層: レジストリの管理、メッセージ送信
//!
//! レジストリのキーはコネクション ID です。参加者 ID はキーにしません。
//! 同じ参加者が複数タブで接続するとエントリが複数になるためです。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, MessagePushError, MessagePusher, ParticipantId, PusherChannel, RoomId,
    SessionBinding,
};

/// レジストリに登録されたコネクション
struct RegisteredConnection {
    /// コネクションの紐づけ先（ルームと参加者）
    binding: SessionBinding,
    /// コネクションへの送信チャンネル
    sender: PusherChannel,
}

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 生きているコネクションのレジストリ
    ///
    /// Key: ConnectionId
    /// Value: RegisteredConnection
    connections: Mutex<HashMap<ConnectionId, RegisteredConnection>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register(
        &self,
        connection_id: ConnectionId,
        binding: SessionBinding,
        sender: PusherChannel,
    ) {
        let mut connections = self.connections.lock().await;
        // 同じコネクション ID の再登録は紐づけ先の置き換え（再ログイン）
        connections.insert(connection_id, RegisteredConnection { binding, sender });
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister(&self, connection_id: &ConnectionId) -> Option<SessionBinding> {
        let mut connections = self.connections.lock().await;
        let removed = connections.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
        removed.map(|c| c.binding)
    }

    async fn room_connections(&self, room_id: &RoomId) -> Vec<(ConnectionId, ParticipantId)> {
        let connections = self.connections.lock().await;
        connections
            .iter()
            .filter(|(_, c)| c.binding.room_id == *room_id)
            .map(|(id, c)| (*id, c.binding.participant_id.clone()))
            .collect()
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let connections = self.connections.lock().await;

        if let Some(connection) = connections.get(connection_id) {
            connection
                .sender
                .send(content.to_string())
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed message to connection '{}'", connection_id);
            Ok(())
        } else {
            Err(MessagePushError::ConnectionNotFound(
                connection_id.to_string(),
            ))
        }
    }

    async fn is_participant_connected(
        &self,
        room_id: &RoomId,
        participant_id: &ParticipantId,
    ) -> bool {
        let connections = self.connections.lock().await;
        connections.values().any(|c| {
            c.binding.room_id == *room_id && c.binding.participant_id == *participant_id
        })
    }
}
