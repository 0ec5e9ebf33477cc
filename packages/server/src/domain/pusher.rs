//! MessagePusher trait 定義
//!
//! コネクション単位のメッセージ送信インターフェースを定義します。
//! 実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! Repository が「参加者の記録」を持つのに対し、MessagePusher は
//! 「いま生きているコネクション」を持ちます。同じ参加者が複数タブで
//! 接続していれば、ここには複数のエントリが登録されます。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::MessagePushError;
use super::session::SessionBinding;
use super::value_object::{ConnectionId, ParticipantId, RoomId};

/// メッセージ送信に使うチャンネルの型
///
/// WebSocket の送信タスクへ JSON 文字列を渡す UnboundedSender。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Message Pusher trait
///
/// UseCase 層はこの trait に依存し、WebSocket の具体的な実装には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// コネクションを登録
    ///
    /// 同じコネクション ID で再登録した場合は紐づけ先が置き換わります
    /// （同一コネクション上での再ログイン）。
    async fn register(
        &self,
        connection_id: ConnectionId,
        binding: SessionBinding,
        sender: PusherChannel,
    );

    /// コネクションを登録解除し、紐づいていたバインディングを返す
    async fn unregister(&self, connection_id: &ConnectionId) -> Option<SessionBinding>;

    /// ルームに属する全コネクションを取得
    async fn room_connections(&self, room_id: &RoomId) -> Vec<(ConnectionId, ParticipantId)>;

    /// 特定のコネクションにメッセージを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// 参加者がルーム内に生きているコネクションを持つか
    async fn is_participant_connected(
        &self,
        room_id: &RoomId,
        participant_id: &ParticipantId,
    ) -> bool;
}
