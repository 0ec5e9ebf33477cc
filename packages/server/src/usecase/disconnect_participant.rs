//! UseCase: 切断処理
//!
//! コネクションの登録を解除し、その参加者の生きているコネクションが
//! 無くなった場合に接続フラグを落とします。参加者レコード自体は
//! 削除しません。切断後に再ログインすれば同じ役職のまま復帰できます。
//!
//! 再ログインでコネクションが別のバインディングに付け替えられた場合も、
//! 外れた側には同じ離席処理を適用します（`release_binding`）。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomId, RoomRepository, SessionBinding};

use super::dispatch;
use super::error::DisconnectError;

/// 切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 切断を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 閉じられたコネクション
    ///
    /// # Returns
    ///
    /// * `Some(SessionBinding)` - コネクションが紐づいていたルームと参加者
    /// * `None` - ログイン前のコネクションだった場合
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<SessionBinding> {
        // 1. コネクションの登録を解除
        let binding = self.message_pusher.unregister(connection_id).await?;

        // 2. 同じ参加者の別コネクションが残っていなければ離席扱いにする
        self.mark_absent_if_last(&binding).await;

        Some(binding)
    }

    /// 再ログインで置き換えられた旧バインディングの離席処理
    ///
    /// コネクションの登録は新しいバインディングで上書き済みのため、
    /// 登録解除は行わず接続フラグだけを扱います。旧ルームに同じ参加者の
    /// 別コネクションが残っていれば何も変わりません。
    pub async fn release_binding(&self, binding: &SessionBinding) {
        self.mark_absent_if_last(binding).await;
    }

    async fn mark_absent_if_last(&self, binding: &SessionBinding) {
        let still_connected = self
            .message_pusher
            .is_participant_connected(&binding.room_id, &binding.participant_id)
            .await;
        if !still_connected {
            if let Err(e) = self
                .repository
                .set_connected(&binding.room_id, &binding.participant_id, false)
                .await
            {
                tracing::warn!(
                    "Failed to mark participant '{}' as disconnected: {}",
                    binding.participant_id,
                    e
                );
            }
        }
    }

    /// ルーム内の残りのコネクションに参加者リストの更新を配信
    pub async fn broadcast_participant_views(
        &self,
        room_id: &RoomId,
    ) -> Result<usize, DisconnectError> {
        dispatch::push_participant_views(
            self.repository.as_ref(),
            self.message_pusher.as_ref(),
            room_id,
        )
        .await
        .map_err(DisconnectError::Repository)
    }
}
