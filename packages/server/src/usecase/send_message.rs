//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - メッセージのアーカイブと、受信者毎のバリアント配信
//!
//! ### なぜこのテストが必要か
//! - アーカイブには常に真実のレコードが残ることを保証
//! - 全体チャンネルの発言が受信者に応じて匿名化されることを確認
//! - セッションと異なるルーム ID の申告が拒否されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：各チャンネルへの送信と全コネクションへの配信
//! - 異常系：ルーム ID の不一致、チャンネル容量超過
//! - エッジケース：マフィアの全体チャンネル発言（匿名 + 赤強調の併存）

use std::sync::Arc;

use omerta_shared::time::Clock;

use crate::domain::{
    Channel, MessagePusher, MessageText, RepositoryError, RoomId, RoomRepository, SessionBinding,
    StoredMessage, Timestamp,
};

use super::dispatch;
use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Clock（時刻取得の抽象化）
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// 送信者はペイロードの申告ではなくセッションのバインディングから
    /// 決定されます。時刻はサーバ側で刻印されます。
    ///
    /// # Arguments
    ///
    /// * `binding` - 送信元コネクションのバインディング
    /// * `claimed_room_id` - イベントに書かれたルーム ID（バインディングと照合）
    /// * `text` - 本文
    /// * `channel` - 宛先チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 配信されたコネクション数
    /// * `Err(SendMessageError)` - 送信失敗
    pub async fn execute(
        &self,
        binding: &SessionBinding,
        claimed_room_id: RoomId,
        text: MessageText,
        channel: Channel,
    ) -> Result<usize, SendMessageError> {
        // 1. ルーム ID の照合
        if claimed_room_id != binding.room_id {
            return Err(SendMessageError::RoomMismatch(claimed_room_id.to_string()));
        }

        // 2. 送信者の現在のレコードを取得（本名をアーカイブに残すため）
        let participants = self
            .repository
            .get_participants(&binding.room_id)
            .await
            .map_err(SendMessageError::Repository)?;
        let sender = participants
            .iter()
            .find(|p| p.id == binding.participant_id)
            .ok_or_else(|| {
                SendMessageError::SenderNotInRoom(binding.participant_id.to_string())
            })?;

        // 3. 真実のレコードをアーカイブ
        let message = StoredMessage::new(
            sender.id.clone(),
            sender.name.clone(),
            text,
            channel,
            Timestamp::new(self.clock.now_jst_millis()),
        );
        self.repository
            .archive_message(&binding.room_id, message.clone())
            .await
            .map_err(|e| match e {
                RepositoryError::MessageCapacityExceeded => {
                    SendMessageError::MessageCapacityExceeded
                }
                other => SendMessageError::Repository(other),
            })?;

        // 4. 受信者毎のバリアントを全コネクションに配信
        dispatch::push_message_variants(
            self.repository.as_ref(),
            self.message_pusher.as_ref(),
            &binding.room_id,
            &message,
        )
        .await
        .map_err(SendMessageError::Repository)
    }
}
