//! UseCase: ルーム詳細取得（運用 API 用）
//!
//! 運用 API は主催者相当の権限で真実の状態を返します。
//! 役職の匿名化はここでは行いません。

use std::sync::Arc;

use crate::domain::{Room, RoomId, RoomRepository};

use super::error::GetRoomDetailError;

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    /// 新しい GetRoomDetailUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルームを ID で取得
    ///
    /// ID の形式が不正な場合も「存在しない」と同じ扱いにします。
    pub async fn execute(&self, room_id: &str) -> Result<Room, GetRoomDetailError> {
        let room_id = RoomId::new(room_id.to_string())
            .map_err(|_| GetRoomDetailError::RoomNotFound(room_id.to_string()))?;
        self.repository
            .get_room(&room_id)
            .await
            .map_err(|_| GetRoomDetailError::RoomNotFound(room_id.to_string()))
    }
}
