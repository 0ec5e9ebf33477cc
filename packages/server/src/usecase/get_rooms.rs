//! UseCase: ルーム一覧取得（運用 API 用）

use std::sync::Arc;

use crate::domain::{Room, RoomRepository};

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    /// 新しい GetRoomsUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 全ルームを取得（ルーム ID 順）
    pub async fn execute(&self) -> Vec<Room> {
        let mut rooms = self.repository.list_rooms().await;
        rooms.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        rooms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, LoginClaim, ParticipantId, RoomId, Timestamp};
    use crate::infrastructure::repository::InMemoryRoomRepository;

    #[tokio::test]
    async fn test_get_rooms_returns_sorted_rooms() {
        // テスト項目: 全ルームがルーム ID 順で返される
        // given (前提条件): ルームを逆順で作成
        let repository = Arc::new(InMemoryRoomRepository::new());
        for room in ["org-b", "org-a"] {
            repository
                .join_room(
                    RoomId::new(room.to_string()).unwrap(),
                    LoginClaim {
                        participant_id: ParticipantId::new(room.to_string()).unwrap(),
                        name: DisplayName::new("GM".to_string()).unwrap(),
                    },
                    Timestamp::new(1000),
                )
                .await
                .unwrap();
        }
        let usecase = GetRoomsUseCase::new(repository);

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].id.as_str(), "org-a");
        assert_eq!(rooms[1].id.as_str(), "org-b");
    }

    #[tokio::test]
    async fn test_get_rooms_with_no_rooms() {
        // テスト項目: ルームが無い場合は空のリストが返される
        // given (前提条件):
        let usecase = GetRoomsUseCase::new(Arc::new(InMemoryRoomRepository::new()));

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        assert!(rooms.is_empty());
    }
}
