//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! ルーム ID をキーにした HashMap をインメモリ DB として使用します。
//!
//! ## 技術的負債
//!
//! 現在、ドメインモデル（`Room`）を直接ストレージとして使用しています。
//! これは InMemory 実装では許容される妥協ですが、将来 PostgreSQL などの
//! DBMS を実装する際は、以下の変換層が必要になります：
//!
//! ```text
//! DB Row/JSON → RoomData (DTO) → Room (ドメインモデル)
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    DEFAULT_MESSAGE_CAPACITY, DEFAULT_PARTICIPANT_CAPACITY, JoinOutcome, LoginClaim, Participant,
    ParticipantId, RepositoryError, Role, Room, RoomId, RoomRepository, StoredMessage, Timestamp,
};

/// インメモリ Room Repository 実装
///
/// 全ルームを単一の Mutex 配下で保持します。`join_room` の
/// 「取得または作成」が単一のロック区間で完結するため、同じルーム ID への
/// 同時ログインが競合してもルームが二重に作られることはありません。
pub struct InMemoryRoomRepository {
    /// ルーム ID をキーにしたルームのマップ
    rooms: Mutex<HashMap<RoomId, Room>>,
    /// 新規ルームに適用する参加者数の上限
    participant_capacity: usize,
    /// 新規ルームに適用するチャンネル毎のメッセージ数の上限
    message_capacity: usize,
}

impl InMemoryRoomRepository {
    /// 既定の容量で新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_PARTICIPANT_CAPACITY, DEFAULT_MESSAGE_CAPACITY)
    }

    /// 容量を指定して新しい InMemoryRoomRepository を作成（テスト用途）
    pub fn with_capacity(participant_capacity: usize, message_capacity: usize) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            participant_capacity,
            message_capacity,
        }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn join_room(
        &self,
        room_id: RoomId,
        claim: LoginClaim,
        now: Timestamp,
    ) -> Result<JoinOutcome, RepositoryError> {
        let mut rooms = self.rooms.lock().await;

        // 取得と作成を同一ロック区間で行う
        let mut room_created = false;
        let join_result = {
            let room = rooms.entry(room_id.clone()).or_insert_with(|| {
                room_created = true;
                Room::with_capacity(
                    room_id.clone(),
                    now,
                    self.participant_capacity,
                    self.message_capacity,
                )
            });
            room.join(claim, now)
        };

        match join_result {
            Ok(rejoined) => Ok(JoinOutcome {
                room_created,
                rejoined,
            }),
            Err(_) => {
                // 参加できなかった新規ルームを残さない
                if room_created {
                    rooms.remove(&room_id);
                }
                Err(RepositoryError::RoomCapacityExceeded)
            }
        }
    }

    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.to_string()))
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        rooms.values().cloned().collect()
    }

    async fn get_participants(&self, room_id: &RoomId) -> Result<Vec<Participant>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        let room = rooms
            .get(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.to_string()))?;
        Ok(room.participants.clone())
    }

    async fn archive_message(
        &self,
        room_id: &RoomId,
        message: StoredMessage,
    ) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.to_string()))?;
        room.archive_message(message)
            .map_err(|_| RepositoryError::MessageCapacityExceeded)?;
        Ok(())
    }

    async fn assign_role(
        &self,
        room_id: &RoomId,
        participant_id: &ParticipantId,
        role: Role,
    ) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.to_string()))?;
        room.assign_role(participant_id, role)
            .map_err(|_| RepositoryError::ParticipantNotFound(participant_id.to_string()))?;
        Ok(())
    }

    async fn set_connected(
        &self,
        room_id: &RoomId,
        participant_id: &ParticipantId,
        connected: bool,
    ) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.to_string()))?;
        room.set_connected(participant_id, connected);
        Ok(())
    }

    async fn count_rooms(&self) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Channel, DisplayName, MessageText};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryRoomRepository の基本的な CRUD 操作
    // - join_room の「取得または作成」が正しく動くこと
    // - エラーハンドリング（存在しないルームへの操作など）
    //
    // 【なぜこのテストが必要か】
    // - Repository は UseCase から呼ばれるデータアクセス層の中核
    // - ルームの自動作成と再参加の判定を UseCase 層が信頼できるようにする
    //
    // 【どのようなシナリオをテストするか】
    // 1. 初回参加によるルーム作成
    // 2. 既存ルームへの参加と再参加
    // 3. 存在しないルームへの操作（エラーケース）
    // 4. メッセージのアーカイブと役職変更
    // ========================================

    fn room_id(value: &str) -> RoomId {
        RoomId::new(value.to_string()).unwrap()
    }

    fn claim(id: &str) -> LoginClaim {
        LoginClaim {
            participant_id: ParticipantId::new(id.to_string()).unwrap(),
            name: DisplayName::new(id.to_string()).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_join_room_creates_room() {
        // テスト項目: 初回参加でルームが作成され、ルームキーの参加者は主催者になる
        // given (前提条件):
        let repository = InMemoryRoomRepository::new();

        // when (操作):
        let outcome = repository
            .join_room(room_id("org-1"), claim("org-1"), Timestamp::new(1000))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(outcome.room_created);
        assert!(!outcome.rejoined);
        assert_eq!(repository.count_rooms().await, 1);
        let room = repository.get_room(&room_id("org-1")).await.unwrap();
        assert_eq!(room.created_at, Timestamp::new(1000));
        assert_eq!(room.participants[0].role, Role::Organizer);
    }

    #[tokio::test]
    async fn test_join_room_reuses_existing_room() {
        // テスト項目: 2人目の参加では既存ルームが使われる
        // given (前提条件):
        let repository = InMemoryRoomRepository::new();
        repository
            .join_room(room_id("org-1"), claim("org-1"), Timestamp::new(1000))
            .await
            .unwrap();

        // when (操作):
        let outcome = repository
            .join_room(room_id("org-1"), claim("ann"), Timestamp::new(2000))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(!outcome.room_created);
        assert_eq!(repository.count_rooms().await, 1);
        // ルーム作成時刻は最初の参加時刻のまま
        let room = repository.get_room(&room_id("org-1")).await.unwrap();
        assert_eq!(room.created_at, Timestamp::new(1000));
        assert_eq!(room.participants.len(), 2);
    }

    #[tokio::test]
    async fn test_join_room_detects_rejoin() {
        // テスト項目: 同じ参加者 ID での参加は再参加として報告される
        // given (前提条件):
        let repository = InMemoryRoomRepository::new();
        repository
            .join_room(room_id("org-1"), claim("ann"), Timestamp::new(1000))
            .await
            .unwrap();

        // when (操作):
        let outcome = repository
            .join_room(room_id("org-1"), claim("ann"), Timestamp::new(2000))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(outcome.rejoined);
    }

    #[tokio::test]
    async fn test_get_room_not_found() {
        // テスト項目: 存在しないルームの取得はエラーになる
        // given (前提条件):
        let repository = InMemoryRoomRepository::new();

        // when (操作):
        let result = repository.get_room(&room_id("nowhere")).await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            RepositoryError::RoomNotFound("nowhere".to_string())
        );
    }

    #[tokio::test]
    async fn test_archive_message_in_missing_room() {
        // テスト項目: 存在しないルームへのメッセージ追加はエラーになる
        // given (前提条件):
        let repository = InMemoryRoomRepository::new();
        let message = StoredMessage::new(
            ParticipantId::new("ann".to_string()).unwrap(),
            DisplayName::new("Ann".to_string()).unwrap(),
            MessageText::new("hello".to_string()).unwrap(),
            Channel::General,
            Timestamp::new(1000),
        );

        // when (操作):
        let result = repository.archive_message(&room_id("nowhere"), message).await;

        // then (期待する結果):
        assert!(matches!(result, Err(RepositoryError::RoomNotFound(_))));
    }

    #[tokio::test]
    async fn test_assign_role_updates_participant() {
        // テスト項目: 役職変更が保存される
        // given (前提条件):
        let repository = InMemoryRoomRepository::new();
        repository
            .join_room(room_id("org-1"), claim("ann"), Timestamp::new(1000))
            .await
            .unwrap();

        // when (操作):
        repository
            .assign_role(
                &room_id("org-1"),
                &ParticipantId::new("ann".to_string()).unwrap(),
                Role::Doctor,
            )
            .await
            .unwrap();

        // then (期待する結果):
        let room = repository.get_room(&room_id("org-1")).await.unwrap();
        assert_eq!(
            room.participant(&ParticipantId::new("ann".to_string()).unwrap())
                .unwrap()
                .role,
            Role::Doctor
        );
    }

    #[tokio::test]
    async fn test_rooms_are_isolated() {
        // テスト項目: ルーム間で参加者とメッセージが混ざらない
        // given (前提条件): 2つのルーム
        let repository = InMemoryRoomRepository::new();
        repository
            .join_room(room_id("org-1"), claim("ann"), Timestamp::new(1000))
            .await
            .unwrap();
        repository
            .join_room(room_id("org-2"), claim("bob"), Timestamp::new(1000))
            .await
            .unwrap();

        // when (操作): org-1 にだけメッセージを追加
        repository
            .archive_message(
                &room_id("org-1"),
                StoredMessage::new(
                    ParticipantId::new("ann".to_string()).unwrap(),
                    DisplayName::new("Ann".to_string()).unwrap(),
                    MessageText::new("hello".to_string()).unwrap(),
                    Channel::General,
                    Timestamp::new(2000),
                ),
            )
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(repository.count_rooms().await, 2);
        let room1 = repository.get_room(&room_id("org-1")).await.unwrap();
        let room2 = repository.get_room(&room_id("org-2")).await.unwrap();
        assert_eq!(room1.messages(Channel::General).len(), 1);
        assert_eq!(room2.messages(Channel::General).len(), 0);
        assert_eq!(room1.participants.len(), 1);
        assert_eq!(room2.participants.len(), 1);
    }
}
