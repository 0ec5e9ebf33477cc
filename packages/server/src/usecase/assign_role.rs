//! UseCase: 役職変更処理
//!
//! 役職はログインの申告では決まらず、主催者の操作でのみ付与・変更
//! されます。参加直後の役職は主催者（ルームキーと一致する参加者）か
//! 市民のどちらかです。

use std::sync::Arc;

use crate::domain::{
    MessagePusher, ParticipantId, RepositoryError, Role, RoomId, RoomRepository, SessionBinding,
};

use super::dispatch;
use super::error::AssignRoleError;

/// 役職変更のユースケース
pub struct AssignRoleUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl AssignRoleUseCase {
    /// 新しい AssignRoleUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 役職変更を実行
    ///
    /// 呼び出し元はセッションのバインディングで特定し、主催者で
    /// あることを確認してから対象の役職を変更します。
    ///
    /// # Arguments
    ///
    /// * `binding` - 呼び出し元コネクションのバインディング
    /// * `claimed_room_id` - イベントに書かれたルーム ID（バインディングと照合）
    /// * `target_id` - 役職を変更される参加者
    /// * `role` - 新しい役職
    pub async fn execute(
        &self,
        binding: &SessionBinding,
        claimed_room_id: RoomId,
        target_id: ParticipantId,
        role: Role,
    ) -> Result<(), AssignRoleError> {
        // 1. ルーム ID の照合
        if claimed_room_id != binding.room_id {
            return Err(AssignRoleError::RoomMismatch(claimed_room_id.to_string()));
        }

        // 2. 呼び出し元が主催者であることを確認
        let participants = self
            .repository
            .get_participants(&binding.room_id)
            .await
            .map_err(AssignRoleError::Repository)?;
        let caller = participants
            .iter()
            .find(|p| p.id == binding.participant_id)
            .ok_or_else(|| AssignRoleError::NotOrganizer(binding.participant_id.to_string()))?;
        if caller.role != Role::Organizer {
            return Err(AssignRoleError::NotOrganizer(caller.id.to_string()));
        }

        // 3. 役職を変更
        self.repository
            .assign_role(&binding.room_id, &target_id, role)
            .await
            .map_err(|e| match e {
                RepositoryError::ParticipantNotFound(id) => {
                    AssignRoleError::ParticipantNotFound(id)
                }
                other => AssignRoleError::Repository(other),
            })
    }

    /// ルーム内の全コネクションに参加者リストの更新を配信
    ///
    /// 役職変更は各参加者の見え方を変えるため、変更後に全コネクションへ
    /// 再投影したリストを配り直します。
    pub async fn broadcast_participant_views(
        &self,
        room_id: &RoomId,
    ) -> Result<usize, AssignRoleError> {
        dispatch::push_participant_views(
            self.repository.as_ref(),
            self.message_pusher.as_ref(),
            room_id,
        )
        .await
        .map_err(AssignRoleError::Repository)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, LoginClaim, Timestamp};
    use crate::infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
    };

    fn room_id(value: &str) -> RoomId {
        RoomId::new(value.to_string()).unwrap()
    }

    fn participant_id(value: &str) -> ParticipantId {
        ParticipantId::new(value.to_string()).unwrap()
    }

    fn binding(room: &str, participant: &str) -> SessionBinding {
        SessionBinding {
            room_id: room_id(room),
            participant_id: participant_id(participant),
        }
    }

    async fn create_usecase_with_room() -> (AssignRoleUseCase, Arc<InMemoryRoomRepository>) {
        let repository = Arc::new(InMemoryRoomRepository::new());
        // org-1 はルームキーと一致するので主催者、ann は市民として参加する
        for (id, name) in [("org-1", "GM"), ("ann", "Ann")] {
            repository
                .join_room(
                    room_id("org-1"),
                    LoginClaim {
                        participant_id: participant_id(id),
                        name: DisplayName::new(name.to_string()).unwrap(),
                    },
                    Timestamp::new(1000),
                )
                .await
                .unwrap();
        }
        let usecase = AssignRoleUseCase::new(
            repository.clone(),
            Arc::new(WebSocketMessagePusher::new()),
        );
        (usecase, repository)
    }

    #[tokio::test]
    async fn test_organizer_can_assign_role() {
        // テスト項目: 主催者が参加者の役職を変更できる
        // given (前提条件):
        let (usecase, repository) = create_usecase_with_room().await;

        // when (操作):
        let result = usecase
            .execute(
                &binding("org-1", "org-1"),
                room_id("org-1"),
                participant_id("ann"),
                Role::Commissar,
            )
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(()));
        let room = repository.get_room(&room_id("org-1")).await.unwrap();
        assert_eq!(
            room.participant(&participant_id("ann")).unwrap().role,
            Role::Commissar
        );
    }

    #[tokio::test]
    async fn test_non_organizer_cannot_assign_role() {
        // テスト項目: 主催者以外の役職変更は拒否される
        // given (前提条件):
        let (usecase, repository) = create_usecase_with_room().await;

        // when (操作): 市民 ann が自分をマフィアに変更しようとする
        let result = usecase
            .execute(
                &binding("org-1", "ann"),
                room_id("org-1"),
                participant_id("ann"),
                Role::Mafia,
            )
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(AssignRoleError::NotOrganizer("ann".to_string())));
        let room = repository.get_room(&room_id("org-1")).await.unwrap();
        assert_eq!(
            room.participant(&participant_id("ann")).unwrap().role,
            Role::Civilian
        );
    }

    #[tokio::test]
    async fn test_assign_role_rejects_unknown_target() {
        // テスト項目: 存在しない参加者への役職変更はエラーになる
        // given (前提条件):
        let (usecase, _repository) = create_usecase_with_room().await;

        // when (操作):
        let result = usecase
            .execute(
                &binding("org-1", "org-1"),
                room_id("org-1"),
                participant_id("ghost"),
                Role::Doctor,
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(AssignRoleError::ParticipantNotFound("ghost".to_string()))
        );
    }

    #[tokio::test]
    async fn test_assign_role_rejects_room_mismatch() {
        // テスト項目: セッションと異なるルーム ID の申告は拒否される
        // given (前提条件):
        let (usecase, _repository) = create_usecase_with_room().await;

        // when (操作):
        let result = usecase
            .execute(
                &binding("org-1", "org-1"),
                room_id("org-2"),
                participant_id("ann"),
                Role::Doctor,
            )
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(AssignRoleError::RoomMismatch("org-2".to_string())));
    }
}
