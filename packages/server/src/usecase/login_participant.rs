//! UseCase: ログイン処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LoginParticipantUseCase::execute() メソッド
//! - ルームの取得または作成、参加者の登録、コネクションの紐づけ
//!
//! ### なぜこのテストが必要か
//! - 同じルーム ID への同時ログインでルームが二重に作られないことを保証
//! - 再ログインが冪等であること（レコードが増えない）を確認
//! - 容量超過時にコネクションが登録されないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ルーム作成を伴うログイン、既存ルームへのログイン
//! - 異常系：満室のルームへのログイン
//! - エッジケース：同一参加者の再ログイン、同時ログインの競合

use std::sync::Arc;

use omerta_shared::time::Clock;

use crate::domain::{
    ConnectionId, JoinOutcome, LoginClaim, MessagePusher, ParticipantId, PusherChannel,
    RepositoryError, RoomId, RoomProjection, RoomRepository, SessionBinding, Timestamp,
    project_room,
};

use super::dispatch;
use super::error::LoginError;

/// ログインのユースケース
pub struct LoginParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Clock（時刻取得の抽象化、テストで固定時刻に差し替え可能）
    clock: Arc<dyn Clock>,
}

impl LoginParticipantUseCase {
    /// 新しい LoginParticipantUseCase を作成
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

    /// ログインを実行
    ///
    /// ルームが存在しなければ作成し、申告された参加者を登録して
    /// コネクションをルームに紐づけます。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - ログイン元の WebSocket コネクション
    /// * `room_id` - 参加先のルーム ID
    /// * `claim` - クライアントが申告した参加情報
    /// * `sender` - コネクションへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(JoinOutcome)` - ログイン成功（ルーム新規作成・再参加のフラグつき）
    /// * `Err(LoginError)` - ログイン失敗
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        claim: LoginClaim,
        sender: PusherChannel,
    ) -> Result<JoinOutcome, LoginError> {
        let now = Timestamp::new(self.clock.now_jst_millis());
        let participant_id = claim.participant_id.clone();

        // 1. ルームへ参加（取得と作成は Repository 内で単一の操作）
        let outcome = self
            .repository
            .join_room(room_id.clone(), claim, now)
            .await
            .map_err(|e| match e {
                RepositoryError::RoomCapacityExceeded => LoginError::RoomCapacityExceeded,
                other => LoginError::Repository(other),
            })?;

        // 2. 参加に成功した場合のみコネクションを登録
        let binding = SessionBinding {
            room_id,
            participant_id,
        };
        self.message_pusher
            .register(connection_id, binding, sender)
            .await;

        Ok(outcome)
    }

    /// ログイン応答用のルームスナップショットを構築
    ///
    /// 参加者リストとチャンネル履歴を閲覧者の視点で投影します。
    /// 履歴にもライブ配信と同じ匿名化ルールが適用されます。
    pub async fn personal_snapshot(
        &self,
        room_id: &RoomId,
        viewer_id: &ParticipantId,
    ) -> Result<RoomProjection, LoginError> {
        let room = self
            .repository
            .get_room(room_id)
            .await
            .map_err(LoginError::Repository)?;
        let viewer = room.participant(viewer_id).ok_or_else(|| {
            LoginError::Repository(RepositoryError::ParticipantNotFound(viewer_id.to_string()))
        })?;
        Ok(project_room(&room, viewer))
    }

    /// ルーム内の全コネクションに参加者リストの更新を配信
    pub async fn broadcast_participant_views(
        &self,
        room_id: &RoomId,
    ) -> Result<usize, LoginError> {
        dispatch::push_participant_views(
            self.repository.as_ref(),
            self.message_pusher.as_ref(),
            room_id,
        )
        .await
        .map_err(LoginError::Repository)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, Role};
    use crate::infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
    };
    use omerta_shared::time::FixedClock;
    use tokio::sync::mpsc;

    fn claim(id: &str, name: &str) -> LoginClaim {
        LoginClaim {
            participant_id: ParticipantId::new(id.to_string()).unwrap(),
            name: DisplayName::new(name.to_string()).unwrap(),
        }
    }

    fn room_id(value: &str) -> RoomId {
        RoomId::new(value.to_string()).unwrap()
    }

    fn create_usecase() -> (
        LoginParticipantUseCase,
        Arc<InMemoryRoomRepository>,
        Arc<WebSocketMessagePusher>,
    ) {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = LoginParticipantUseCase::new(
            repository.clone(),
            pusher.clone(),
            Arc::new(FixedClock::new(1_700_000_000_000)),
        );
        (usecase, repository, pusher)
    }

    #[tokio::test]
    async fn test_login_creates_room_on_first_login() {
        // テスト項目: 最初のログインでルームが作成され、参加者が登録される
        // given (前提条件):
        let (usecase, repository, pusher) = create_usecase();
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let outcome = usecase
            .execute(
                ConnectionId::generate(),
                room_id("org-1"),
                claim("org-1", "GM"),
                tx,
            )
            .await
            .unwrap();

        // then (期待する結果):
        assert!(outcome.room_created);
        assert!(!outcome.rejoined);
        assert_eq!(repository.count_rooms().await, 1);
        let participants = repository.get_participants(&room_id("org-1")).await.unwrap();
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].id.as_str(), "org-1");
        // ルームキーと一致する参加者 ID は主催者になる
        assert_eq!(participants[0].role, Role::Organizer);
        // ルーム作成時刻は Clock の時刻
        let room = repository.get_room(&room_id("org-1")).await.unwrap();
        assert_eq!(room.created_at, Timestamp::new(1_700_000_000_000));
        // コネクションが登録されている
        assert!(
            pusher
                .is_participant_connected(
                    &room_id("org-1"),
                    &ParticipantId::new("org-1".to_string()).unwrap()
                )
                .await
        );
    }

    #[tokio::test]
    async fn test_login_joins_existing_room() {
        // テスト項目: 2人目のログインは既存ルームへの参加になる
        // given (前提条件):
        let (usecase, repository, _pusher) = create_usecase();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        usecase
            .execute(
                ConnectionId::generate(),
                room_id("org-1"),
                claim("org-1", "GM"),
                tx1,
            )
            .await
            .unwrap();

        // when (操作):
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let outcome = usecase
            .execute(
                ConnectionId::generate(),
                room_id("org-1"),
                claim("ann", "Ann"),
                tx2,
            )
            .await
            .unwrap();

        // then (期待する結果):
        assert!(!outcome.room_created);
        assert_eq!(repository.count_rooms().await, 1);
        let participants = repository.get_participants(&room_id("org-1")).await.unwrap();
        assert_eq!(participants.len(), 2);
        // ルームキーと異なる参加者 ID は市民として参加する
        assert_eq!(participants[1].role, Role::Civilian);
    }

    #[tokio::test]
    async fn test_relogin_is_idempotent() {
        // テスト項目: 同じ参加者 ID での再ログインでレコードが増えず、
        // 割り当て済みの役職も維持される
        // given (前提条件): ログイン後にマフィアを割り当て済み
        let (usecase, repository, _pusher) = create_usecase();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        usecase
            .execute(
                ConnectionId::generate(),
                room_id("org-1"),
                claim("ann", "Ann"),
                tx1,
            )
            .await
            .unwrap();
        repository
            .assign_role(
                &room_id("org-1"),
                &ParticipantId::new("ann".to_string()).unwrap(),
                Role::Mafia,
            )
            .await
            .unwrap();

        // when (操作): 別コネクションから同じ参加者 ID でログイン
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let outcome = usecase
            .execute(
                ConnectionId::generate(),
                room_id("org-1"),
                claim("ann", "Annie"),
                tx2,
            )
            .await
            .unwrap();

        // then (期待する結果): 再参加扱いで、表示名のみ更新、役職は維持
        assert!(outcome.rejoined);
        let participants = repository.get_participants(&room_id("org-1")).await.unwrap();
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].name.as_str(), "Annie");
        assert_eq!(participants[0].role, Role::Mafia);
    }

    #[tokio::test]
    async fn test_login_capacity_exceeded_does_not_register_connection() {
        // テスト項目: 満室のルームへのログインは失敗し、コネクションも登録されない
        // given (前提条件): 容量1のルームに1人参加済み
        let repository = Arc::new(InMemoryRoomRepository::with_capacity(1, 10));
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = LoginParticipantUseCase::new(
            repository.clone(),
            pusher.clone(),
            Arc::new(FixedClock::new(1_700_000_000_000)),
        );
        let (tx1, _rx1) = mpsc::unbounded_channel();
        usecase
            .execute(
                ConnectionId::generate(),
                room_id("org-1"),
                claim("org-1", "GM"),
                tx1,
            )
            .await
            .unwrap();

        // when (操作):
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let result = usecase
            .execute(
                ConnectionId::generate(),
                room_id("org-1"),
                claim("ann", "Ann"),
                tx2,
            )
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(LoginError::RoomCapacityExceeded));
        assert!(
            !pusher
                .is_participant_connected(
                    &room_id("org-1"),
                    &ParticipantId::new("ann".to_string()).unwrap()
                )
                .await
        );
    }

    #[tokio::test]
    async fn test_concurrent_logins_create_single_room() {
        // テスト項目: 同じルーム ID への同時ログインでもルームは一つだけ作られる
        // given (前提条件):
        let (usecase, repository, _pusher) = create_usecase();
        let usecase = Arc::new(usecase);

        // when (操作): 10人が同時に同じルームへログイン
        let mut handles = Vec::new();
        for i in 0..10 {
            let usecase = usecase.clone();
            handles.push(tokio::spawn(async move {
                let (tx, _rx) = mpsc::unbounded_channel();
                usecase
                    .execute(
                        ConnectionId::generate(),
                        RoomId::new("org-1".to_string()).unwrap(),
                        LoginClaim {
                            participant_id: ParticipantId::new(format!("player-{i}")).unwrap(),
                            name: DisplayName::new(format!("Player {i}")).unwrap(),
                        },
                        tx,
                    )
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // then (期待する結果):
        assert_eq!(repository.count_rooms().await, 1);
        let participants = repository.get_participants(&room_id("org-1")).await.unwrap();
        assert_eq!(participants.len(), 10);
    }

    #[tokio::test]
    async fn test_personal_snapshot_anonymizes_for_viewer() {
        // テスト項目: スナップショットが閲覧者の視点で投影される
        // given (前提条件): 主催者とマフィアが参加済みのルーム
        let (usecase, repository, _pusher) = create_usecase();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let (tx3, _rx3) = mpsc::unbounded_channel();
        usecase
            .execute(
                ConnectionId::generate(),
                room_id("org-1"),
                claim("org-1", "GM"),
                tx1,
            )
            .await
            .unwrap();
        usecase
            .execute(
                ConnectionId::generate(),
                room_id("org-1"),
                claim("ann", "Ann"),
                tx2,
            )
            .await
            .unwrap();
        usecase
            .execute(
                ConnectionId::generate(),
                room_id("org-1"),
                claim("carol", "Carol"),
                tx3,
            )
            .await
            .unwrap();
        repository
            .assign_role(
                &room_id("org-1"),
                &ParticipantId::new("ann".to_string()).unwrap(),
                Role::Mafia,
            )
            .await
            .unwrap();

        // when (操作):
        let snapshot = usecase
            .personal_snapshot(
                &room_id("org-1"),
                &ParticipantId::new("carol".to_string()).unwrap(),
            )
            .await
            .unwrap();

        // then (期待する結果): carol には ann が匿名で見える
        assert_eq!(snapshot.participants.len(), 3);
        assert_eq!(snapshot.participants[0].name, "GM");
        assert_eq!(snapshot.participants[1].name, "Participant ann");
        assert_eq!(snapshot.participants[2].name, "Carol");
    }

    #[tokio::test]
    async fn test_broadcast_participant_views_personalizes_payloads() {
        // テスト項目: 参加者リスト配信がコネクション毎に個別化される
        // given (前提条件): 主催者とマフィアと市民が接続中
        let (usecase, repository, _pusher) = create_usecase();
        let (tx_gm, mut rx_gm) = mpsc::unbounded_channel();
        let (tx_ann, _rx_ann) = mpsc::unbounded_channel();
        let (tx_carol, mut rx_carol) = mpsc::unbounded_channel();
        usecase
            .execute(
                ConnectionId::generate(),
                room_id("org-1"),
                claim("org-1", "GM"),
                tx_gm,
            )
            .await
            .unwrap();
        usecase
            .execute(
                ConnectionId::generate(),
                room_id("org-1"),
                claim("ann", "Ann"),
                tx_ann,
            )
            .await
            .unwrap();
        usecase
            .execute(
                ConnectionId::generate(),
                room_id("org-1"),
                claim("carol", "Carol"),
                tx_carol,
            )
            .await
            .unwrap();
        repository
            .assign_role(
                &room_id("org-1"),
                &ParticipantId::new("ann".to_string()).unwrap(),
                Role::Mafia,
            )
            .await
            .unwrap();

        // when (操作):
        let delivered = usecase
            .broadcast_participant_views(&room_id("org-1"))
            .await
            .unwrap();

        // then (期待する結果): 3コネクション全てに配信される
        assert_eq!(delivered, 3);
        let gm_json = rx_gm.recv().await.unwrap();
        let carol_json = rx_carol.recv().await.unwrap();
        // 主催者には本名、市民には匿名ラベルが届く
        assert!(gm_json.contains(r#""name":"Ann""#));
        assert!(gm_json.contains(r#""role":"mafia""#));
        assert!(carol_json.contains(r#""name":"Participant ann""#));
        assert!(carol_json.contains(r#""role":"participant""#));
        assert!(carol_json.contains(r#""type":"updateParticipants""#));
    }
}
