//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::entity::{JoinOutcome, LoginClaim, Participant, Room, StoredMessage};
use super::error::RepositoryError;
use super::value_object::{ParticipantId, Role, RoomId, Timestamp};

/// Room Repository trait
///
/// ドメイン層が必要とするデータストアへのインターフェース。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
///
/// ## 依存性の逆転（DIP）
///
/// - ドメイン層が必要とするインターフェースをドメイン層自身が定義
/// - Infrastructure 層がドメイン層のインターフェースに依存
/// - ドメイン層は Infrastructure 層に依存しない
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// ルームへ参加（ルームが無ければ作成してから参加）
    ///
    /// 取得と作成は単一の操作として実行されます。同じルーム ID への
    /// 同時ログインが競合しても、作成されるルームは一つだけです。
    async fn join_room(
        &self,
        room_id: RoomId,
        claim: LoginClaim,
        now: Timestamp,
    ) -> Result<JoinOutcome, RepositoryError>;

    /// Room エンティティを取得
    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError>;

    /// 全ルームの一覧を取得
    async fn list_rooms(&self) -> Vec<Room>;

    /// ルームの参加者リストを取得（参加順）
    async fn get_participants(&self, room_id: &RoomId) -> Result<Vec<Participant>, RepositoryError>;

    /// メッセージをルームの該当チャンネルに追加
    async fn archive_message(
        &self,
        room_id: &RoomId,
        message: StoredMessage,
    ) -> Result<(), RepositoryError>;

    /// 参加者の役職を変更
    async fn assign_role(
        &self,
        room_id: &RoomId,
        participant_id: &ParticipantId,
        role: Role,
    ) -> Result<(), RepositoryError>;

    /// 参加者の接続フラグを更新
    async fn set_connected(
        &self,
        room_id: &RoomId,
        participant_id: &ParticipantId,
        connected: bool,
    ) -> Result<(), RepositoryError>;

    /// ルーム数を取得
    async fn count_rooms(&self) -> usize;
}
