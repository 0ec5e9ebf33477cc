//! UseCase 層のエラー型定義
//!
//! UI 層はこれらのエラーをワイヤ上のエラーイベント（コード + メッセージ）に
//! 変換してクライアントへ返します。

use thiserror::Error;

use crate::domain::RepositoryError;

/// ログイン処理のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoginError {
    /// ルームの参加者数が上限に達している
    #[error("room capacity exceeded")]
    RoomCapacityExceeded,

    /// Repository 操作の失敗
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

/// メッセージ送信処理のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SendMessageError {
    /// イベントのルーム ID がセッションの参加先と一致しない
    #[error("room '{0}' does not match the session binding")]
    RoomMismatch(String),

    /// セッションの参加者レコードがルームに存在しない
    #[error("sender '{0}' is not a participant of the room")]
    SenderNotInRoom(String),

    /// 宛先チャンネルの履歴が上限に達している
    #[error("message capacity exceeded")]
    MessageCapacityExceeded,

    /// Repository 操作の失敗
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

/// 役職変更処理のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssignRoleError {
    /// イベントのルーム ID がセッションの参加先と一致しない
    #[error("room '{0}' does not match the session binding")]
    RoomMismatch(String),

    /// 呼び出し元が主催者ではない
    #[error("participant '{0}' is not the organizer")]
    NotOrganizer(String),

    /// 対象の参加者がルームに存在しない
    #[error("participant '{0}' not found in room")]
    ParticipantNotFound(String),

    /// Repository 操作の失敗
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

/// 切断後の配信処理のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DisconnectError {
    /// Repository 操作の失敗
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GetRoomDetailError {
    /// 指定されたルームが存在しない
    #[error("room '{0}' does not exist")]
    RoomNotFound(String),
}
