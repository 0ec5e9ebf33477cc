//! Domain 層のエラー型定義

use thiserror::Error;

/// 値オブジェクト・エンティティの不変条件違反
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// ルーム ID が不正（空文字または 64 文字超）
    #[error("room id must be 1..=64 characters")]
    InvalidRoomId,

    /// 参加者 ID が不正（空文字または 64 文字超）
    #[error("participant id must be 1..=64 characters")]
    InvalidParticipantId,

    /// 表示名が不正（空文字または 64 文字超）
    #[error("display name must be 1..=64 characters")]
    InvalidDisplayName,

    /// メッセージ本文が不正（空文字または 500 文字超）
    #[error("message text must be 1..=500 characters")]
    InvalidMessageText,

    /// 未定義の役職
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// 未定義のチャンネル
    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    /// ルームの参加者数が上限に達している
    #[error("room capacity exceeded")]
    RoomCapacityExceeded,

    /// チャンネルのメッセージ履歴が上限に達している
    #[error("message capacity exceeded")]
    MessageCapacityExceeded,

    /// 対象の参加者がルームに存在しない
    #[error("participant '{0}' not found in room")]
    ParticipantNotFound(String),
}

/// Repository 操作のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// 指定されたルームが存在しない
    #[error("room '{0}' does not exist")]
    RoomNotFound(String),

    /// 対象の参加者がルームに存在しない
    #[error("participant '{0}' not found in room")]
    ParticipantNotFound(String),

    /// ルームの参加者数が上限に達している
    #[error("room capacity exceeded")]
    RoomCapacityExceeded,

    /// チャンネルのメッセージ履歴が上限に達している
    #[error("message capacity exceeded")]
    MessageCapacityExceeded,
}

/// MessagePusher 操作のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MessagePushError {
    /// 指定されたコネクションが登録されていない
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(String),

    /// 送信チャンネルへの書き込みに失敗（切断直後など）
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
