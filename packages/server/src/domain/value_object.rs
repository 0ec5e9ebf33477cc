//! Domain 層の値オブジェクト定義
//!
//! ルーム ID・参加者 ID・表示名・メッセージ本文などのプリミティブを
//! 検証済みの型としてラップします。生成時に不変条件を検証するため、
//! これらの型の値は常に有効であることが保証されます。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::DomainError;

/// ID・表示名の最大文字数
pub const MAX_ID_LENGTH: usize = 64;

/// メッセージ本文の最大文字数
pub const MAX_TEXT_LENGTH: usize = 500;

/// ルーム ID（主催者のクライアントが採番した文字列）
///
/// ルームは主催者単位で作成されるため、慣習として主催者の参加者 ID が
/// そのままルーム ID になります。サーバ側では不透明な文字列として扱います。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    /// 新しい RoomId を作成（検証付き）
    pub fn new(value: String) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_ID_LENGTH {
            return Err(DomainError::InvalidRoomId);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// 内部の文字列への参照を取得
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 参加者 ID（クライアントが申告する識別子）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// 新しい ParticipantId を作成（検証付き）
    pub fn new(value: String) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_ID_LENGTH {
            return Err(DomainError::InvalidParticipantId);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// 内部の文字列への参照を取得
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ParticipantId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 参加者の表示名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    /// 新しい DisplayName を作成（検証付き）
    pub fn new(value: String) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_ID_LENGTH {
            return Err(DomainError::InvalidDisplayName);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// 内部の文字列への参照を取得
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// メッセージ本文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageText(String);

impl MessageText {
    /// 新しい MessageText を作成（検証付き）
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.trim().is_empty() || value.chars().count() > MAX_TEXT_LENGTH {
            return Err(DomainError::InvalidMessageText);
        }
        Ok(Self(value))
    }

    /// 内部の文字列への参照を取得
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// タイムスタンプ（JST ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// 新しい Timestamp を作成
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    /// ミリ秒の値を取得
    pub fn value(&self) -> i64 {
        self.0
    }
}

/// WebSocket コネクションの識別子
///
/// 参加者 ID と異なりサーバが採番します。同一の参加者が複数タブで
/// 接続した場合、参加者 ID は同じでもコネクション ID は別になります。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// 新しいコネクション ID を採番
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 参加者の役職
///
/// `Organizer` はゲームマスター（進行役）。それ以外はプレイヤーの配役で、
/// `Mafia` / `Doctor` / `Commissar` は能力持ち、`Civilian` は市民です。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Organizer,
    Mafia,
    Doctor,
    Commissar,
    Civilian,
}

impl Role {
    /// ワイヤ表現の文字列を取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Organizer => "organizer",
            Role::Mafia => "mafia",
            Role::Doctor => "doctor",
            Role::Commissar => "commissar",
            Role::Civilian => "civilian",
        }
    }

    /// 役職に紐づく強調色を取得
    ///
    /// 主催者ビューで参加者リストを色分けする際に使用します。
    pub fn color(&self) -> Color {
        match self {
            Role::Mafia => Color::Red,
            Role::Doctor => Color::Green,
            Role::Commissar => Color::Brown,
            Role::Organizer | Role::Civilian => Color::Black,
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "organizer" => Ok(Role::Organizer),
            "mafia" => Ok(Role::Mafia),
            "doctor" => Ok(Role::Doctor),
            "commissar" => Ok(Role::Commissar),
            "civilian" => Ok(Role::Civilian),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}

/// メッセージの宛先チャンネル
///
/// `General` は全員宛、`Role` は同役職宛、`Organizer` は主催者との個別連絡用。
/// チャンネルはメッセージのタグであり、配信自体はルーム全体に行われます。
/// どのチャンネルを表示するかはクライアント側で振り分けます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    General,
    Role,
    Organizer,
}

impl Channel {
    /// 全チャンネルの一覧（履歴バケツの初期化順）
    pub const ALL: [Channel; 3] = [Channel::General, Channel::Role, Channel::Organizer];

    /// ワイヤ表現の文字列を取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::General => "general",
            Channel::Role => "role",
            Channel::Organizer => "organizer",
        }
    }
}

impl FromStr for Channel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(Channel::General),
            "role" => Ok(Channel::Role),
            "organizer" => Ok(Channel::Organizer),
            other => Err(DomainError::UnknownChannel(other.to_string())),
        }
    }
}

/// ビューの強調色
///
/// 役職バッジとマフィア発言の強調に使用します。クライアントは
/// この論理色を端末や画面の実際の色にマッピングします。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Brown,
    Black,
}

impl Color {
    /// ワイヤ表現の文字列を取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Brown => "brown",
            Color::Black => "black",
        }
    }
}
