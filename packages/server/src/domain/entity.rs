//! Domain 層のエンティティ定義
//!
//! ルームと参加者、アーカイブされたメッセージのモデルを定義します。
//! ここに保存されるのは常に「真実の状態」であり、役職に応じた
//! 匿名化は配信時の投影（`visibility` / `routing`）でのみ行われます。

use std::collections::HashMap;

use serde::Serialize;

use super::error::DomainError;
use super::value_object::{Channel, DisplayName, MessageText, ParticipantId, Role, RoomId, Timestamp};

/// ルームの参加者数の既定上限
pub const DEFAULT_PARTICIPANT_CAPACITY: usize = 100;

/// チャンネル毎のメッセージ履歴の既定上限
pub const DEFAULT_MESSAGE_CAPACITY: usize = 1000;

/// ルームの参加者（真実の状態）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participant {
    /// 参加者 ID
    pub id: ParticipantId,
    /// 表示名
    pub name: DisplayName,
    /// 役職
    pub role: Role,
    /// 生存フラグ（ゲーム進行で脱落すると false）
    pub alive: bool,
    /// 接続フラグ（全コネクション切断で false、レコードは残る）
    pub connected: bool,
    /// 初回参加時刻
    pub joined_at: Timestamp,
}

impl Participant {
    /// 新しい参加者を作成（生存・接続済みの状態で開始）
    pub fn new(id: ParticipantId, name: DisplayName, role: Role, joined_at: Timestamp) -> Self {
        Self {
            id,
            name,
            role,
            alive: true,
            connected: true,
            joined_at,
        }
    }
}

/// アーカイブされたメッセージ（真実のレコード）
///
/// 送信者の本名と役職つきで保存されます。受信者に応じた匿名化は
/// このレコードには一切適用されません。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredMessage {
    /// 送信者の参加者 ID
    pub sender_id: ParticipantId,
    /// 送信時点の送信者の表示名
    pub sender_name: DisplayName,
    /// 本文
    pub text: MessageText,
    /// 宛先チャンネル
    pub channel: Channel,
    /// サーバが刻印した送信時刻
    pub sent_at: Timestamp,
}

impl StoredMessage {
    /// 新しいメッセージレコードを作成
    pub fn new(
        sender_id: ParticipantId,
        sender_name: DisplayName,
        text: MessageText,
        channel: Channel,
        sent_at: Timestamp,
    ) -> Self {
        Self {
            sender_id,
            sender_name,
            text,
            channel,
            sent_at,
        }
    }
}

/// ログイン時にクライアントが申告する参加情報
///
/// 申告されるのは身元（ID と表示名）のみです。役職はクライアントの
/// 申告を信用せず、サーバ側で割り当てます（`Room::join` を参照）。
#[derive(Debug, Clone, PartialEq)]
pub struct LoginClaim {
    /// 申告された参加者 ID
    pub participant_id: ParticipantId,
    /// 申告された表示名
    pub name: DisplayName,
}

/// ルーム参加の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinOutcome {
    /// この参加によってルームが新規作成されたか
    pub room_created: bool,
    /// 既存の参加者レコードへの再参加だったか
    pub rejoined: bool,
}

/// ルーム（ゲームセッション単位の集約）
///
/// 参加者リストとチャンネル毎のメッセージ履歴を保持します。
/// 参加者リストは参加順を保存するため Vec で持ちます。
#[derive(Debug, Clone, Serialize)]
pub struct Room {
    /// ルーム ID（主催者の参加者 ID と一致する慣習）
    pub id: RoomId,
    /// ルーム作成時刻（最初のログイン時刻）
    pub created_at: Timestamp,
    /// 参加者リスト（参加順）
    pub participants: Vec<Participant>,
    /// チャンネル毎のメッセージ履歴（到着順）
    pub channels: HashMap<Channel, Vec<StoredMessage>>,
    /// 参加者数の上限
    #[serde(skip)]
    participant_capacity: usize,
    /// チャンネル毎のメッセージ数の上限
    #[serde(skip)]
    message_capacity: usize,
}

impl Room {
    /// 既定の容量で新しいルームを作成
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self::with_capacity(
            id,
            created_at,
            DEFAULT_PARTICIPANT_CAPACITY,
            DEFAULT_MESSAGE_CAPACITY,
        )
    }

    /// 容量を指定して新しいルームを作成（テスト用途）
    pub fn with_capacity(
        id: RoomId,
        created_at: Timestamp,
        participant_capacity: usize,
        message_capacity: usize,
    ) -> Self {
        // 全チャンネルの履歴バケツを最初から用意しておく
        let channels = Channel::ALL
            .iter()
            .map(|channel| (*channel, Vec::new()))
            .collect();
        Self {
            id,
            created_at,
            participants: Vec::new(),
            channels,
            participant_capacity,
            message_capacity,
        }
    }

    /// 参加者を追加、または既存レコードへ再参加
    ///
    /// 役職はサーバ側で決定します。参加者 ID がルーム ID（= 主催者 ID）と
    /// 一致する場合は主催者、それ以外は市民として参加し、以降の役職変更は
    /// `assign_role` でのみ行います。同じ参加者 ID のレコードが既に存在する
    /// 場合は表示名を更新し、接続フラグを立てて `rejoined = true` を返します
    /// （再参加で役職は変わりません）。
    pub fn join(&mut self, claim: LoginClaim, now: Timestamp) -> Result<bool, DomainError> {
        if let Some(existing) = self
            .participants
            .iter_mut()
            .find(|p| p.id == claim.participant_id)
        {
            existing.name = claim.name;
            existing.connected = true;
            return Ok(true);
        }

        if self.participants.len() >= self.participant_capacity {
            return Err(DomainError::RoomCapacityExceeded);
        }

        let role = if claim.participant_id.as_str() == self.id.as_str() {
            Role::Organizer
        } else {
            Role::Civilian
        };
        self.participants
            .push(Participant::new(claim.participant_id, claim.name, role, now));
        Ok(false)
    }

    /// メッセージを該当チャンネルの履歴に追加
    pub fn archive_message(&mut self, message: StoredMessage) -> Result<(), DomainError> {
        let history = self.channels.entry(message.channel).or_default();
        if history.len() >= self.message_capacity {
            return Err(DomainError::MessageCapacityExceeded);
        }
        history.push(message);
        Ok(())
    }

    /// 参加者の役職を変更
    pub fn assign_role(
        &mut self,
        participant_id: &ParticipantId,
        role: Role,
    ) -> Result<(), DomainError> {
        let participant = self
            .participants
            .iter_mut()
            .find(|p| p.id == *participant_id)
            .ok_or_else(|| DomainError::ParticipantNotFound(participant_id.to_string()))?;
        participant.role = role;
        Ok(())
    }

    /// 参加者の接続フラグを更新
    ///
    /// 参加者が存在しない場合は何もせず false を返します（切断処理は
    /// ルーム側の状態に関わらず完了させたいため、エラーにはしません）。
    pub fn set_connected(&mut self, participant_id: &ParticipantId, connected: bool) -> bool {
        match self
            .participants
            .iter_mut()
            .find(|p| p.id == *participant_id)
        {
            Some(participant) => {
                participant.connected = connected;
                true
            }
            None => false,
        }
    }

    /// 参加者を ID で取得
    pub fn participant(&self, participant_id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == *participant_id)
    }

    /// チャンネルの履歴を取得（未初期化のチャンネルは空スライス）
    pub fn messages(&self, channel: Channel) -> &[StoredMessage] {
        self.channels
            .get(&channel)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
