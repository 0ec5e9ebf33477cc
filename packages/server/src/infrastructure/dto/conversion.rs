//! Conversion logic between DTOs and domain models.

use crate::domain::{
    DisplayName, DomainError, LoginClaim, MessageView, ParticipantId, ParticipantView, Role,
    RoomProjection,
};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain Model
// ========================================

impl TryFrom<dto::ParticipantClaimDto> for LoginClaim {
    type Error = DomainError;

    fn try_from(dto: dto::ParticipantClaimDto) -> Result<Self, Self::Error> {
        // role は検証のみで破棄する（役職の割り当てはサーバ側で行う）
        dto.role.parse::<Role>()?;
        Ok(Self {
            participant_id: ParticipantId::new(dto.id)?,
            name: DisplayName::new(dto.name)?,
        })
    }
}

// ========================================
// Domain Model → DTO
// ========================================

impl From<ParticipantView> for dto::ParticipantViewDto {
    fn from(view: ParticipantView) -> Self {
        Self {
            id: view.id.to_string(),
            name: view.name,
            role: view.role.as_str().to_string(),
            alive: view.alive,
            connected: view.connected,
            color: view.color.as_str().to_string(),
        }
    }
}

impl From<MessageView> for dto::MessageViewDto {
    fn from(view: MessageView) -> Self {
        Self {
            sender_id: view.sender_id.to_string(),
            sender_name: view.sender_name,
            text: view.text.as_str().to_string(),
            sent_at: view.sent_at.value(),
            color: view.color.map(|c| c.as_str().to_string()),
        }
    }
}

impl From<RoomProjection> for dto::RoomSnapshotDto {
    fn from(projection: RoomProjection) -> Self {
        Self {
            id: projection.room_id.to_string(),
            participants: projection
                .participants
                .into_iter()
                .map(Into::into)
                .collect(),
            channels: projection
                .channels
                .into_iter()
                .map(|(channel, history)| {
                    (
                        channel.as_str().to_string(),
                        history.into_iter().map(Into::into).collect(),
                    )
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Channel, Color, MessageText, RoleLabel, RoomId, Timestamp};

    #[test]
    fn test_claim_dto_to_domain() {
        // テスト項目: 有効な申告 DTO が LoginClaim に変換される
        // （役職フィールドは受理されるが申告としては保持されない）
        // given (前提条件):
        let dto_claim = dto::ParticipantClaimDto {
            id: "ann".to_string(),
            name: "Ann".to_string(),
            role: "mafia".to_string(),
        };

        // when (操作):
        let claim: LoginClaim = dto_claim.try_into().unwrap();

        // then (期待する結果):
        assert_eq!(claim.participant_id.as_str(), "ann");
        assert_eq!(claim.name.as_str(), "Ann");
    }

    #[test]
    fn test_claim_dto_with_unknown_role_fails() {
        // テスト項目: 未知の役職を含む申告 DTO は変換に失敗する
        // given (前提条件):
        let dto_claim = dto::ParticipantClaimDto {
            id: "ann".to_string(),
            name: "Ann".to_string(),
            role: "werewolf".to_string(),
        };

        // when (操作):
        let result: Result<LoginClaim, _> = dto_claim.try_into();

        // then (期待する結果):
        assert_eq!(result, Err(DomainError::UnknownRole("werewolf".to_string())));
    }

    #[test]
    fn test_claim_dto_with_empty_name_fails() {
        // テスト項目: 空の表示名を含む申告 DTO は変換に失敗する
        // given (前提条件):
        let dto_claim = dto::ParticipantClaimDto {
            id: "ann".to_string(),
            name: "  ".to_string(),
            role: "civilian".to_string(),
        };

        // when (操作):
        let result: Result<LoginClaim, _> = dto_claim.try_into();

        // then (期待する結果):
        assert_eq!(result, Err(DomainError::InvalidDisplayName));
    }

    #[test]
    fn test_participant_view_to_dto() {
        // テスト項目: 投影済みの参加者ビューが DTO に変換される
        // given (前提条件):
        let view = ParticipantView {
            id: ParticipantId::new("ann".to_string()).unwrap(),
            name: "Participant ann".to_string(),
            role: RoleLabel::Hidden,
            alive: true,
            connected: false,
            color: Color::Black,
        };

        // when (操作):
        let dto_view: dto::ParticipantViewDto = view.into();

        // then (期待する結果):
        assert_eq!(dto_view.id, "ann");
        assert_eq!(dto_view.name, "Participant ann");
        assert_eq!(dto_view.role, "participant");
        assert_eq!(dto_view.color, "black");
        assert!(!dto_view.connected);
    }

    #[test]
    fn test_message_view_to_dto() {
        // テスト項目: 投影済みのメッセージビューが DTO に変換される
        // given (前提条件):
        let view = MessageView {
            sender_id: ParticipantId::new("ann".to_string()).unwrap(),
            sender_name: "Ann".to_string(),
            text: MessageText::new("hello".to_string()).unwrap(),
            channel: Channel::Role,
            sent_at: Timestamp::new(1000),
            color: Some(Color::Red),
        };

        // when (操作):
        let dto_view: dto::MessageViewDto = view.into();

        // then (期待する結果):
        assert_eq!(dto_view.sender_name, "Ann");
        assert_eq!(dto_view.sent_at, 1000);
        assert_eq!(dto_view.color, Some("red".to_string()));
    }

    #[test]
    fn test_room_projection_to_snapshot_dto() {
        // テスト項目: ルーム投影のチャンネルがソート済みマップに変換される
        // given (前提条件):
        let projection = RoomProjection {
            room_id: RoomId::new("org-1".to_string()).unwrap(),
            participants: Vec::new(),
            channels: vec![
                (Channel::General, Vec::new()),
                (Channel::Role, Vec::new()),
                (Channel::Organizer, Vec::new()),
            ],
        };

        // when (操作):
        let snapshot: dto::RoomSnapshotDto = projection.into();

        // then (期待する結果): キーは辞書順
        let keys: Vec<&str> = snapshot.channels.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["general", "organizer", "role"]);
    }
}
