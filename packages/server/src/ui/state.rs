//! Server state shared across handlers.

use std::sync::Arc;

use crate::usecase::{
    AssignRoleUseCase, DisconnectParticipantUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
    LoginParticipantUseCase, SendMessageUseCase,
};

/// Shared application state
pub struct AppState {
    /// LoginParticipantUseCase（ログインのユースケース）
    pub login_participant_usecase: Arc<LoginParticipantUseCase>,
    /// DisconnectParticipantUseCase（切断処理のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// AssignRoleUseCase（役職変更のユースケース）
    pub assign_role_usecase: Arc<AssignRoleUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}
