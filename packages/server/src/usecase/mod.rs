//! UseCase 層
//!
//! Domain 層のモデルを組み合わせてアプリケーションの操作を実装します。
//! Repository / MessagePusher の trait にのみ依存し、具体的な実装は
//! 起動時に注入されます。

mod assign_role;
mod disconnect_participant;
mod dispatch;
mod error;
mod get_room_detail;
mod get_rooms;
mod login_participant;
mod send_message;

pub use assign_role::AssignRoleUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{
    AssignRoleError, DisconnectError, GetRoomDetailError, LoginError, SendMessageError,
};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use login_participant::LoginParticipantUseCase;
pub use send_message::SendMessageUseCase;
