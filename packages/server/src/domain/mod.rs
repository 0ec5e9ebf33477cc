//! Domain 層
//!
//! ルーム・参加者・メッセージのモデルと、役職に応じた可視性の
//! 投影ルールを定義します。この層は他の層に依存しません。

mod entity;
mod error;
mod pusher;
mod repository;
mod routing;
mod session;
mod value_object;
mod visibility;

pub use entity::{
    DEFAULT_MESSAGE_CAPACITY, DEFAULT_PARTICIPANT_CAPACITY, JoinOutcome, LoginClaim, Participant,
    Room, StoredMessage,
};
pub use error::{DomainError, MessagePushError, RepositoryError};
pub use pusher::{MessagePusher, PusherChannel};
pub use repository::RoomRepository;
pub use routing::{MessageView, build_recipient_variant};
pub use session::{SessionBinding, SessionState};
pub use value_object::{
    Channel, Color, ConnectionId, DisplayName, MAX_ID_LENGTH, MAX_TEXT_LENGTH, MessageText,
    ParticipantId, Role, RoomId, Timestamp,
};
pub use visibility::{
    ParticipantView, RoleLabel, RoomProjection, anonymous_label, build_personal_view, project_room,
    view_of,
};

#[cfg(test)]
pub use pusher::MockMessagePusher;
