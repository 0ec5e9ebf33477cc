//! ルーム内の全コネクションへの配信処理
//!
//! 参加者リストの更新とメッセージの配信は、受信者毎に内容の異なる
//! ペイロードになります（役職に応じた匿名化のため）。そのためテンプレの
//! JSON を一度だけ作って配る方式は使えず、コネクション毎に投影を計算して
//! 個別に送信します。
//!
//! ## 設計ノート
//!
//! ペイロードは受信者が決まるまで組み立てられないため、この module は
//! UseCase 層にありながらワイヤ表現（Infrastructure 層の DTO）に依存します。
//! UI 層で JSON を組み立てて UseCase に渡す構成も検討しましたが、
//! 受信者毎のループが UI 層に漏れる方が見通しが悪いと判断しました。
//!
//! 配信は到達保証なしです。個別の送信失敗は警告ログに残して続行します。

use crate::domain::{
    MessagePusher, RepositoryError, RoomId, RoomRepository, StoredMessage, build_personal_view,
    build_recipient_variant,
};
use crate::infrastructure::dto::websocket::{NewMessageMessage, UpdateParticipantsMessage};

/// ルーム内の全コネクションに参加者リストの更新を配信
///
/// コネクション毎に、その持ち主の視点で投影した参加者リストを送ります。
///
/// # Returns
///
/// 送信に成功したコネクション数
pub(crate) async fn push_participant_views(
    repository: &dyn RoomRepository,
    pusher: &dyn MessagePusher,
    room_id: &RoomId,
) -> Result<usize, RepositoryError> {
    let participants = repository.get_participants(room_id).await?;
    let connections = pusher.room_connections(room_id).await;

    let mut delivered = 0;
    for (connection_id, participant_id) in connections {
        // コネクションの持ち主の視点で投影
        let Some(viewer) = participants.iter().find(|p| p.id == participant_id) else {
            tracing::warn!(
                "Connection '{}' is bound to unknown participant '{}', skipping",
                connection_id,
                participant_id
            );
            continue;
        };

        let views = build_personal_view(viewer, &participants);
        let message = UpdateParticipantsMessage::from_views(views);
        let json = serde_json::to_string(&message).unwrap();

        // 配信では一部の送信失敗を許容
        if let Err(e) = pusher.push_to(&connection_id, &json).await {
            tracing::warn!("Failed to push participant views to '{}': {}", connection_id, e);
        } else {
            delivered += 1;
        }
    }

    Ok(delivered)
}

/// ルーム内の全コネクションにメッセージを配信
///
/// チャンネルに関わらずルームの全コネクションが宛先です。表示する
/// チャンネルの振り分けはクライアント側の責務です。コネクション毎に
/// 受信者の役職に応じたバリアントを計算して送ります。
///
/// # Returns
///
/// 送信に成功したコネクション数
pub(crate) async fn push_message_variants(
    repository: &dyn RoomRepository,
    pusher: &dyn MessagePusher,
    room_id: &RoomId,
    message: &StoredMessage,
) -> Result<usize, RepositoryError> {
    let participants = repository.get_participants(room_id).await?;
    let sender_role = participants
        .iter()
        .find(|p| p.id == message.sender_id)
        .map(|p| p.role);

    let mut delivered = 0;
    for (connection_id, participant_id) in pusher.room_connections(room_id).await {
        let Some(recipient) = participants.iter().find(|p| p.id == participant_id) else {
            tracing::warn!(
                "Connection '{}' is bound to unknown participant '{}', skipping",
                connection_id,
                participant_id
            );
            continue;
        };

        let variant = build_recipient_variant(message, sender_role, recipient);
        let envelope = NewMessageMessage::from_view(variant);
        let json = serde_json::to_string(&envelope).unwrap();

        if let Err(e) = pusher.push_to(&connection_id, &json).await {
            tracing::warn!("Failed to push message to '{}': {}", connection_id, e);
        } else {
            delivered += 1;
        }
    }

    Ok(delivered)
}
