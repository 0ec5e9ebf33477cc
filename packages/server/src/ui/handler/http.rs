//! HTTP API endpoint handlers.
//!
//! HTTP API は運営向けの入り口なので、WebSocket と違って閲覧者による
//! フィルタリングは行わず、ルームの真の状態をそのまま返します。

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::{Channel, Room},
    infrastructure::dto::http::{ParticipantDetailDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
};
use omerta_shared::time::timestamp_to_jst_rfc3339;

/// Debug endpoint to get raw room state (for testing purposes)
pub async fn debug_room_state(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<Room>, StatusCode> {
    match state.get_room_detail_usecase.execute(&room_id).await {
        Ok(room) => Ok(Json(room)),
        Err(_) => Err(StatusCode::NOT_FOUND),
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    let room_summaries: Vec<RoomSummaryDto> = rooms
        .into_iter()
        .map(|room| RoomSummaryDto {
            id: room.id.as_str().to_string(),
            participants: room
                .participants
                .iter()
                .map(|p| p.id.as_str().to_string())
                .collect(),
            created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
        })
        .collect();

    Json(room_summaries)
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(&room_id).await {
        Ok(room) => {
            // Domain Model から DTO への変換
            let message_counts = Channel::ALL
                .iter()
                .map(|&channel| (channel.as_str().to_string(), room.messages(channel).len()))
                .collect();
            let room_detail = RoomDetailDto {
                id: room.id.as_str().to_string(),
                participants: room
                    .participants
                    .iter()
                    .map(|p| ParticipantDetailDto {
                        id: p.id.as_str().to_string(),
                        name: p.name.as_str().to_string(),
                        role: p.role.as_str().to_string(),
                        alive: p.alive,
                        connected: p.connected,
                        joined_at: timestamp_to_jst_rfc3339(p.joined_at.value()),
                    })
                    .collect(),
                message_counts,
                created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
            };
            Ok(Json(room_detail))
        }
        Err(crate::usecase::GetRoomDetailError::RoomNotFound(_)) => Err(StatusCode::NOT_FOUND),
    }
}
