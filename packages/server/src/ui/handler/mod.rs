//! HTTP / WebSocket endpoint handlers.

mod http;
mod websocket;

pub use http::{debug_room_state, get_room_detail, get_rooms, health_check};
pub use websocket::websocket_handler;
