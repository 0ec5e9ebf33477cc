//! Infrastructure 層
//!
//! Domain 層が定義する trait（Repository / MessagePusher）の具体的な実装と、
//! ワイヤ表現（DTO）を提供します。

pub mod dto;
pub mod message_pusher;
pub mod repository;
