//! Repository の実装
//!
//! ドメイン層が定義する `RoomRepository` trait の具体的な実装を提供します。
//!
//! - `inmemory`: HashMap をインメモリ DB として使う実装
//! - 将来的に: `postgres` など

pub mod inmemory;

pub use inmemory::InMemoryRoomRepository;
