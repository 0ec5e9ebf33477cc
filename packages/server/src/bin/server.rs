//! Game coordination server for Mafia-style social deduction games.
//!
//! Accepts WebSocket logins into rooms keyed by the organizer, projects
//! participant state per viewer and routes channel messages per recipient.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin omerta-server
//! cargo run --bin omerta-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use omerta_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::Server,
    usecase::{
        AssignRoleUseCase, DisconnectParticipantUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
        LoginParticipantUseCase, SendMessageUseCase,
    },
};
use omerta_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Coordination server for Mafia-style deduction games", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. Clock
    // 4. UseCases
    // 5. Server

    // 1. Create Repository (in-memory, rooms are created on first login)
    let repository = Arc::new(InMemoryRoomRepository::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create Clock (JST system time)
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // 4. Create UseCases
    let login_participant_usecase = Arc::new(LoginParticipantUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let assign_role_usecase = Arc::new(AssignRoleUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(repository.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(repository.clone()));

    // 5. Create and run the server
    let server = Server::new(
        login_participant_usecase,
        disconnect_participant_usecase,
        send_message_usecase,
        assign_role_usecase,
        get_rooms_usecase,
        get_room_detail_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
