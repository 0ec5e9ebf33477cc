//! CLI client for Mafia-style game rooms with reconnection support.
//!
//! Connects to a coordination server, logs in to a room and renders the
//! role-filtered view the server projects for this participant. Plain lines
//! go to the general channel, `/role <text>` and `/org <text>` to the role
//! and organizer channels, `/assign <participant-id> <role>` changes a role
//! (organizer only). The organizer is the participant whose id matches the
//! room id; everyone else joins as a civilian until the organizer assigns
//! their role.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//! Rejected logins (full room, invalid claim) exit immediately.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin omerta-client -- -r gm-1 -i gm-1 -n GM
//! cargo run --bin omerta-client -- -r gm-1 -i ann -n Ann
//! ```

use clap::Parser;

use omerta_client::{ClientConfig, run_client};
use omerta_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "CLI client for Mafia-style game rooms", long_about = None)]
struct Args {
    /// Room ID to join (the organizer's participant ID)
    #[arg(short = 'r', long)]
    room_id: String,

    /// Participant ID (keep it stable across reconnects)
    #[arg(short = 'i', long)]
    participant_id: String,

    /// Display name shown to yourself and the organizer
    #[arg(short = 'n', long)]
    name: String,

    /// Role field of the login claim (roles are assigned in-game by the organizer)
    #[arg(short = 'R', long, default_value = "civilian")]
    role: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let config = ClientConfig {
        url: args.url,
        room_id: args.room_id,
        participant_id: args.participant_id,
        name: args.name,
        role: args.role,
    };

    // Run the client
    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
