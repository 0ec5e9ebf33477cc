//! Client execution logic with reconnection support.

use std::time::Duration;

use super::{domain::should_exit_immediately, error::ClientError, session::run_client_session};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Connection parameters for one client.
///
/// 参加者 ID は再接続をまたいで同じものを使います。サーバはこの ID で
/// 参加者レコードを引き当てるため、再接続は再参加として扱われます。
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket server URL
    pub url: String,
    /// Room to join (the organizer's participant ID)
    pub room_id: String,
    /// Stable participant ID
    pub participant_id: String,
    /// Display name
    pub name: String,
    /// Role field of the login claim (the server assigns actual roles)
    pub role: String,
}

/// Run the WebSocket client with reconnection logic
pub async fn run_client(config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            config.url,
            config.participant_id,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&config).await {
            Ok(_) => {
                tracing::info!("Client session ended normally");
                // If connection ended normally (user exit), don't reconnect
                break;
            }
            Err(e) => {
                // Check if it's an error that retrying cannot fix
                if let Some(client_err) = e.downcast_ref::<ClientError>()
                    && should_exit_immediately(client_err)
                {
                    tracing::error!("{}", e);
                    tracing::error!(
                        "Login to room '{}' was rejected by the server. Exiting.",
                        config.room_id
                    );
                    std::process::exit(1);
                }

                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if reconnect_count >= MAX_RECONNECT_ATTEMPTS {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    std::process::exit(1);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}
