use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, instrument, warn};

use bot_line_log::env::debug_from_env;
use bot_line_log::init_logger;

/// Stand-in for an incoming chat update; the real bot client is not needed
/// to see what its handlers log.
#[derive(Debug)]
struct Update {
    user_id: i64,
    chat_id: i64,
    first_name: &'static str,
    text: &'static str,
}

#[instrument(skip(update))]
async fn hello(update: &Update) -> Result<String, String> {
    info!(
        user_id = update.user_id,
        chat_id = update.chat_id,
        command = "hello",
        "Command received"
    );
    debug!(update = ?update, "full update");

    // Simulated round-trip to the bot API.
    sleep(Duration::from_millis(20)).await;

    if update.chat_id == 0 {
        error!(chat_id = update.chat_id, "Error sending hello message");
        return Err("chat not found".to_string());
    }
    Ok(format!("Hello {}! Nice to meet you!", update.first_name))
}

#[tokio::main]
async fn main() {
    if let Err(e) = init_logger(debug_from_env()) {
        eprintln!("failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Hello module loaded successfully");

    let updates = [
        Update { user_id: 123, chat_id: -456, first_name: "Ada", text: "/hello" },
        Update { user_id: 77, chat_id: 0, first_name: "Lin", text: "/hello" },
        Update { user_id: 5, chat_id: 5, first_name: "Bo", text: "/start" },
    ];

    for update in &updates {
        if update.text != "/hello" {
            warn!(command = update.text, user_id = update.user_id, "unknown command");
            continue;
        }
        match hello(update).await {
            Ok(reply) => info!(chat_id = update.chat_id, reply = %reply, "reply sent"),
            Err(reason) => warn!(chat_id = update.chat_id, reason = %reason, "handler failed"),
        }
    }
}
