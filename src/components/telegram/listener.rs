use super::TelegramHandle;
use crate::commands;
use crate::components::google_calendar::GoogleCalendarHandle;
use crate::config::Config;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{sleep, Duration as TokioDuration};
use tracing::{debug, error};

/// Seconds to back off after a failed getUpdates call
const POLL_RETRY_SECS: u64 = 5;

/// Long-poll Telegram for updates and dispatch command messages.
///
/// Each command is handled to completion before the next update is
/// processed. Transport failures back off briefly and resume.
pub async fn run_listener(
    telegram: TelegramHandle,
    calendar: GoogleCalendarHandle,
    config: Arc<RwLock<Config>>,
) {
    let mut offset: i64 = 0;

    loop {
        let updates = match telegram.get_updates(offset).await {
            Ok(updates) => updates,
            Err(e) => {
                error!("Failed to fetch updates: {}", e);
                sleep(TokioDuration::from_secs(POLL_RETRY_SECS)).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);

            let Some(message) = update.message else {
                continue;
            };
            let Some(text) = message.text else {
                continue;
            };

            debug!("Received message from chat {}", message.chat.id);

            if let Err(e) =
                commands::dispatch(&text, message.chat.id, &telegram, &calendar, &config).await
            {
                error!("Error handling command: {}", e);
            }
        }
    }
}
