use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{sleep, Duration as TokioDuration};
use tracing::{error, info};

use super::handle::GoogleCalendarHandle;
use super::notifications::send_daily_agenda;
use super::time::next_notification_time;
use crate::components::telegram::TelegramHandle;
use crate::config::Config;

/// Start the daily agenda notification scheduler
pub async fn start_scheduler(
    telegram: TelegramHandle,
    config: Arc<RwLock<Config>>,
    handle: GoogleCalendarHandle,
) {
    let (daily_time, chat_id, tz) = {
        let config_read = config.read().await;
        let tz = match config_read.tz() {
            Ok(tz) => tz,
            Err(e) => {
                error!("Scheduler disabled: {}", e);
                return;
            }
        };
        (
            config_read.daily_notification_time.clone(),
            config_read.telegram_chat_id,
            tz,
        )
    };

    tokio::spawn(async move {
        loop {
            let now = Utc::now();
            let next = match next_notification_time(now, &daily_time, tz) {
                Ok(time) => time,
                Err(e) => {
                    error!("Failed to calculate next notification time: {}", e);
                    sleep(TokioDuration::from_secs(3600)).await; // Retry in an hour
                    continue;
                }
            };

            let wait_seconds = (next - now).num_seconds().max(0) as u64;
            info!(
                "Next agenda notification scheduled for {}",
                next.with_timezone(&tz)
            );
            sleep(TokioDuration::from_secs(wait_seconds)).await;

            // Periodic flow: failures are logged, never surfaced to the chat
            if let Err(e) = send_daily_agenda(&telegram, &handle, chat_id, tz).await {
                error!("Failed to send daily agenda: {}", e);
            }
        }
    });
}
