use crate::commands::parser::{parse_set_command, ParseError, ScheduleCommand};
use crate::commands::CommandResult;
use crate::components::google_calendar::time::normalize_event_time;
use crate::components::google_calendar::{notifications, GoogleCalendarHandle};
use crate::components::telegram::TelegramHandle;
use crate::config::Config;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_i18n::t;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, warn};

/// Build the localized confirmation message for a created event
pub fn confirmation_message(cmd: &ScheduleCommand, start_local: DateTime<Tz>, link: &str) -> String {
    t!(
        "event_created",
        name = cmd.name.as_str(),
        date = start_local.format("%d/%m/%Y").to_string(),
        time = start_local.format("%H:%M").to_string(),
        duration = cmd.duration_minutes.to_string(),
        link = link
    )
    .to_string()
}

/// Handle a `/set` command: parse, normalize, create the event, confirm,
/// and push today's agenda when the event lands on the current day.
///
/// Parse and backend failures are answered in chat; transport failures are
/// logged and dropped.
pub async fn run(
    args: &str,
    chat_id: i64,
    telegram: &TelegramHandle,
    calendar: &GoogleCalendarHandle,
    config: &Arc<RwLock<Config>>,
) -> CommandResult {
    let cmd = match parse_set_command(args) {
        Ok(cmd) => cmd,
        Err(reason) => {
            warn!("Rejected /set command ({}): {}", reason, args);
            let hint = match reason {
                ParseError::InvalidFormat => t!("usage_hint"),
                ParseError::InvalidDate => t!("invalid_date_hint"),
                ParseError::InvalidTime => t!("invalid_time_hint"),
            };
            if let Err(e) = telegram.send_message(chat_id, &hint).await {
                error!("Failed to send usage hint: {}", e);
            }
            return Ok(());
        }
    };

    let tz = {
        let config_read = config.read().await;
        config_read.tz()?
    };

    let now = Utc::now();
    let (start, end) = match normalize_event_time(
        cmd.day,
        cmd.month,
        cmd.hour,
        cmd.minute,
        cmd.duration_minutes,
        now,
        tz,
    ) {
        Ok(range) => range,
        Err(e) => {
            warn!("Could not normalize event time: {}", e);
            let message = t!("error_creating_event", error = e.to_string());
            if let Err(send_err) = telegram.send_message(chat_id, &message).await {
                error!("Failed to send error message: {}", send_err);
            }
            return Ok(());
        }
    };

    match calendar.create_event(&cmd.name, start, end).await {
        Ok(event) => {
            let start_local = start.with_timezone(&tz);
            let link = event.html_link.as_deref().unwrap_or("");
            let confirmation = confirmation_message(&cmd, start_local, link);
            if let Err(e) = telegram.send_message(chat_id, &confirmation).await {
                error!("Failed to send confirmation: {}", e);
            }

            // Same-day scheduling also pushes the day's agenda
            if start_local.date_naive() == now.with_timezone(&tz).date_naive() {
                if let Err(e) = telegram.send_message(chat_id, &t!("fetching_today")).await {
                    error!("Failed to send agenda preamble: {}", e);
                }
                match notifications::today_agenda_message(calendar, tz).await {
                    Ok(agenda) => {
                        if let Err(e) = telegram.send_message(chat_id, &agenda).await {
                            error!("Failed to send agenda: {}", e);
                        }
                    }
                    Err(e) => {
                        error!("Error fetching calendar events: {}", e);
                        let message = t!("error_fetching_events", error = e.to_string());
                        if let Err(send_err) = telegram.send_message(chat_id, &message).await {
                            error!("Failed to send error message: {}", send_err);
                        }
                    }
                }
            }
        }
        Err(e) => {
            error!("Error creating event: {}", e);
            let message = t!("error_creating_event", error = e.to_string());
            if let Err(send_err) = telegram.send_message(chat_id, &message).await {
                error!("Failed to send error message: {}", send_err);
            }
        }
    }

    Ok(())
}
