use super::agenda::format_agenda;
use super::handle::GoogleCalendarHandle;
use super::time::day_bounds;
use crate::components::telegram::TelegramHandle;
use crate::error::BotResult;
use chrono::Utc;
use chrono_tz::Tz;

/// Build the agenda message for the current day in the given zone
pub async fn today_agenda_message(calendar: &GoogleCalendarHandle, tz: Tz) -> BotResult<String> {
    let now = Utc::now();
    let (range_start, range_end) = day_bounds(now, tz)?;

    let events = calendar.list_events(range_start, range_end).await?;

    let today = now.with_timezone(&tz).date_naive();
    Ok(format_agenda(&events, today, tz))
}

/// Send today's agenda to the configured chat
pub async fn send_daily_agenda(
    telegram: &TelegramHandle,
    calendar: &GoogleCalendarHandle,
    chat_id: i64,
    tz: Tz,
) -> BotResult<()> {
    let message = today_agenda_message(calendar, tz).await?;
    telegram.send_message(chat_id, &message).await
}
