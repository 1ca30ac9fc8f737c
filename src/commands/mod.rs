use crate::components::google_calendar::GoogleCalendarHandle;
use crate::components::telegram::TelegramHandle;
use crate::config::Config;
use crate::error::BotResult;
use std::sync::Arc;
use tokio::sync::RwLock;

// Export submodules
pub mod parser;
pub mod set_event;

/// Type alias for command result
pub type CommandResult = BotResult<()>;

/// Route an inbound chat message to its command handler.
///
/// Only `/set` is defined; everything else is ignored.
pub async fn dispatch(
    text: &str,
    chat_id: i64,
    telegram: &TelegramHandle,
    calendar: &GoogleCalendarHandle,
    config: &Arc<RwLock<Config>>,
) -> CommandResult {
    if let Some(args) = text.strip_prefix("/set ") {
        return set_event::run(args, chat_id, telegram, calendar, config).await;
    }

    Ok(())
}
