mod actor;
pub mod agenda;
mod handle;
pub mod models;
pub mod notifications;
mod scheduler;
pub mod time;
pub mod token;

pub use handle::GoogleCalendarHandle;
pub use models::CalendarEvent;

use crate::components::telegram::TelegramHandle;
use crate::config::Config;
use crate::error::BotResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use scheduler::start_scheduler;

/// Google Calendar component: scheduling backend plus the daily agenda push
#[derive(Default)]
pub struct GoogleCalendar {
    handle: RwLock<Option<GoogleCalendarHandle>>,
}

impl GoogleCalendar {
    /// Create a new Google Calendar component
    pub fn new() -> Self {
        Self {
            handle: RwLock::new(None),
        }
    }

    /// Get the handle if it exists
    pub async fn get_handle(&self) -> Option<GoogleCalendarHandle> {
        let handle_lock = self.handle.read().await;
        handle_lock.clone()
    }
}

#[async_trait]
impl super::Component for GoogleCalendar {
    fn name(&self) -> &'static str {
        "google_calendar"
    }

    async fn init(
        &self,
        telegram: TelegramHandle,
        config: Arc<RwLock<Config>>,
    ) -> BotResult<()> {
        // Create a new handle if one doesn't exist
        let mut handle_lock = self.handle.write().await;
        let handle = handle_lock
            .get_or_insert_with(|| GoogleCalendarHandle::new(config.clone()))
            .clone();

        // Start the daily agenda scheduler
        start_scheduler(telegram, config, handle).await;

        Ok(())
    }

    async fn shutdown(&self) -> BotResult<()> {
        // Shutdown the handle if it exists
        let handle_lock = self.handle.read().await;
        if let Some(handle) = &*handle_lock {
            handle.shutdown().await?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
