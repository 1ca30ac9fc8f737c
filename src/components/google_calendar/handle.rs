use super::actor::GoogleCalendarActorHandle;
use super::models::CalendarEvent;
use crate::config::Config;
use crate::error::BotResult;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Handle for interacting with the Google Calendar actor
#[derive(Clone)]
pub struct GoogleCalendarHandle {
    actor_handle: GoogleCalendarActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl GoogleCalendarHandle {
    /// Create a new GoogleCalendarHandle and spawn the actor
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        use super::actor::GoogleCalendarActor;

        // Create the actor and get its handle
        let (mut actor, handle) = GoogleCalendarActor::new(config);

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Create an event in the calendar
    pub async fn create_event(
        &self,
        summary: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BotResult<CalendarEvent> {
        self.actor_handle.create_event(summary, start, end).await
    }

    /// List events within a UTC range, ordered by start time
    pub async fn list_events(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> BotResult<Vec<CalendarEvent>> {
        self.actor_handle.list_events(range_start, range_end).await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> BotResult<()> {
        self.actor_handle.shutdown().await
    }
}
