use super::models::CalendarEvent;
use super::token::TokenManager;
use crate::config::Config;
use crate::error::{google_calendar_error, BotResult};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::info;
use url::Url;

/// The Google Calendar actor that processes messages
pub struct GoogleCalendarActor {
    config: Arc<RwLock<Config>>,
    token_manager: TokenManager,
    client: Client,
    command_rx: mpsc::Receiver<GoogleCalendarCommand>,
}

/// Commands that can be sent to the Google Calendar actor
pub enum GoogleCalendarCommand {
    CreateEvent {
        summary: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        response_tx: mpsc::Sender<BotResult<CalendarEvent>>,
    },
    ListEvents {
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        response_tx: mpsc::Sender<BotResult<Vec<CalendarEvent>>>,
    },
    Shutdown,
}

/// Handle for communicating with the Google Calendar actor
#[derive(Clone)]
pub struct GoogleCalendarActorHandle {
    command_tx: mpsc::Sender<GoogleCalendarCommand>,
}

impl GoogleCalendarActorHandle {
    /// Create an event in the calendar
    pub async fn create_event(
        &self,
        summary: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BotResult<CalendarEvent> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(GoogleCalendarCommand::CreateEvent {
                summary: summary.to_string(),
                start,
                end,
                response_tx,
            })
            .await
            .map_err(|e| google_calendar_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| google_calendar_error("Response channel closed"))?
    }

    /// List events within a UTC range, ordered by start time
    pub async fn list_events(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> BotResult<Vec<CalendarEvent>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(GoogleCalendarCommand::ListEvents {
                range_start,
                range_end,
                response_tx,
            })
            .await
            .map_err(|e| google_calendar_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| google_calendar_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> BotResult<()> {
        let _ = self.command_tx.send(GoogleCalendarCommand::Shutdown).await;
        Ok(())
    }
}

impl GoogleCalendarActor {
    /// Create a new actor and return its handle
    pub fn new(config: Arc<RwLock<Config>>) -> (Self, GoogleCalendarActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            config: Arc::clone(&config),
            token_manager: TokenManager::new(config),
            client: Client::new(),
            command_rx,
        };

        let handle = GoogleCalendarActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Google Calendar actor started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                GoogleCalendarCommand::CreateEvent {
                    summary,
                    start,
                    end,
                    response_tx,
                } => {
                    let result = self.create_event(&summary, start, end).await;
                    let _ = response_tx.send(result).await;
                }
                GoogleCalendarCommand::ListEvents {
                    range_start,
                    range_end,
                    response_tx,
                } => {
                    let result = self.list_events(range_start, range_end).await;
                    let _ = response_tx.send(result).await;
                }
                GoogleCalendarCommand::Shutdown => {
                    info!("Google Calendar actor shutting down");
                    break;
                }
            }
        }

        info!("Google Calendar actor shut down");
    }

    async fn calendar_url(&self) -> BotResult<Url> {
        let calendar_id = {
            let config_read = self.config.read().await;
            config_read.google_calendar_id.clone()
        };

        let url_str = format!(
            "https://www.googleapis.com/calendar/v3/calendars/{}/events",
            calendar_id
        );

        Url::parse(&url_str)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))
    }

    /// Insert an event; the backend echoes it back with its id and link
    async fn create_event(
        &self,
        summary: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BotResult<CalendarEvent> {
        let timezone = {
            let config_read = self.config.read().await;
            config_read.timezone.clone()
        };

        let url = self.calendar_url().await?;
        let access_token = self.token_manager.access_token().await?;

        let body = json!({
            "summary": summary,
            "start": {
                "dateTime": start.to_rfc3339(),
                "timeZone": timezone,
            },
            "end": {
                "dateTime": end.to_rfc3339(),
                "timeZone": timezone,
            },
        });

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", access_token))
            .json(&body)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to create event: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to create event: HTTP {} - {}",
                status, error_body
            )));
        }

        let response_data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse event response: {}", e)))?;

        Ok(parse_event(&response_data))
    }

    /// List events within a UTC range, expanded and ordered by start time
    async fn list_events(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> BotResult<Vec<CalendarEvent>> {
        let mut url = self.calendar_url().await?;
        let access_token = self.token_manager.access_token().await?;

        url.query_pairs_mut()
            .append_pair("timeMin", &range_start.to_rfc3339())
            .append_pair("timeMax", &range_end.to_rfc3339())
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime");

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to fetch events: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to fetch events: HTTP {} - {}",
                status, error_body
            )));
        }

        let response_data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse events response: {}", e)))?;

        // Parse events from response
        let events = response_data
            .get("items")
            .and_then(|i| i.as_array())
            .ok_or_else(|| google_calendar_error("No items in response"))?;

        Ok(events.iter().map(parse_event).collect())
    }
}

/// Convert a raw API event object into a CalendarEvent
fn parse_event(event: &serde_json::Value) -> CalendarEvent {
    let id = event
        .get("id")
        .and_then(|id| id.as_str())
        .unwrap_or("")
        .to_string();
    let summary = event
        .get("summary")
        .and_then(|s| s.as_str())
        .map(|s| s.to_string());
    let location = event
        .get("location")
        .and_then(|s| s.as_str())
        .map(|s| s.to_string());
    let html_link = event
        .get("htmlLink")
        .and_then(|s| s.as_str())
        .map(|s| s.to_string());

    let start_date_time = event
        .get("start")
        .and_then(|start| start.get("dateTime"))
        .and_then(|dt| dt.as_str())
        .map(|s| s.to_string());

    let start_date = event
        .get("start")
        .and_then(|start| start.get("date"))
        .and_then(|d| d.as_str())
        .map(|s| s.to_string());

    let end_date_time = event
        .get("end")
        .and_then(|end| end.get("dateTime"))
        .and_then(|dt| dt.as_str())
        .map(|s| s.to_string());

    let end_date = event
        .get("end")
        .and_then(|end| end.get("date"))
        .and_then(|d| d.as_str())
        .map(|s| s.to_string());

    CalendarEvent {
        id,
        summary,
        location,
        start_date_time,
        start_date,
        end_date_time,
        end_date,
        html_link,
    }
}
