use super::models::{ApiResponse, Update};
use crate::config::Config;
use crate::error::{telegram_error, BotResult};
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::info;

/// Seconds the getUpdates call blocks server-side before returning empty
const LONG_POLL_TIMEOUT_SECS: u32 = 30;

/// The Telegram actor that processes messages
pub struct TelegramActor {
    config: Arc<RwLock<Config>>,
    client: Client,
    command_rx: mpsc::Receiver<TelegramCommand>,
}

/// Commands that can be sent to the Telegram actor
pub enum TelegramCommand {
    SendMessage {
        chat_id: i64,
        text: String,
        response_tx: mpsc::Sender<BotResult<()>>,
    },
    GetUpdates {
        offset: i64,
        response_tx: mpsc::Sender<BotResult<Vec<Update>>>,
    },
    Shutdown,
}

/// Handle for communicating with the Telegram actor
#[derive(Clone)]
pub struct TelegramActorHandle {
    command_tx: mpsc::Sender<TelegramCommand>,
}

impl TelegramActorHandle {
    /// Send a Markdown message to a chat
    pub async fn send_message(&self, chat_id: i64, text: &str) -> BotResult<()> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(TelegramCommand::SendMessage {
                chat_id,
                text: text.to_string(),
                response_tx,
            })
            .await
            .map_err(|e| telegram_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| telegram_error("Response channel closed"))?
    }

    /// Long-poll for new updates past the given offset
    pub async fn get_updates(&self, offset: i64) -> BotResult<Vec<Update>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(TelegramCommand::GetUpdates {
                offset,
                response_tx,
            })
            .await
            .map_err(|e| telegram_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| telegram_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> BotResult<()> {
        let _ = self.command_tx.send(TelegramCommand::Shutdown).await;
        Ok(())
    }
}

impl TelegramActor {
    /// Create a new actor and return its handle
    pub fn new(config: Arc<RwLock<Config>>) -> (Self, TelegramActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            config,
            client: Client::new(),
            command_rx,
        };

        let handle = TelegramActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Telegram actor started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                TelegramCommand::SendMessage {
                    chat_id,
                    text,
                    response_tx,
                } => {
                    let result = self.send_message(chat_id, &text).await;
                    let _ = response_tx.send(result).await;
                }
                TelegramCommand::GetUpdates {
                    offset,
                    response_tx,
                } => {
                    let result = self.get_updates(offset).await;
                    let _ = response_tx.send(result).await;
                }
                TelegramCommand::Shutdown => {
                    info!("Telegram actor shutting down");
                    break;
                }
            }
        }

        info!("Telegram actor shut down");
    }

    async fn api_url(&self, method: &str) -> String {
        let token = {
            let config_read = self.config.read().await;
            config_read.telegram_bot_token.clone()
        };
        format!("https://api.telegram.org/bot{}/{}", token, method)
    }

    /// Post a message with Markdown formatting enabled
    async fn send_message(&self, chat_id: i64, text: &str) -> BotResult<()> {
        let url = self.api_url("sendMessage").await;

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "chat_id": chat_id,
                "text": text,
                "parse_mode": "Markdown",
            }))
            .send()
            .await
            .map_err(|e| telegram_error(&format!("Failed to send message: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(telegram_error(&format!(
                "Failed to send message: HTTP {} - {}",
                status, error_body
            )));
        }

        Ok(())
    }

    async fn get_updates(&self, offset: i64) -> BotResult<Vec<Update>> {
        let url = self.api_url("getUpdates").await;

        let response = self
            .client
            .get(&url)
            .query(&[
                ("timeout", LONG_POLL_TIMEOUT_SECS.to_string()),
                ("offset", offset.to_string()),
            ])
            .send()
            .await
            .map_err(|e| telegram_error(&format!("Failed to fetch updates: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(telegram_error(&format!(
                "Failed to fetch updates: HTTP {} - {}",
                status, error_body
            )));
        }

        let response_data: ApiResponse<Vec<Update>> = response
            .json()
            .await
            .map_err(|e| telegram_error(&format!("Failed to parse updates response: {}", e)))?;

        if !response_data.ok {
            return Err(telegram_error(&format!(
                "getUpdates rejected: {}",
                response_data
                    .description
                    .unwrap_or_else(|| "no description".to_string())
            )));
        }

        Ok(response_data.result.unwrap_or_default())
    }
}
