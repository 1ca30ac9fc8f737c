use super::actor::{TelegramActor, TelegramActorHandle};
use super::models::Update;
use crate::config::Config;
use crate::error::BotResult;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Handle for interacting with the Telegram actor
#[derive(Clone)]
pub struct TelegramHandle {
    actor_handle: TelegramActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl TelegramHandle {
    /// Create a new TelegramHandle and spawn the actor
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        // Create the actor and get its handle
        let (mut actor, handle) = TelegramActor::new(config);

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Send a Markdown message to a chat
    pub async fn send_message(&self, chat_id: i64, text: &str) -> BotResult<()> {
        self.actor_handle.send_message(chat_id, text).await
    }

    /// Long-poll for new updates past the given offset
    pub async fn get_updates(&self, offset: i64) -> BotResult<Vec<Update>> {
        self.actor_handle.get_updates(offset).await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> BotResult<()> {
        self.actor_handle.shutdown().await
    }
}
