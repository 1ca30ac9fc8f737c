use crate::components::google_calendar::{notifications, GoogleCalendar};
use crate::components::telegram::{listener, TelegramHandle};
use crate::components::ComponentManager;
use crate::config::Config;
use crate::error::Error;
use crate::shutdown;
use std::sync::Arc;
use tokio::sync::{oneshot, RwLock};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub async fn load_config() -> miette::Result<Arc<RwLock<Config>>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(RwLock::new(config))),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Initialize and start the bot
pub async fn start_bot(config: Arc<RwLock<Config>>) -> miette::Result<()> {
    // Set locale and validate the configured timezone up front
    let (chat_id, tz) = {
        let config_read = config.read().await;
        rust_i18n::set_locale(&config_read.bot_locale);
        info!("Setting locale to {}", config_read.bot_locale);
        (config_read.telegram_chat_id, config_read.tz()?)
    };

    // Spawn the Telegram transport actor
    let telegram = TelegramHandle::new(Arc::clone(&config));

    // Initialize component manager
    let mut component_manager = ComponentManager::new(Arc::clone(&config));

    // Register Google Calendar component
    component_manager.register(GoogleCalendar::new());

    // Create a shared component manager
    let component_manager = Arc::new(component_manager);

    // Create shutdown channel
    let (shutdown_send, shutdown_recv) = oneshot::channel();

    // Spawn signal handler task
    {
        let shutdown_components = Arc::clone(&component_manager);
        let shutdown_telegram = telegram.clone();
        tokio::spawn(async move {
            shutdown::handle_signals(shutdown_send, shutdown_components, shutdown_telegram).await;
        });
    }

    // Initialize components (this also starts the daily agenda scheduler)
    if let Err(e) = component_manager
        .init_all(telegram.clone(), Arc::clone(&config))
        .await
    {
        error!("Failed to initialize components: {:?}", e);
    }

    // Get the calendar handle from the component, or fall back to a
    // standalone one so commands keep working either way
    let calendar = match component_manager
        .get_component_by_name("google_calendar")
        .and_then(|component| component.as_any().downcast_ref::<GoogleCalendar>())
    {
        Some(calendar_component) => match calendar_component.get_handle().await {
            Some(handle) => handle,
            None => {
                tracing::debug!("No handle in Google Calendar component, creating new one");
                crate::components::GoogleCalendarHandle::new(Arc::clone(&config))
            }
        },
        None => {
            tracing::debug!("Google Calendar component not found, creating standalone handle");
            crate::components::GoogleCalendarHandle::new(Arc::clone(&config))
        }
    };

    // One-shot agenda check at launch
    match notifications::send_daily_agenda(&telegram, &calendar, chat_id, tz).await {
        Ok(()) => info!("Calendar check completed and notification sent"),
        Err(e) => error!("Startup calendar check failed: {}", e),
    }

    info!("Bot started. Listening for commands...");

    // Run the update listener until a shutdown signal arrives
    let listener_task = tokio::spawn(listener::run_listener(
        telegram.clone(),
        calendar,
        Arc::clone(&config),
    ));

    tokio::select! {
        result = listener_task => {
            info!("Listener task ended");
            result.map_err(|e| Error::Other(format!("Listener task error: {}", e)))?;
            Ok(())
        }
        _ = shutdown_recv => {
            info!("Received shutdown signal, shutting down bot...");
            Ok(())
        }
    }
}
