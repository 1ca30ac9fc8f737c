use crate::error::{config_error, env_error, BotResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use toml;

/// Default timezone for all date/time handling
pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";

/// Default time of day for the daily agenda notification
pub const DEFAULT_DAILY_NOTIFICATION_TIME: &str = "07:00";

/// Main configuration structure for the bot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Telegram bot token
    pub telegram_bot_token: String,
    /// Telegram chat ID to send agenda notifications
    pub telegram_chat_id: i64,
    /// Google Calendar API client ID
    pub google_client_id: String,
    /// Google Calendar API client secret
    pub google_client_secret: String,
    /// Google Calendar OAuth refresh token
    pub google_refresh_token: String,
    /// Google Calendar ID to schedule into
    pub google_calendar_id: String,
    /// Map of component names to their enabled status
    pub components: HashMap<String, bool>,
    /// Timezone for scheduling
    pub timezone: String,
    /// Time of day (HH:MM) for the daily agenda notification
    pub daily_notification_time: String,
    /// Locale for user-visible messages
    pub bot_locale: String,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> BotResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let telegram_bot_token =
            env::var("TELEGRAM_BOT_TOKEN").map_err(|_| env_error("TELEGRAM_BOT_TOKEN"))?;
        let google_client_id =
            env::var("GOOGLE_CLIENT_ID").map_err(|_| env_error("GOOGLE_CLIENT_ID"))?;
        let google_client_secret =
            env::var("GOOGLE_CLIENT_SECRET").map_err(|_| env_error("GOOGLE_CLIENT_SECRET"))?;
        let google_refresh_token =
            env::var("GOOGLE_REFRESH_TOKEN").map_err(|_| env_error("GOOGLE_REFRESH_TOKEN"))?;

        // Parse numeric values
        let telegram_chat_id = env::var("TELEGRAM_CHAT_ID")
            .map_err(|_| env_error("TELEGRAM_CHAT_ID"))?
            .parse::<i64>()
            .map_err(|_| env_error("Invalid TELEGRAM_CHAT_ID format"))?;

        // Calendar to write into; "primary" is the authorized account's default
        let google_calendar_id =
            env::var("GOOGLE_CALENDAR_ID").unwrap_or_else(|_| String::from("primary"));

        // Default timezone
        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| String::from(DEFAULT_TIMEZONE));

        let daily_notification_time = env::var("DAILY_NOTIFICATION_TIME")
            .unwrap_or_else(|_| String::from(DEFAULT_DAILY_NOTIFICATION_TIME));

        let bot_locale = env::var("BOT_LOCALE").unwrap_or_else(|_| String::from("pt-BR"));

        // Initialize default components
        let mut components = HashMap::new();
        components.insert("google_calendar".to_string(), true);

        // Load components configuration from file if it exists
        if let Ok(content) = fs::read_to_string("config/components.toml") {
            if let Ok(file_components) = toml::from_str::<HashMap<String, bool>>(&content) {
                // Merge with defaults
                for (key, value) in file_components {
                    components.insert(key, value);
                }
            }
        }

        Ok(Config {
            telegram_bot_token,
            telegram_chat_id,
            google_client_id,
            google_client_secret,
            google_refresh_token,
            google_calendar_id,
            components,
            timezone,
            daily_notification_time,
            bot_locale,
        })
    }

    /// Check if a component is enabled
    pub fn is_component_enabled(&self, name: &str) -> bool {
        *self.components.get(name).unwrap_or(&false)
    }

    /// Parse the configured timezone identifier
    pub fn tz(&self) -> BotResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Invalid timezone: {}", self.timezone)))
    }
}
