use crate::config::Config;
use crate::error::{google_calendar_error, BotResult};
use chrono::Utc;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Seconds before expiry at which a cached token is refreshed anyway
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: i64,
}

/// Exchanges the configured refresh token for access tokens and caches
/// them in memory until shortly before expiry.
#[derive(Clone)]
pub struct TokenManager {
    config: Arc<RwLock<Config>>,
    client: Client,
    cached: Arc<RwLock<Option<CachedToken>>>,
}

impl TokenManager {
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        Self {
            config,
            client: Client::new(),
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Get a valid access token, refreshing if the cached one is stale
    pub async fn access_token(&self) -> BotResult<String> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = &*cached {
                if token.expires_at > Utc::now().timestamp() + EXPIRY_MARGIN_SECS {
                    return Ok(token.access_token.clone());
                }
            }
        }

        self.refresh().await
    }

    /// Refresh the access token using the configured refresh token
    async fn refresh(&self) -> BotResult<String> {
        let (client_id, client_secret, refresh_token) = {
            let config_read = self.config.read().await;
            (
                config_read.google_client_id.clone(),
                config_read.google_client_secret.clone(),
                config_read.google_refresh_token.clone(),
            )
        };

        let params = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token".to_string()),
        ];

        let response = self
            .client
            .post("https://oauth2.googleapis.com/token")
            .form(&params)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let new_token: serde_json::Value = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse token response: {}", e)))?;

        let access_token = new_token
            .get("access_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                google_calendar_error("Token response missing 'access_token' field")
            })?
            .to_string();

        // Calculate expiry
        let expires_in = new_token
            .get("expires_in")
            .and_then(|v| v.as_i64())
            .unwrap_or(3600);
        let expires_at = Utc::now().timestamp() + expires_in;

        let mut cached = self.cached.write().await;
        *cached = Some(CachedToken {
            access_token: access_token.clone(),
            expires_at,
        });

        Ok(access_token)
    }
}
