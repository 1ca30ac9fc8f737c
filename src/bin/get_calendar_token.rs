use agendabot::config::Config;
use agendabot::error::{other_error, BotResult};
use url::Url;

const REDIRECT_URI: &str = "http://localhost:8080";

/// Full calendar access is needed to insert events
const SCOPES: &str =
    "https://www.googleapis.com/auth/calendar https://www.googleapis.com/auth/calendar.events";

#[tokio::main]
async fn main() -> BotResult<()> {
    // Load configuration
    let config = Config::load()?;

    let client_id = config.google_client_id.clone();
    let client_secret = config.google_client_secret.clone();

    // Generate random state for security
    let state = uuid::Uuid::new_v4().to_string();

    // Construct authorization URL
    let mut auth_url = Url::parse("https://accounts.google.com/o/oauth2/v2/auth")
        .map_err(|e| other_error(&format!("Failed to build authorization URL: {}", e)))?;
    auth_url
        .query_pairs_mut()
        .append_pair("client_id", &client_id)
        .append_pair("redirect_uri", REDIRECT_URI)
        .append_pair("response_type", "code")
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent")
        .append_pair("scope", SCOPES)
        .append_pair("state", &state);

    // Open browser for authorization
    println!("Opening browser for Google Calendar authorization...");
    webbrowser::open(auth_url.as_str())?;

    // Start local server to receive the callback
    let server = tiny_http::Server::http("0.0.0.0:8080")
        .map_err(|e| other_error(&format!("Failed to start local server: {}", e)))?;
    println!("Waiting for authorization callback...");

    // Handle the callback
    let request = server.recv()?;
    let callback_url = request.url().to_string();

    // Parse the authorization code from the URL
    let code = callback_url
        .split("code=")
        .nth(1)
        .and_then(|s| s.split('&').next())
        .ok_or_else(|| other_error("No authorization code found in callback"))?;

    // Exchange code for tokens
    let client = reqwest::Client::new();

    let response = client
        .post("https://oauth2.googleapis.com/token")
        .form(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("code", code.to_string()),
            ("redirect_uri", REDIRECT_URI.to_string()),
            ("grant_type", "authorization_code".to_string()),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        let error_text = response.text().await?;
        return Err(other_error(&format!("Failed to get token: {}", error_text)));
    }

    let token_data: serde_json::Value = response.json().await?;

    let refresh_token = token_data
        .get("refresh_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| other_error("Token response missing 'refresh_token' field"))?;
    let access_token = token_data
        .get("access_token")
        .and_then(|v| v.as_str())
        .unwrap_or("");

    // Send success response to browser
    let response =
        tiny_http::Response::from_string("Authorization successful! You can close this window.");
    request.respond(response)?;

    println!("Refresh token: {}", refresh_token);
    println!("Access token: {}", access_token);
    println!("Set GOOGLE_REFRESH_TOKEN to the refresh token in your .env file.");

    Ok(())
}
