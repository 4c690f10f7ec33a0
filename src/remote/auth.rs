//! OAuth 2.0 installed-application flow for the Tasks API
//!
//! Loads the client secret from credentials.json, caches the bearer
//! token in token.json, refreshes it when expired, and falls back to the
//! interactive consent flow when no usable token exists.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Scope granting read/write access to the user's task lists.
const TASKS_SCOPE: &str = "https://www.googleapis.com/auth/tasks";

/// Where the bearer token is cached between runs.
const TOKEN_PATH: &str = "token.json";

/// Default client secret location when neither the flag nor
/// GOOGLE_APPLICATION_CREDENTIALS points elsewhere.
const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";

/// Out-of-band redirect for clients that register no redirect URI.
const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

#[derive(Debug, Clone, Deserialize)]
struct ClientSecret {
    client_id: String,
    client_secret: String,
    auth_uri: String,
    token_uri: String,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedToken {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expiry: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Usable as-is while the expiry is comfortably in the future.
    fn is_valid(&self) -> bool {
        match self.expiry {
            Some(expiry) => expiry > Utc::now() + Duration::seconds(60),
            None => !self.access_token.is_empty(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Obtain a bearer token for the Tasks API.
///
/// A cached, still-valid token is used directly; an expired one with a
/// refresh token is refreshed; otherwise the interactive consent flow
/// runs and the resulting token is cached for the next invocation.
pub async fn authenticate(credentials_path: Option<PathBuf>) -> Result<String> {
    let path = credentials_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_PATH));
    let secret = load_client_secret(&path)?;
    let http = reqwest::Client::new();

    if let Some(token) = load_cached_token(Path::new(TOKEN_PATH)) {
        if token.is_valid() {
            debug!("Using cached access token");
            return Ok(token.access_token);
        }
        if let Some(refresh_token) = token.refresh_token.clone() {
            debug!("Refreshing expired access token");
            let response = refresh(&http, &secret, &refresh_token).await?;
            let cached = into_cached(response, token.refresh_token);
            save_token(Path::new(TOKEN_PATH), &cached);
            return Ok(cached.access_token);
        }
    }

    let token = consent_flow(&http, &secret).await?;
    save_token(Path::new(TOKEN_PATH), &token);
    Ok(token.access_token)
}

fn load_client_secret(path: &Path) -> Result<ClientSecret> {
    let data = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Credentials file not found at {:?}. Please provide a valid OAuth 2.0 Client ID JSON file",
            path
        )
    })?;
    let file: ClientSecretFile = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse client secret file {:?}", path))?;
    file.installed
        .or(file.web)
        .context("Client secret file has neither an \"installed\" nor a \"web\" section")
}

fn load_cached_token(path: &Path) -> Option<CachedToken> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

fn save_token(path: &Path, token: &CachedToken) {
    debug!("Saving credential file to {:?}", path);
    let result = serde_json::to_string_pretty(token)
        .map_err(anyhow::Error::from)
        .and_then(|json| std::fs::write(path, json).map_err(Into::into));
    if let Err(err) = result {
        eprintln!("Warning: unable to cache oauth token: {err}");
    }
}

async fn refresh(
    http: &reqwest::Client,
    secret: &ClientSecret,
    refresh_token: &str,
) -> Result<TokenResponse> {
    let params = [
        ("client_id", secret.client_id.as_str()),
        ("client_secret", secret.client_secret.as_str()),
        ("refresh_token", refresh_token),
        ("grant_type", "refresh_token"),
    ];
    let response = http.post(&secret.token_uri).form(&params).send().await?;
    if !response.status().is_success() {
        bail!("Token refresh failed: HTTP {}", response.status());
    }
    response
        .json()
        .await
        .context("Failed to parse token refresh response")
}

async fn consent_flow(http: &reqwest::Client, secret: &ClientSecret) -> Result<CachedToken> {
    let redirect_uri = secret
        .redirect_uris
        .first()
        .map(String::as_str)
        .unwrap_or(OOB_REDIRECT_URI);

    let auth_url = reqwest::Url::parse_with_params(
        &secret.auth_uri,
        &[
            ("client_id", secret.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", TASKS_SCOPE),
            ("access_type", "offline"),
        ],
    )
    .context("Invalid auth_uri in client secret file")?;

    println!("Go to the following link in your browser then type the authorization code:\n{auth_url}");
    print!("Enter authorization code: ");
    io::stdout().flush()?;

    let mut code = String::new();
    io::stdin()
        .read_line(&mut code)
        .context("Unable to read authorization code")?;
    let code = code.trim();
    if code.is_empty() {
        bail!("No authorization code entered");
    }

    let params = [
        ("code", code),
        ("client_id", secret.client_id.as_str()),
        ("client_secret", secret.client_secret.as_str()),
        ("redirect_uri", redirect_uri),
        ("grant_type", "authorization_code"),
    ];
    let response = http.post(&secret.token_uri).form(&params).send().await?;
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        bail!("Unable to retrieve token from web: HTTP {status}: {body}");
    }
    let token: TokenResponse = response
        .json()
        .await
        .context("Failed to parse token exchange response")?;
    Ok(into_cached(token, None))
}

fn into_cached(response: TokenResponse, fallback_refresh: Option<String>) -> CachedToken {
    CachedToken {
        access_token: response.access_token,
        token_type: response.token_type,
        // A refresh response usually omits the refresh token; keep the
        // one we already had
        refresh_token: response.refresh_token.or(fallback_refresh),
        expiry: response
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs)),
    }
}
