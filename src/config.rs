//! Configuration management for the playlist duplicator.
//!
//! Every setting comes from the process environment. Values that are not
//! already exported are read from a `.env` file, first in the working
//! directory and then in the platform-specific local data directory:
//!
//! - Linux: `~/.local/share/playlist-duplicator/.env`
//! - macOS: `~/Library/Application Support/playlist-duplicator/.env`
//! - Windows: `%LOCALAPPDATA%/playlist-duplicator/.env`

use std::{env, path::PathBuf};

use crate::error::{Res, SyncError};

pub const APP_DIR: &str = "playlist-duplicator";

pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/callback";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

const REQUIRED_VARS: [&str; 4] = [
    "SPOTIFY_ID",
    "SPOTIFY_SECRET",
    "SPOTIFY_PLAYLIST_ID",
    "SPOTIFY_HOLDING_PLAYLIST_ID",
];

/// Loads `.env` files into the environment when the required variables are
/// not all exported yet.
///
/// Variables that are already set are never overwritten. A missing `.env`
/// file is not an error here; [`Config::from_env`] reports whichever required
/// variable is still absent afterwards.
///
/// # Returns
///
/// Returns `Ok(())` when the environment is usable as-is or a `.env` file was
/// read, and an error if the data directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Res<()> {
    if required_vars_present(|key| env::var(key).ok()) {
        return Ok(());
    }

    match dotenv::dotenv() {
        Ok(_) => return Ok(()),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(SyncError::Config(e.to_string())),
    }

    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(SyncError::Config(format!(
            "Cannot read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Local data directory of the application, `./playlist-duplicator` when the
/// platform has none.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

fn required_vars_present<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    REQUIRED_VARS
        .iter()
        .all(|key| lookup(key).is_some_and(|v| !v.is_empty()))
}

/// Resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub source_playlist_id: String,
    pub holding_playlist_id: String,
    pub webhook_url: Option<String>,
    pub send_empty_notifications: bool,
    pub redirect_uri: String,
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub token_path: PathBuf,
}

impl Config {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Res<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset. The first missing required variable is
    /// reported as [`SyncError::Config`].
    pub fn from_lookup<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| SyncError::Config(format!("{key} must be set")))
        };

        Ok(Self {
            client_id: require("SPOTIFY_ID")?,
            client_secret: require("SPOTIFY_SECRET")?,
            source_playlist_id: require("SPOTIFY_PLAYLIST_ID")?,
            holding_playlist_id: require("SPOTIFY_HOLDING_PLAYLIST_ID")?,
            webhook_url: get("DISCORD_WEBHOOK_URL"),
            send_empty_notifications: get("SEND_EMPTY_NOTIFICATIONS").as_deref() != Some("false"),
            redirect_uri: get("SPOTIFY_REDIRECT_URI")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            api_url: get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            auth_url: get("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: get("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            token_path: get("TOKEN_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_token_path),
        })
    }
}

fn default_token_path() -> PathBuf {
    let mut path = data_dir();
    path.push("cache/token.json");
    path
}
