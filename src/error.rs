//! Error type shared by every stage of a sync run.
//!
//! A run is all-or-nothing: each stage returns [`Res`] and bubbles failures up
//! with `?` until `main` decides how to exit. Only two variants are ever
//! recovered from: [`SyncError::TokenLoad`] falls back to an interactive login
//! and [`SyncError::Notification`] is logged by the notifier and dropped.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// The token cache is missing or does not hold a readable token.
    #[error("Cannot load cached token: {0}")]
    TokenLoad(String),

    /// Spotify reported an error on the redirect or rejected the token request.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Redirect URL does not contain an authorization code")]
    MissingCode,

    #[error("Redirect state parameter does not match the one sent with the authorization request")]
    StateMismatch,

    #[error("Cannot parse redirect URL: {0}")]
    InvalidRedirect(String),

    #[error("Request to Spotify failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Spotify responded with {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("Cannot deliver notification: {0}")]
    Notification(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Res<T> = std::result::Result<T, SyncError>;
