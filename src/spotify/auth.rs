use std::io::Write;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use rand::{Rng, distr::Alphanumeric};
use reqwest::{
    Client, Response,
    header::{AUTHORIZATION, HeaderValue},
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use url::Url;

use crate::{
    config::Config,
    error::{Res, SyncError},
    info,
    management::TokenCache,
    success,
    types::{Token, TokenErrorResponse, TokenResponse},
    warning,
};

/// Permissions needed to read both playlists and append to the holding one.
pub const SCOPES: &str = "user-read-private playlist-read-private playlist-read-collaborative playlist-modify-public playlist-modify-private";

const STATE_LEN: usize = 64;

/// Random nonce binding one authorization request to its redirect.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LEN)
        .map(char::from)
        .collect()
}

/// Extracts the authorization code from the URL Spotify redirected to.
///
/// The checks run in order: an `error` parameter fails with
/// [`SyncError::AuthFailed`], a missing `code` with
/// [`SyncError::MissingCode`], and a `state` that differs from
/// `expected_state` with [`SyncError::StateMismatch`].
pub fn parse_redirect(redirect: &str, expected_state: &str) -> Res<String> {
    let url = Url::parse(redirect.trim())
        .map_err(|e| SyncError::InvalidRedirect(format!("{}: {}", redirect.trim(), e)))?;

    let param = |name: &str| {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    };

    if let Some(error) = param("error") {
        return Err(SyncError::AuthFailed(error));
    }

    let code = param("code").ok_or(SyncError::MissingCode)?;

    if param("state").as_deref() != Some(expected_state) {
        return Err(SyncError::StateMismatch);
    }

    Ok(code)
}

/// OAuth2 authorization code flow against the Spotify accounts service.
pub struct Authenticator {
    http: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_url: String,
    token_url: String,
    open_browser: bool,
}

impl Authenticator {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
        auth_url: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            auth_url: auth_url.into(),
            token_url: token_url.into(),
            open_browser: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.client_id,
            &config.client_secret,
            &config.redirect_uri,
            &config.auth_url,
            &config.token_url,
        )
    }

    /// Also try to open the authorization URL in the default browser.
    pub fn open_browser(mut self, open: bool) -> Self {
        self.open_browser = open;
        self
    }

    pub fn authorize_url(&self, state: &str) -> Res<Url> {
        Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", SCOPES),
                ("state", state),
            ],
        )
        .map_err(|e| SyncError::Config(format!("Invalid authorization URL {}: {}", self.auth_url, e)))
    }

    /// Returns a usable token, preferring the cache.
    ///
    /// A cached token that is about to expire is refreshed and saved back. When
    /// there is no cached token, or refreshing it fails, the interactive login
    /// runs and reads the redirect URL from `input`.
    pub async fn authenticate<R>(&self, cache: &TokenCache, input: &mut R) -> Res<Token>
    where
        R: AsyncBufRead + Unpin,
    {
        match cache.load().await {
            Ok(token) if !token.is_expired() => {
                info!("Using cached token");
                Ok(token)
            }
            Ok(token) => match self.refresh(&token).await {
                Ok(refreshed) => {
                    cache.save(&refreshed).await;
                    info!("Refreshed cached token");
                    Ok(refreshed)
                }
                Err(e) => {
                    warning!("Cannot refresh cached token: {}", e);
                    self.login(cache, input).await
                }
            },
            Err(e) => {
                warning!("{}", e);
                self.login(cache, input).await
            }
        }
    }

    /// Runs the interactive login with a fresh state nonce and caches the
    /// resulting token.
    pub async fn login<R>(&self, cache: &TokenCache, input: &mut R) -> Res<Token>
    where
        R: AsyncBufRead + Unpin,
    {
        let state = generate_state();
        let token = self.login_with_state(&state, input).await?;
        cache.save(&token).await;
        success!("Retrieved new token");
        Ok(token)
    }

    /// Prints the authorization URL, reads the pasted redirect URL from
    /// `input` and exchanges its code for a token.
    ///
    /// Nothing is sent to the token endpoint unless the redirect passes
    /// [`parse_redirect`] for `state`.
    pub async fn login_with_state<R>(&self, state: &str, input: &mut R) -> Res<Token>
    where
        R: AsyncBufRead + Unpin,
    {
        let auth_url = self.authorize_url(state)?;

        info!(
            "Please log in to Spotify by visiting the following page in your browser:\n{}",
            auth_url
        );
        if self.open_browser && webbrowser::open(auth_url.as_str()).is_err() {
            warning!("Failed to open browser, please open the URL above manually");
        }
        print!("Please paste the URL you are redirected to here: ");
        std::io::stdout().flush()?;

        let mut redirect = String::new();
        if input.read_line(&mut redirect).await? == 0 {
            return Err(SyncError::InvalidRedirect(
                "no redirect URL was entered".to_string(),
            ));
        }

        let code = parse_redirect(&redirect, state)?;
        self.exchange_code(&code).await
    }

    pub async fn exchange_code(&self, code: &str) -> Res<Token> {
        let response = self
            .http
            .post(&self.token_url)
            .header(AUTHORIZATION, self.basic_auth()?)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        let body = token_response(response).await?;
        body.into_token(Utc::now(), None)
    }

    /// Trades the refresh token of `token` for a new access token.
    pub async fn refresh(&self, token: &Token) -> Res<Token> {
        if token.refresh_token.is_empty() {
            return Err(SyncError::AuthFailed(
                "cached token has no refresh token".to_string(),
            ));
        }

        let response = self
            .http
            .post(&self.token_url)
            .header(AUTHORIZATION, self.basic_auth()?)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", token.refresh_token.as_str()),
            ])
            .send()
            .await?;

        let body = token_response(response).await?;
        body.into_token(Utc::now(), Some(&token.refresh_token))
    }

    fn basic_auth(&self) -> Res<HeaderValue> {
        let credentials = STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret));
        HeaderValue::from_str(&format!("Basic {credentials}"))
            .map_err(|e| SyncError::Config(format!("Invalid client credentials: {e}")))
    }
}

async fn token_response(response: Response) -> Res<TokenResponse> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return Ok(serde_json::from_str(&body)?);
    }

    match serde_json::from_str::<TokenErrorResponse>(&body) {
        Ok(e) => Err(SyncError::AuthFailed(match e.error_description {
            Some(description) => format!("{}: {}", e.error, description),
            None => e.error,
        })),
        Err(_) => Err(SyncError::Api {
            status,
            message: body,
        }),
    }
}
