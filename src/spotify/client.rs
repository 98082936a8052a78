use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    error::{Res, SyncError},
    types::{ApiErrorResponse, Token, User},
    warning,
};

/// Longest `Retry-After` delay that is waited out before giving up.
const MAX_RETRY_AFTER_SECS: u64 = 120;

/// Authenticated handle on the Spotify Web API.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token: Token,
}

impl SpotifyClient {
    pub fn new(api_url: impl Into<String>, token: Token) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    pub(crate) fn get(&self, url: &str) -> RequestBuilder {
        self.http.get(url).bearer_auth(&self.token.access_token)
    }

    pub(crate) fn post(&self, url: &str) -> RequestBuilder {
        self.http.post(url).bearer_auth(&self.token.access_token)
    }

    /// Sends a request and decodes the JSON body of a successful response.
    ///
    /// A `429 Too Many Requests` answer is retried once after the advertised
    /// `Retry-After` delay when that delay is at most two minutes. Every other
    /// non-success status becomes [`SyncError::Api`].
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Res<T> {
        let retry = request.try_clone();
        let mut response = request.send().await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            if let (Some(secs), Some(retry)) = (retry_after(&response), retry) {
                if secs <= MAX_RETRY_AFTER_SECS {
                    warning!("Rate limited by Spotify, retrying in {} seconds", secs);
                    sleep(Duration::from_secs(secs)).await;
                    response = retry.send().await?;
                }
            }
        }

        let response = check_status(response).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn current_user(&self) -> Res<User> {
        let request = self.get(&self.url("/me"));
        self.send_json(request).await
    }
}

fn retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()
}

async fn check_status(response: Response) -> Res<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorResponse>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);

    Err(SyncError::Api { status, message })
}
