use chrono::{Duration, Utc};
use playlist_duplicator::{
    SyncError,
    management::TokenCache,
    spotify::auth::{Authenticator, SCOPES, generate_state, parse_redirect},
    types::Token,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REDIRECT_URI: &str = "http://localhost:8080/callback";

// base64("client-id:client-secret")
const BASIC_AUTH: &str = "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=";

fn authenticator_for(server: &MockServer) -> Authenticator {
    Authenticator::new(
        "client-id",
        "client-secret",
        REDIRECT_URI,
        "https://accounts.spotify.com/authorize",
        format!("{}/api/token", server.uri()),
    )
}

fn cache_in(dir: &TempDir) -> TokenCache {
    TokenCache::new(dir.path().join("cache/token.json"))
}

fn cached_token(expires_in: Duration) -> Token {
    Token {
        access_token: "cached-access".to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: "cached-refresh".to_string(),
        expiry: Utc::now() + expires_in,
        scope: Some(SCOPES.to_string()),
    }
}

async fn mount_token_endpoint(server: &MockServer, grant: &str, body: serde_json::Value, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(header("authorization", BASIC_AUTH))
        .and(body_string_contains(format!("grant_type={grant}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected)
        .mount(server)
        .await;
}

#[test]
fn test_generate_state() {
    let state = generate_state();

    assert_eq!(state.len(), 64);
    assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(state, generate_state());
}

#[test]
fn test_parse_redirect_returns_code() {
    let code = parse_redirect(
        "http://localhost:8080/callback?code=AQBcode&state=nonce\n",
        "nonce",
    )
    .unwrap();
    assert_eq!(code, "AQBcode");
}

#[test]
fn test_parse_redirect_error_parameter() {
    let result = parse_redirect(
        "http://localhost:8080/callback?error=access_denied&state=nonce",
        "nonce",
    );
    assert!(matches!(result, Err(SyncError::AuthFailed(ref e)) if e == "access_denied"));
}

#[test]
fn test_parse_redirect_error_wins_over_code() {
    let result = parse_redirect(
        "http://localhost:8080/callback?code=abc&error=server_error&state=nonce",
        "nonce",
    );
    assert!(matches!(result, Err(SyncError::AuthFailed(_))));
}

#[test]
fn test_parse_redirect_missing_code() {
    let result = parse_redirect("http://localhost:8080/callback?state=nonce", "nonce");
    assert!(matches!(result, Err(SyncError::MissingCode)));
}

#[test]
fn test_parse_redirect_state_mismatch() {
    let result = parse_redirect(
        "http://localhost:8080/callback?code=abc&state=attacker",
        "nonce",
    );
    assert!(matches!(result, Err(SyncError::StateMismatch)));
}

#[test]
fn test_parse_redirect_missing_state_is_mismatch() {
    let result = parse_redirect("http://localhost:8080/callback?code=abc", "nonce");
    assert!(matches!(result, Err(SyncError::StateMismatch)));
}

#[test]
fn test_parse_redirect_state_compared_exactly() {
    let result = parse_redirect(
        "http://localhost:8080/callback?code=abc&state=NONCE",
        "nonce",
    );
    assert!(matches!(result, Err(SyncError::StateMismatch)));
}

#[test]
fn test_parse_redirect_invalid_url() {
    let result = parse_redirect("not a url", "nonce");
    assert!(matches!(result, Err(SyncError::InvalidRedirect(_))));
}

#[tokio::test]
async fn test_authorize_url_parameters() {
    let server = MockServer::start().await;
    let url = authenticator_for(&server).authorize_url("nonce").unwrap();

    assert_eq!(url.host_str(), Some("accounts.spotify.com"));
    assert_eq!(url.path(), "/authorize");

    let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let get = |key: &str| {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };
    assert_eq!(get("client_id"), Some("client-id"));
    assert_eq!(get("response_type"), Some("code"));
    assert_eq!(get("redirect_uri"), Some(REDIRECT_URI));
    assert_eq!(get("scope"), Some(SCOPES));
    assert_eq!(get("state"), Some("nonce"));
}

#[tokio::test]
async fn test_login_exchanges_code_for_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(header("authorization", BASIC_AUTH))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=AQBcode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "new-access",
            "token_type": "Bearer",
            "scope": SCOPES,
            "expires_in": 3600,
            "refresh_token": "new-refresh"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut input: &[u8] = b"http://localhost:8080/callback?code=AQBcode&state=nonce\n";
    let before = Utc::now();
    let token = authenticator_for(&server)
        .login_with_state("nonce", &mut input)
        .await
        .unwrap();

    assert_eq!(token.access_token, "new-access");
    assert_eq!(token.refresh_token, "new-refresh");
    assert_eq!(token.token_type, "Bearer");
    assert!(token.expiry >= before + Duration::seconds(3600));
    assert!(!token.is_expired());
}

#[tokio::test]
async fn test_state_mismatch_never_exchanges_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let cache = cache_in(&dir);
    let mut input: &[u8] = b"http://localhost:8080/callback?code=stolen&state=attacker\n";

    let result = authenticator_for(&server).login(&cache, &mut input).await;

    assert!(matches!(result, Err(SyncError::StateMismatch)));
    assert!(!cache.path().exists());
}

#[tokio::test]
async fn test_login_without_input_fails() {
    let server = MockServer::start().await;
    let mut input: &[u8] = b"";

    let result = authenticator_for(&server)
        .login_with_state("nonce", &mut input)
        .await;

    assert!(matches!(result, Err(SyncError::InvalidRedirect(_))));
}

#[tokio::test]
async fn test_rejected_code_is_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid authorization code"
        })))
        .mount(&server)
        .await;

    let result = authenticator_for(&server).exchange_code("expired").await;

    assert!(matches!(
        result,
        Err(SyncError::AuthFailed(ref e)) if e == "invalid_grant: Invalid authorization code"
    ));
}

#[tokio::test]
async fn test_authenticate_uses_valid_cached_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let cache = cache_in(&dir);
    let cached = cached_token(Duration::hours(1));
    cache.persist(&cached).await.unwrap();

    let mut input: &[u8] = b"";
    let token = authenticator_for(&server)
        .authenticate(&cache, &mut input)
        .await
        .unwrap();

    assert_eq!(token, cached);
}

#[tokio::test]
async fn test_authenticate_refreshes_expired_token() {
    let server = MockServer::start().await;
    mount_token_endpoint(
        &server,
        "refresh_token",
        json!({
            "access_token": "refreshed-access",
            "token_type": "Bearer",
            "expires_in": 3600
        }),
        1,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let cache = cache_in(&dir);
    cache.persist(&cached_token(Duration::minutes(-5))).await.unwrap();

    let mut input: &[u8] = b"";
    let token = authenticator_for(&server)
        .authenticate(&cache, &mut input)
        .await
        .unwrap();

    assert_eq!(token.access_token, "refreshed-access");
    assert_eq!(token.refresh_token, "cached-refresh");

    let saved = cache.load().await.unwrap();
    assert_eq!(saved, token);
}

#[tokio::test]
async fn test_authenticate_without_cache_runs_interactive_login() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "authorization_code", json!({}), 0).await;

    let dir = TempDir::new().unwrap();
    let cache = cache_in(&dir);
    let mut input: &[u8] = b"http://localhost:8080/callback?code=abc&state=guess\n";

    let result = authenticator_for(&server).authenticate(&cache, &mut input).await;

    assert!(matches!(result, Err(SyncError::StateMismatch)));
}

#[tokio::test]
async fn test_refresh_without_refresh_token_fails() {
    let server = MockServer::start().await;
    let mut token = cached_token(Duration::minutes(-5));
    token.refresh_token.clear();

    let result = authenticator_for(&server).refresh(&token).await;

    assert!(matches!(result, Err(SyncError::AuthFailed(_))));
}

#[tokio::test]
async fn test_exchange_code_rejects_oversized_lifetime() {
    let server = MockServer::start().await;
    mount_token_endpoint(
        &server,
        "authorization_code",
        json!({"access_token": "x", "expires_in": 9000000000000i64}),
        1,
    )
    .await;

    let result = authenticator_for(&server).exchange_code("c").await;

    assert!(matches!(result, Err(SyncError::AuthFailed(_))));
}

#[tokio::test]
async fn test_refresh_rejects_oversized_lifetime() {
    let server = MockServer::start().await;
    mount_token_endpoint(
        &server,
        "refresh_token",
        json!({"access_token": "x", "expires_in": i64::MAX}),
        1,
    )
    .await;

    let result = authenticator_for(&server)
        .refresh(&cached_token(Duration::minutes(-5)))
        .await;

    assert!(matches!(result, Err(SyncError::AuthFailed(_))));
}
