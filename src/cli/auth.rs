use tokio::io::BufReader;

use crate::{
    cli::sync::log_user,
    config::Config,
    error::Res,
    management::TokenCache,
    spotify::{SpotifyClient, auth::Authenticator},
};

/// Runs the interactive login even when a cached token exists and replaces
/// the cache with the new token.
pub async fn auth(config: &Config) -> Res<()> {
    let cache = TokenCache::new(&config.token_path);
    let authenticator = Authenticator::from_config(config).open_browser(true);
    let mut stdin = BufReader::new(tokio::io::stdin());

    let token = authenticator.login(&cache, &mut stdin).await?;
    let client = SpotifyClient::new(&config.api_url, token);
    log_user(&client).await
}
