use std::time::Instant;

use tokio::io::BufReader;

use crate::{
    config::Config,
    error::Res,
    info,
    management::TokenCache,
    notify::Notifier,
    spotify::{SpotifyClient, auth::Authenticator, playlist::fetch_all_tracks},
    success,
    sync::{self, MAX_BATCH_SIZE},
    types::{Playlist, TrackId},
    utils,
};

pub const NO_NEW_TRACKS: &str = "No new tracks found";

/// Copies every source track missing from the holding playlist into it and
/// reports the outcome.
pub async fn sync(config: &Config) -> Res<()> {
    let cache = TokenCache::new(&config.token_path);
    let authenticator = Authenticator::from_config(config).open_browser(true);
    let mut stdin = BufReader::new(tokio::io::stdin());

    let token = authenticator.authenticate(&cache, &mut stdin).await?;
    let client = SpotifyClient::new(&config.api_url, token);
    log_user(&client).await?;

    let source = client.get_playlist(&config.source_playlist_id).await?;
    let holding = client.get_playlist(&config.holding_playlist_id).await?;

    let start = Instant::now();
    let source_tracks = load_tracks(&client, &source, "Loading tracks from main playlist...").await?;
    let holding_tracks =
        load_tracks(&client, &holding, "Loading tracks from holding playlist...").await?;
    info!(
        "Loaded {} tracks in {:.2?}",
        source_tracks.len() + holding_tracks.len(),
        start.elapsed()
    );

    let new_tracks = sync::compute_new_tracks(&source_tracks, &holding_tracks);
    let notifier = Notifier::new(config.webhook_url.clone());

    if new_tracks.is_empty() {
        success!("{}", NO_NEW_TRACKS);
        if config.send_empty_notifications {
            notifier.notify(NO_NEW_TRACKS).await;
        }
        return Ok(());
    }

    info!(
        "Adding {} {} to holding playlist {}",
        new_tracks.len(),
        utils::track_word(new_tracks.len()),
        holding.name
    );

    let start = Instant::now();
    let pb = utils::progress_bar(
        new_tracks.len() as u64,
        "Saving tracks to holding playlist...",
    );
    let added =
        sync::apply_in_batches(&client, &holding.id, &new_tracks, MAX_BATCH_SIZE, &pb).await;
    pb.finish();
    let added = added?;

    let message = utils::added_message(added, start.elapsed());
    success!("{}", message);
    notifier.notify(&message).await;

    Ok(())
}

pub(crate) async fn log_user(client: &SpotifyClient) -> Res<()> {
    let user = client.current_user().await?;
    info!(
        "Logged in as {} ({})",
        user.id,
        user.display_name.as_deref().unwrap_or("no display name")
    );
    Ok(())
}

async fn load_tracks(
    client: &SpotifyClient,
    playlist: &Playlist,
    message: &str,
) -> Res<Vec<TrackId>> {
    info!(
        "Playlist {} has {} total tracks",
        playlist.name, playlist.tracks.total
    );

    let pb = utils::progress_bar(playlist.tracks.total, message);
    let tracks = fetch_all_tracks(client, &playlist.id, &pb).await;
    pb.finish();
    tracks
}
