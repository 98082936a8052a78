//! Diffing two playlists and appending the difference in batches.

use std::collections::HashSet;

use indicatif::ProgressBar;

use crate::{error::Res, spotify::SpotifyClient, types::TrackId};

/// Tracks sent per append call. Spotify documents a hard limit of 100.
pub const MAX_BATCH_SIZE: usize = 99;

/// Source tracks that are missing from the holding playlist, in source order.
///
/// Membership only: a track listed twice in `source` and absent from
/// `holding` is returned twice.
pub fn compute_new_tracks(source: &[TrackId], holding: &[TrackId]) -> Vec<TrackId> {
    let holding: HashSet<&TrackId> = holding.iter().collect();
    source
        .iter()
        .filter(|id| !holding.contains(id))
        .cloned()
        .collect()
}

/// Appends `tracks` to the playlist in consecutive chunks of at most
/// `max_batch` tracks and returns how many were added.
///
/// Chunks go out in order; the first failing append aborts the rest. A
/// `max_batch` of zero is treated as one.
pub async fn apply_in_batches(
    client: &SpotifyClient,
    playlist_id: &str,
    tracks: &[TrackId],
    max_batch: usize,
    progress: &ProgressBar,
) -> Res<usize> {
    let mut added = 0;

    for batch in tracks.chunks(max_batch.max(1)) {
        client.add_tracks(playlist_id, batch).await?;
        added += batch.len();
        progress.inc(batch.len() as u64);
    }

    Ok(added)
}
