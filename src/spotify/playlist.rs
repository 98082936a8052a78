use indicatif::ProgressBar;

use crate::{
    error::Res,
    spotify::client::SpotifyClient,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, Playlist, PlaylistItemsResponse,
        TrackId,
    },
};

/// Items requested per page, the maximum the endpoint allows.
pub const PAGE_SIZE: u32 = 100;

impl SpotifyClient {
    /// Fetches playlist metadata: name and total item count.
    pub async fn get_playlist(&self, playlist_id: &str) -> Res<Playlist> {
        let url = self.url(&format!(
            "/playlists/{playlist_id}?fields=id,name,tracks.total"
        ));
        let request = self.get(&url);
        self.send_json(request).await
    }

    /// Fetches one page of playlist items from a fully qualified page URL.
    pub async fn get_playlist_items(&self, page_url: &str) -> Res<PlaylistItemsResponse> {
        let request = self.get(page_url);
        self.send_json(request).await
    }

    /// Appends tracks to the end of a playlist in a single request and returns
    /// the new snapshot ID.
    ///
    /// The endpoint accepts at most 100 URIs per call.
    pub async fn add_tracks(&self, playlist_id: &str, tracks: &[TrackId]) -> Res<String> {
        let body = AddTrackToPlaylistRequest {
            uris: tracks.iter().map(TrackId::uri).collect(),
        };
        let url = self.url(&format!("/playlists/{playlist_id}/tracks"));
        let request = self.post(&url).json(&body);
        let response: AddTrackToPlaylistResponse = self.send_json(request).await?;
        Ok(response.snapshot_id)
    }
}

/// Reads every page of a playlist and returns its track IDs in playlist order.
///
/// Pages are followed through the `next` URL until Spotify returns none.
/// Entries that do not resolve to a Spotify track (removed tracks, local
/// files, podcast episodes) are skipped. The first failing page aborts the
/// whole read.
///
/// `progress` is advanced by one for every track kept.
pub async fn fetch_all_tracks(
    client: &SpotifyClient,
    playlist_id: &str,
    progress: &ProgressBar,
) -> Res<Vec<TrackId>> {
    let mut all_tracks = Vec::new();
    let mut next = Some(client.url(&format!(
        "/playlists/{playlist_id}/tracks?offset=0&limit={PAGE_SIZE}"
    )));

    while let Some(page_url) = next {
        let page = client.get_playlist_items(&page_url).await?;

        for item in &page.items {
            if let Some(id) = item.track_id() {
                all_tracks.push(id);
                progress.inc(1);
            }
        }

        next = page.next;
    }

    Ok(all_tracks)
}
