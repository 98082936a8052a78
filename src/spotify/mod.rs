//! # Spotify Integration Module
//!
//! Thin client for the parts of the Spotify Web API a sync run needs:
//!
//! - [`auth`] - OAuth 2.0 authorization code flow with a pasted-back redirect
//!   URL, token exchange and refresh
//! - [`client`] - [`SpotifyClient`], the authenticated request handle, plus
//!   status and rate limit handling shared by every endpoint
//! - [`playlist`] - playlist metadata, paginated item listing and track
//!   appends
//!
//! ## API Coverage
//!
//! - `GET /me` - current user, logged after login
//! - `GET /playlists/{id}` - playlist name and size
//! - `GET /playlists/{id}/tracks` - paginated playlist items
//! - `POST /playlists/{id}/tracks` - append up to 100 tracks
//! - `POST /api/token` - authorization code and refresh token grants
//!
//! ## Error Handling
//!
//! Every call returns [`crate::error::Res`]. Network failures surface as
//! `Transport`, non-success statuses as `Api`. A `429` is waited out once when
//! Spotify asks for at most two minutes; nothing else is retried.

pub mod auth;
pub mod client;
pub mod playlist;

pub use client::SpotifyClient;
