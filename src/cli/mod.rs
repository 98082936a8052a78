//! # CLI Module
//!
//! User-facing commands. Each one takes the resolved [`crate::config::Config`]
//! and returns a [`crate::error::Res`] so `main` is the only place that
//! decides how a failure ends the process.
//!
//! - [`sync`] - authenticate, diff source against holding playlist, append
//!   the missing tracks and notify the webhook
//! - [`auth`] - force a fresh interactive login and cache the token
//!
//! ## Usage
//!
//! ```bash
//! playlist-duplicator            # same as `playlist-duplicator sync`
//! playlist-duplicator auth       # log in again, e.g. after revoking access
//! ```

mod auth;
mod sync;

pub use auth::auth;
pub use sync::NO_NEW_TRACKS;
pub use sync::sync;
