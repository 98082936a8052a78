//! Playlist Duplicator Library
//!
//! Keeps a "holding" Spotify playlist in step with a source playlist: every
//! track of the source that the holding playlist lacks is appended to it, in
//! batches small enough for the Web API, and the outcome is optionally posted
//! to a webhook.
//!
//! # Modules
//!
//! - `cli` - Command implementations driven by `main`
//! - `config` - Environment and `.env` configuration
//! - `error` - The crate-wide error type
//! - `management` - Local token cache
//! - `notify` - Webhook notifications
//! - `spotify` - Spotify Web API client and OAuth flow
//! - `sync` - Playlist diff and batched appends
//! - `types` - Data structures and type definitions
//! - `utils` - Progress bars and message helpers
//!
//! # Example
//!
//! ```
//! use playlist_duplicator::{cli, config};
//!
//! #[tokio::main]
//! async fn main() -> playlist_duplicator::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     cli::sync(&config).await
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod notify;
pub mod spotify;
pub mod sync;
pub mod types;
pub mod utils;

pub use error::{Res, SyncError};

/// Prints a status line with a blue `o` marker.
///
/// ```
/// info!("Loaded {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a line with a green checkmark once a step has completed.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints the message with a red `!` marker to stderr and exits with status 1.
///
/// Reserved for the top-level handler in `main`; library code returns
/// [`SyncError`] instead.
///
/// ```
/// error!("Missing required environment variable: {}", name);
/// // unreachable
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a recoverable problem with a yellow `!` marker.
///
/// Used for failures the run carries on after, such as a token that could not
/// be written or a webhook that did not answer.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
