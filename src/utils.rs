use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub fn progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb.set_message(message.to_string());
    pb
}

pub fn track_word(count: usize) -> &'static str {
    if count == 1 { "track" } else { "tracks" }
}

/// Summary reported after tracks were appended to the holding playlist.
pub fn added_message(count: usize, elapsed: Duration) -> String {
    format!(
        "Added {} {} to holding playlist in {:.2?}",
        count,
        track_word(count),
        elapsed
    )
}
