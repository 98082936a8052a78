use std::time::Duration;

use playlist_duplicator::utils::*;

#[test]
fn test_track_word() {
    assert_eq!(track_word(0), "tracks");
    assert_eq!(track_word(1), "track");
    assert_eq!(track_word(2), "tracks");
}

#[test]
fn test_added_message_singular() {
    let message = added_message(1, Duration::from_millis(1500));
    assert!(message.starts_with("Added 1 track to holding playlist in "));
    assert!(message.ends_with('s'));
}

#[test]
fn test_added_message_plural() {
    let message = added_message(250, Duration::from_secs(3));
    assert!(message.starts_with("Added 250 tracks to holding playlist in "));
}

#[test]
fn test_progress_bar_length_and_message() {
    let pb = progress_bar(42, "Loading tracks from main playlist...");
    assert_eq!(pb.length(), Some(42));
    assert_eq!(pb.message(), "Loading tracks from main playlist...");
    assert_eq!(pb.position(), 0);
}
