//! Tests for status feed sources

use std::time::Duration;

use airfield_scheduler::core::{EventRecorder, StatusRegister};
use airfield_scheduler::infra::{run_status_feed, LineFeed, ScriptedFeed, StatusSource};

#[tokio::test]
async fn test_line_feed_drives_register() {
    let register = StatusRegister::new();
    let mut feed = LineFeed::new(&b"1\n\nabc\n2\n2\n8\n"[..]);
    let stats = run_status_feed(&mut feed, &register, &EventRecorder::log_only())
        .await
        .unwrap();
    assert_eq!(stats.applied, 4);
    assert_eq!(stats.ignored, 1);
    assert_eq!(stats.malformed, 1);
    assert_eq!(register.get(), 8);
    assert_eq!(register.previous(), 2);
}

#[tokio::test]
async fn test_non_utf8_line_does_not_stop_feed() {
    let register = StatusRegister::new();
    let mut feed = LineFeed::new(&b"1\n\xff\xfe\n8\n"[..]);
    let stats = run_status_feed(&mut feed, &register, &EventRecorder::log_only())
        .await
        .unwrap();
    assert_eq!(stats.applied, 2);
    assert_eq!(stats.malformed, 1);
    assert_eq!(register.get(), 8);
    assert_eq!(register.previous(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_scripted_feed_respects_delays() {
    let mut feed = ScriptedFeed::new([
        (Duration::from_secs(3), "4"),
        (Duration::from_secs(2), "5"),
    ]);
    assert_eq!(feed.remaining(), 2);

    let started = tokio::time::Instant::now();
    assert_eq!(feed.next_message().await.unwrap().as_deref(), Some("4"));
    assert_eq!(feed.next_message().await.unwrap().as_deref(), Some("5"));
    assert!(started.elapsed() >= Duration::from_secs(5));
    assert_eq!(feed.next_message().await.unwrap(), None);
}
