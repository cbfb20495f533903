use std::time::Duration;

use century_plan::engine::celebration::CelebrationTimer;

#[tokio::test]
async fn celebration_expires_after_ttl() {
    let timer = CelebrationTimer::new(Duration::from_millis(50));

    let shown = timer.show(30);
    assert_eq!(shown.milestone, 30);
    assert_eq!(timer.current(), Some(shown));

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(timer.current(), None);
}

#[tokio::test]
async fn newer_celebration_supersedes_and_keeps_its_own_expiry() {
    let timer = CelebrationTimer::new(Duration::from_millis(200));

    let first = timer.show(30);
    tokio::time::sleep(Duration::from_millis(120)).await;
    let second = timer.show(40);
    assert_ne!(first.id, second.id);

    // The first expiry would have fired here.
    tokio::time::sleep(Duration::from_millis(130)).await;
    assert_eq!(timer.current().map(|c| c.milestone), Some(40));

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(timer.current(), None);
}

#[tokio::test]
async fn cancel_clears_immediately() {
    let timer = CelebrationTimer::new(Duration::from_secs(4));
    timer.show(50);
    timer.cancel();
    assert_eq!(timer.current(), None);
    assert_eq!(timer.ttl(), Duration::from_secs(4));
}

#[tokio::test]
async fn dropping_the_timer_cancels_pending_expiry() {
    let timer = CelebrationTimer::new(Duration::from_millis(50));
    let observer = timer.clone();
    timer.show(60);
    drop(timer);
    assert_eq!(observer.current().map(|c| c.milestone), Some(60));
    drop(observer);

    tokio::time::sleep(Duration::from_millis(150)).await;
}

#[tokio::test]
async fn oversized_ttl_saturates_expiry() {
    let timer = CelebrationTimer::new(Duration::from_secs(1_000_000_000_000_000));

    let shown = timer.show(70);
    assert!(shown.expires_at > shown.shown_at);
    assert_eq!(timer.current().map(|c| c.milestone), Some(70));
    timer.cancel();
}
