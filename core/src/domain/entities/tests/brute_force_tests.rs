//! Unit tests for brute-force accounting.

use chrono::{Duration, Utc};

use crate::domain::entities::brute_force::{
    BruteForceEntry, FAILURE_WINDOW_SECONDS, LOCK_DURATION_SECONDS, LOCK_THRESHOLD,
};

fn entry() -> BruteForceEntry {
    BruteForceEntry::new("9876543210".to_string(), Utc::now())
}

fn record(entry: &mut BruteForceEntry, now: chrono::DateTime<Utc>) -> bool {
    entry.record_failure(
        now,
        LOCK_THRESHOLD,
        LOCK_DURATION_SECONDS,
        FAILURE_WINDOW_SECONDS,
    )
}

#[test]
fn locks_on_fifth_failure() {
    let mut e = entry();
    let now = Utc::now();

    for i in 1..LOCK_THRESHOLD {
        assert!(!record(&mut e, now), "failure {} should not lock", i);
        assert_eq!(e.failed_attempts, i);
        assert!(!e.is_locked(now));
    }

    assert!(record(&mut e, now), "threshold failure should lock");
    assert!(e.is_locked(now));
    assert_eq!(e.failed_attempts, LOCK_THRESHOLD);
}

#[test]
fn lock_lifts_after_duration() {
    let mut e = entry();
    let now = Utc::now();
    for _ in 0..LOCK_THRESHOLD {
        record(&mut e, now);
    }
    assert!(e.is_locked(now));

    let later = now + Duration::seconds(LOCK_DURATION_SECONDS + 1);
    assert!(!e.is_locked(later));
    assert!(e.lock_remaining_seconds(later).is_none());
}

#[test]
fn lock_remaining_counts_down() {
    let mut e = entry();
    let now = Utc::now();
    for _ in 0..LOCK_THRESHOLD {
        record(&mut e, now);
    }

    let remaining = e
        .lock_remaining_seconds(now)
        .expect("locked entry should report remaining time");
    assert!(remaining > 0 && remaining <= LOCK_DURATION_SECONDS);
}

#[test]
fn stale_window_resets_counter() {
    let mut e = entry();
    let now = Utc::now();

    record(&mut e, now);
    record(&mut e, now);
    assert_eq!(e.failed_attempts, 2);

    // Failures older than the window no longer count
    let later = now + Duration::seconds(FAILURE_WINDOW_SECONDS + 1);
    assert!(!record(&mut e, later));
    assert_eq!(e.failed_attempts, 1);
    assert_eq!(e.window_start, later);
}

#[test]
fn expired_lock_is_cleared_on_next_failure() {
    let mut e = entry();
    let now = Utc::now();
    for _ in 0..LOCK_THRESHOLD {
        record(&mut e, now);
    }

    let later = now + Duration::seconds(LOCK_DURATION_SECONDS + 1);
    assert!(!record(&mut e, later));
    assert_eq!(e.failed_attempts, 1);
    assert!(!e.is_locked(later));
}
