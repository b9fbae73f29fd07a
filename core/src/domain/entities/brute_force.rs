//! Brute-force accounting entity for verification failures.
//!
//! Failure counts live in a rolling window independent from any single OTP
//! record: a caller who keeps requesting fresh codes still accumulates
//! failures, and once the threshold is crossed the phone is locked out
//! regardless of whether later submissions are correct.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Failed verifications within the window before the phone is locked
pub const LOCK_THRESHOLD: u32 = 5;

/// Lockout duration once the threshold is reached, in seconds (60 minutes)
pub const LOCK_DURATION_SECONDS: i64 = 3600;

/// Rolling window over which failures are counted, in seconds
pub const FAILURE_WINDOW_SECONDS: i64 = 3600;

/// Per-phone failure counter with lockout state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BruteForceEntry {
    /// Normalized local phone number
    pub phone: String,

    /// Failed verification attempts within the current window
    pub failed_attempts: u32,

    /// Start of the current counting window
    pub window_start: DateTime<Utc>,

    /// When set and in the future, all verification is rejected
    pub locked_until: Option<DateTime<Utc>>,
}

impl BruteForceEntry {
    /// Creates an entry with no recorded failures.
    pub fn new(phone: String, now: DateTime<Utc>) -> Self {
        Self {
            phone,
            failed_attempts: 0,
            window_start: now,
            locked_until: None,
        }
    }

    /// Whether the phone is locked out at `now`.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        matches!(self.locked_until, Some(until) if until > now)
    }

    /// Seconds until the lockout lifts, or `None` when not locked.
    pub fn lock_remaining_seconds(&self, now: DateTime<Utc>) -> Option<i64> {
        match self.locked_until {
            Some(until) if until > now => Some((until - now).num_seconds().max(1)),
            _ => None,
        }
    }

    /// Records one failed verification and returns `true` if this failure
    /// triggered a lockout.
    ///
    /// A stale window (no failures within `window_seconds`) resets the
    /// counter before the new failure is added. An expired lock is also
    /// cleared here rather than by a background sweep.
    pub fn record_failure(
        &mut self,
        now: DateTime<Utc>,
        threshold: u32,
        lock_duration_seconds: i64,
        window_seconds: i64,
    ) -> bool {
        if let Some(until) = self.locked_until {
            if until <= now {
                self.locked_until = None;
                self.failed_attempts = 0;
                self.window_start = now;
            }
        }

        if now > self.window_start + Duration::seconds(window_seconds) {
            self.failed_attempts = 0;
            self.window_start = now;
        }

        self.failed_attempts += 1;

        if self.failed_attempts >= threshold && self.locked_until.is_none() {
            self.locked_until = Some(now + Duration::seconds(lock_duration_seconds));
            true
        } else {
            false
        }
    }
}
