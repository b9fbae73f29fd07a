//! In-memory implementation of the per-phone OTP store.
//!
//! Both maps live behind a single mutex, so every trait operation is atomic
//! with respect to the others; the compound operations do their whole
//! read-modify-write while holding the lock, which makes concurrent
//! requests for the same phone safe. The lock is never held across an
//! await point.
//!
//! Expiry is lazy: a record past its TTL is treated as absent and deleted
//! on the access that notices it. There is no background sweeper; OTP state
//! is short-lived enough that lazy deletion bounds memory in practice.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use tb_core::domain::entities::brute_force::BruteForceEntry;
use tb_core::domain::entities::otp_record::OtpRecord;
use tb_core::services::otp::{AttemptOutcome, FailureStatus, OtpStore};

#[derive(Default)]
struct StoreInner {
    records: HashMap<String, OtpRecord>,
    failures: HashMap<String, BruteForceEntry>,
}

/// Process-local OTP store. State does not survive a restart.
#[derive(Default)]
pub struct MemoryOtpStore {
    inner: Mutex<StoreInner>,
}

impl MemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreInner>, String> {
        self.inner
            .lock()
            .map_err(|_| "otp store mutex poisoned".to_string())
    }

    /// Number of live records, for diagnostics.
    pub fn record_count(&self) -> usize {
        self.inner
            .lock()
            .map(|inner| inner.records.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl OtpStore for MemoryOtpStore {
    async fn put_record(&self, record: OtpRecord) -> Result<(), String> {
        let mut inner = self.lock()?;
        let replaced = inner
            .records
            .insert(record.phone.clone(), record)
            .is_some();
        if replaced {
            debug!(event = "otp_record_replaced", "Replaced pending OTP record");
        }
        Ok(())
    }

    async fn cooldown_remaining(
        &self,
        phone: &str,
        cooldown_seconds: i64,
    ) -> Result<Option<i64>, String> {
        let inner = self.lock()?;
        Ok(inner
            .records
            .get(phone)
            .and_then(|r| r.cooldown_remaining(Utc::now(), cooldown_seconds)))
    }

    async fn begin_attempt(
        &self,
        phone: &str,
        ttl_seconds: i64,
        max_attempts: u32,
    ) -> Result<AttemptOutcome, String> {
        let mut inner = self.lock()?;
        let now = Utc::now();

        let record = match inner.records.get_mut(phone) {
            None => return Ok(AttemptOutcome::NoRecord),
            Some(record) => record,
        };

        if record.is_expired_at(now, ttl_seconds) {
            inner.records.remove(phone);
            return Ok(AttemptOutcome::Expired);
        }

        if record.attempts_exhausted(max_attempts) {
            inner.records.remove(phone);
            return Ok(AttemptOutcome::Exhausted);
        }

        record.attempts += 1;
        Ok(AttemptOutcome::Pending {
            verification_id: record.verification_id.clone(),
            attempts: record.attempts,
        })
    }

    async fn delete_record(&self, phone: &str) -> Result<(), String> {
        self.lock()?.records.remove(phone);
        Ok(())
    }

    async fn lockout_remaining(&self, phone: &str) -> Result<Option<i64>, String> {
        let inner = self.lock()?;
        Ok(inner
            .failures
            .get(phone)
            .and_then(|e| e.lock_remaining_seconds(Utc::now())))
    }

    async fn record_failure(
        &self,
        phone: &str,
        threshold: u32,
        lock_duration_seconds: i64,
        window_seconds: i64,
    ) -> Result<FailureStatus, String> {
        let mut inner = self.lock()?;
        let now = Utc::now();
        let entry = inner
            .failures
            .entry(phone.to_string())
            .or_insert_with(|| BruteForceEntry::new(phone.to_string(), now));

        entry.record_failure(now, threshold, lock_duration_seconds, window_seconds);
        Ok(FailureStatus {
            failed_attempts: entry.failed_attempts,
            locked_until: entry.locked_until,
        })
    }

    async fn clear_failures(&self, phone: &str) -> Result<(), String> {
        self.lock()?.failures.remove(phone);
        Ok(())
    }

    async fn snapshot(&self) -> Result<Vec<OtpRecord>, String> {
        let inner = self.lock()?;
        Ok(inner.records.values().cloned().collect())
    }
}
