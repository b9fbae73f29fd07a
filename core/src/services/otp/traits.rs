//! Trait seams between the gatekeeper and its infrastructure.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::otp_record::{OtpRecord, VerificationId};

/// Result of asking the delivery provider to send a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Provider accepted the send and returned a session id
    Accepted { verification_id: String },
    /// Provider accepted the send but the payload carried no usable id;
    /// the gatekeeper degrades to a local fallback
    Ambiguous,
}

/// Outbound OTP delivery provider.
#[async_trait]
pub trait OtpDelivery: Send + Sync {
    /// Send a one-time code to a phone number. Exactly one provider call
    /// per invocation; no retries.
    async fn send_code(&self, phone: &str, code: &str) -> Result<DeliveryOutcome, String>;

    /// Ask the provider whether `code` matches the session identified by
    /// `verification_id`.
    async fn check_code(&self, verification_id: &str, code: &str) -> Result<bool, String>;
}

/// Outcome of atomically claiming one verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// No record exists for the phone
    NoRecord,
    /// The record had outlived its TTL and was deleted
    Expired,
    /// The attempt ceiling was already reached; the record was deleted
    Exhausted,
    /// An attempt was claimed; `attempts` is the post-increment count
    Pending {
        verification_id: VerificationId,
        attempts: u32,
    },
}

/// Brute-force state after recording a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureStatus {
    /// Failures within the current window, including this one
    pub failed_attempts: u32,
    /// Set when the phone is now locked out
    pub locked_until: Option<DateTime<Utc>>,
}

/// Ephemeral per-phone state store.
///
/// Every method is atomic with respect to the others; compound operations
/// such as [`begin_attempt`](OtpStore::begin_attempt) perform their whole
/// read-modify-write under the store's lock so concurrent requests for the
/// same phone cannot interleave mid-update.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Store a record, replacing any previous record for the phone.
    async fn put_record(&self, record: OtpRecord) -> Result<(), String>;

    /// Seconds left before a new code may be issued for the phone, or
    /// `None` when no live record blocks the send.
    async fn cooldown_remaining(
        &self,
        phone: &str,
        cooldown_seconds: i64,
    ) -> Result<Option<i64>, String>;

    /// Claim one verification attempt: look up the record, treat one past
    /// its TTL as absent (deleting it), reject one whose attempt ceiling is
    /// reached (deleting it), otherwise increment `attempts`.
    async fn begin_attempt(
        &self,
        phone: &str,
        ttl_seconds: i64,
        max_attempts: u32,
    ) -> Result<AttemptOutcome, String>;

    /// Delete the record for a phone, if any.
    async fn delete_record(&self, phone: &str) -> Result<(), String>;

    /// Seconds until an active lockout lifts, or `None` when not locked.
    async fn lockout_remaining(&self, phone: &str) -> Result<Option<i64>, String>;

    /// Record one failed verification, creating the entry if absent and
    /// locking the phone once `threshold` failures accumulate within the
    /// window.
    async fn record_failure(
        &self,
        phone: &str,
        threshold: u32,
        lock_duration_seconds: i64,
        window_seconds: i64,
    ) -> Result<FailureStatus, String>;

    /// Drop all brute-force state for a phone.
    async fn clear_failures(&self, phone: &str) -> Result<(), String>;

    /// Clone of every live OTP record, for the debug dump.
    async fn snapshot(&self) -> Result<Vec<OtpRecord>, String>;
}
