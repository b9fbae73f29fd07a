//! OTP record entity for phone-number verification.

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

/// Length of the one-time code
pub const CODE_LENGTH: usize = 6;

/// Maximum number of verification attempts per issued code
pub const MAX_ATTEMPTS: u32 = 3;

/// Validity window of an issued code, in seconds
pub const CODE_TTL_SECONDS: i64 = 300;

/// Minimum interval between code issuances for the same phone, in seconds
pub const RESEND_COOLDOWN_SECONDS: i64 = 60;

/// Handle correlating a send request with its later verify request.
///
/// The delivery provider normally returns an opaque session id. When the
/// provider accepts the send but replies with an unusable payload, the
/// gatekeeper degrades to a locally issued fallback that carries the
/// generated code itself, so verification can proceed without the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationId {
    /// Session id issued by the delivery provider
    Provider(String),
    /// Locally issued fallback holding the generated code
    LocalFallback(String),
}

impl VerificationId {
    /// Whether this id was issued locally because the provider response
    /// was ambiguous.
    pub fn is_fallback(&self) -> bool {
        matches!(self, VerificationId::LocalFallback(_))
    }

    /// Rendering safe for logs and the debug dump. The fallback code is
    /// never exposed.
    pub fn redacted(&self) -> String {
        match self {
            VerificationId::Provider(id) => id.clone(),
            VerificationId::LocalFallback(_) => "local_fallback".to_string(),
        }
    }
}

/// One live verification flow per phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Normalized local phone number (country code stripped)
    pub phone: String,

    /// Correlation handle for the verify step
    pub verification_id: VerificationId,

    /// Timestamp of the most recent issuance
    pub issued_at: DateTime<Utc>,

    /// Number of verification attempts made against this record
    pub attempts: u32,
}

impl OtpRecord {
    /// Creates a record for a freshly issued code with zero attempts.
    pub fn new(phone: String, verification_id: VerificationId) -> Self {
        Self {
            phone,
            verification_id,
            issued_at: Utc::now(),
            attempts: 0,
        }
    }

    /// Generates a random 6-digit code using the OS CSPRNG.
    pub fn generate_code() -> String {
        let mut bytes = [0u8; 4];
        OsRng.fill_bytes(&mut bytes);
        let num = u32::from_le_bytes(bytes);
        // Modulo bias over 6 digits is negligible
        format!("{:06}", num % 1_000_000)
    }

    /// Whether the record has outlived its validity window at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl_seconds: i64) -> bool {
        now > self.issued_at + Duration::seconds(ttl_seconds)
    }

    /// Whether the record has outlived the default validity window.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now(), CODE_TTL_SECONDS)
    }

    /// Whether the attempt ceiling has been reached.
    pub fn attempts_exhausted(&self, max_attempts: u32) -> bool {
        self.attempts >= max_attempts
    }

    /// Seconds until a new code may be issued for this phone, or `None`
    /// if the cooldown has already passed.
    pub fn cooldown_remaining(&self, now: DateTime<Utc>, cooldown_seconds: i64) -> Option<i64> {
        let ready_at = self.issued_at + Duration::seconds(cooldown_seconds);
        let remaining = (ready_at - now).num_seconds();
        if remaining > 0 {
            Some(remaining)
        } else {
            None
        }
    }

    /// Seconds elapsed since issuance.
    pub fn time_elapsed(&self, now: DateTime<Utc>) -> i64 {
        (now - self.issued_at).num_seconds().max(0)
    }

    /// Seconds until expiry, clamped to zero once past.
    pub fn expires_in(&self, now: DateTime<Utc>, ttl_seconds: i64) -> i64 {
        let expires_at = self.issued_at + Duration::seconds(ttl_seconds);
        (expires_at - now).num_seconds().max(0)
    }
}
