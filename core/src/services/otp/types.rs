//! Result types for the OTP gatekeeper operations.

use serde::Serialize;

/// Result of a successful code issuance.
#[derive(Debug, Clone)]
pub struct SendCodeOutcome {
    /// Seconds until the caller may request another code
    pub resend_after_seconds: i64,
    /// True when the provider reply was ambiguous and verification will run
    /// against the local fallback
    pub degraded: bool,
    /// The generated code, present only when the dev-only echo flag is set
    pub echoed_code: Option<String>,
}

/// Redacted view of one live OTP record, for the debug dump.
#[derive(Debug, Clone, Serialize)]
pub struct OtpDebugEntry {
    pub phone: String,
    /// Redacted verification id; fallback codes are never exposed
    pub verification_id: String,
    pub attempts: u32,
    pub max_attempts: u32,
    /// Seconds since issuance
    pub time_elapsed: i64,
    /// Seconds until expiry, zero once past
    pub expires_in: i64,
    pub is_expired: bool,
}
