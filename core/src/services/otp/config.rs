//! Configuration for the OTP gatekeeper service.

use crate::domain::entities::brute_force::{
    FAILURE_WINDOW_SECONDS, LOCK_DURATION_SECONDS, LOCK_THRESHOLD,
};
use crate::domain::entities::otp_record::{
    CODE_LENGTH, CODE_TTL_SECONDS, MAX_ATTEMPTS, RESEND_COOLDOWN_SECONDS,
};

/// Tunable limits for the gatekeeper. Defaults match the production values.
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Length of generated codes
    pub code_length: usize,
    /// Seconds an issued code stays valid
    pub code_ttl_seconds: i64,
    /// Minimum seconds between issuances for the same phone
    pub resend_cooldown_seconds: i64,
    /// Verification attempts allowed per issued code
    pub max_attempts: u32,
    /// Failed verifications within the window before lockout
    pub lock_threshold: u32,
    /// Lockout duration in seconds
    pub lock_duration_seconds: i64,
    /// Rolling window for failure counting, in seconds
    pub failure_window_seconds: i64,
    /// Development-only: echo the generated code back to the caller.
    /// Must never be enabled in production.
    pub echo_code: bool,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            code_length: CODE_LENGTH,
            code_ttl_seconds: CODE_TTL_SECONDS,
            resend_cooldown_seconds: RESEND_COOLDOWN_SECONDS,
            max_attempts: MAX_ATTEMPTS,
            lock_threshold: LOCK_THRESHOLD,
            lock_duration_seconds: LOCK_DURATION_SECONDS,
            failure_window_seconds: FAILURE_WINDOW_SECONDS,
            echo_code: false,
        }
    }
}
