//! Domain entities representing per-phone verification state.

pub mod brute_force;
pub mod otp_record;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use brute_force::{
    BruteForceEntry, FAILURE_WINDOW_SECONDS, LOCK_DURATION_SECONDS, LOCK_THRESHOLD,
};
pub use otp_record::{
    OtpRecord, VerificationId, CODE_LENGTH, CODE_TTL_SECONDS, MAX_ATTEMPTS,
    RESEND_COOLDOWN_SECONDS,
};
