//! Business services containing the gatekeeper logic.

pub mod otp;

// Re-export commonly used types
pub use otp::{OtpDelivery, OtpService, OtpServiceConfig, OtpStore};
