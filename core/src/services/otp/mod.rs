//! OTP gatekeeper service.
//!
//! Issues one-time codes bound to a phone number, enforces the resend
//! cooldown and per-phone attempt/lockout limits, validates submitted codes
//! against the delivery provider (or a local fallback when the provider
//! response was ambiguous), and exposes a redacted debug snapshot of the
//! live store.

mod config;
mod service;
mod traits;
mod types;

pub mod phone;

#[cfg(test)]
mod tests;

pub use config::OtpServiceConfig;
pub use service::OtpService;
pub use traits::{AttemptOutcome, DeliveryOutcome, FailureStatus, OtpDelivery, OtpStore};
pub use types::{OtpDebugEntry, SendCodeOutcome};
