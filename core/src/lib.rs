//! Core domain and business logic for the TiffinBox backend.
//!
//! This crate contains the OTP gatekeeper: the domain entities for
//! one-time-code issuance and brute-force accounting, the service that
//! orchestrates them, and the error taxonomy surfaced to the HTTP layer.
//! All I/O (delivery provider, per-phone store) is reached through trait
//! seams implemented in the infrastructure crate.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types
pub use errors::{OtpError, OtpResult};
pub use services::otp::{
    OtpDelivery, OtpService, OtpServiceConfig, OtpStore,
};
