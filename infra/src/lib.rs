//! # Infrastructure layer
//!
//! Concrete implementations behind the gatekeeper's trait seams:
//!
//! - **Store**: process-local in-memory per-phone state (OTP records and
//!   brute-force counters). No persistence across restarts, by design.
//! - **Delivery**: HTTP gateway for a 2Factor-style OTP SMS provider, plus
//!   a mock delivery service for development and tests.

pub mod delivery;
pub mod store;

// Re-export commonly used types
pub use delivery::{GatewayConfig, HttpOtpGateway, MockOtpDelivery};
pub use store::MemoryOtpStore;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfraError {
    /// HTTP request error for the delivery provider
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
