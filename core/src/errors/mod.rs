//! Error taxonomy for the OTP gatekeeper.
//!
//! Every failure of the gatekeeper is converted to one of these variants
//! before it reaches the HTTP layer; nothing propagates as a panic or an
//! opaque error. The stable `error_code` strings are the contract consumed
//! by the web UI.

use thiserror::Error;

/// Result alias used throughout the gatekeeper.
pub type OtpResult<T> = Result<T, OtpError>;

/// User-facing failures of the OTP issuance and verification flow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("Invalid phone number. Please enter a 10-digit Indian mobile number")]
    InvalidPhoneFormat,

    #[error("Invalid code format. Please enter the 6-digit code you received")]
    InvalidOtpFormat,

    #[error("Please wait {seconds} seconds before requesting a new code")]
    ResendTooSoon { seconds: i64 },

    #[error("Could not send the verification code. Please try again later")]
    ProviderUnavailable,

    #[error("Too many failed attempts. Try again in {minutes} minutes")]
    TooManyAttempts { minutes: i64 },

    #[error("Verification expired. Please request a new code")]
    VerificationExpired,

    #[error("Incorrect verification code")]
    WrongOtpProvided,

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl OtpError {
    /// Stable machine-readable code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            OtpError::InvalidPhoneFormat => "INVALID_PHONE_FORMAT",
            OtpError::InvalidOtpFormat => "INVALID_OTP_FORMAT",
            OtpError::ResendTooSoon { .. } => "RESEND_TOO_SOON",
            OtpError::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            OtpError::TooManyAttempts { .. } => "TOO_MANY_ATTEMPTS",
            OtpError::VerificationExpired => "VERIFICATION_EXPIRED",
            OtpError::WrongOtpProvided => "WRONG_OTP_PROVIDED",
            OtpError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Wraps a store or adapter error message.
    pub fn internal(message: impl Into<String>) -> Self {
        OtpError::Internal {
            message: message.into(),
        }
    }
}
