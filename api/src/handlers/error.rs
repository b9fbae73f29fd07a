//! Mapping from gatekeeper errors to HTTP responses.
//!
//! Every `OtpError` becomes a JSON body `{ success, error, message }` with
//! a status from the fixed scheme: 400 for caller-input problems, 429 for
//! cooldown and lockout, 500 for provider or internal failures. Nothing
//! from the gatekeeper propagates as an unhandled error.

use actix_web::HttpResponse;
use tracing::error;

use tb_core::OtpError;

pub fn error_response(err: &OtpError) -> HttpResponse {
    let message = match err {
        // Internal details stay in the logs, not in the response
        OtpError::Internal { message } => {
            error!(detail = %message, "Internal gatekeeper error");
            "Something went wrong. Please try again later".to_string()
        }
        other => other.to_string(),
    };

    let body = serde_json::json!({
        "success": false,
        "error": err.error_code(),
        "message": message,
    });

    match err {
        OtpError::InvalidPhoneFormat
        | OtpError::InvalidOtpFormat
        | OtpError::WrongOtpProvided
        | OtpError::VerificationExpired => HttpResponse::BadRequest().json(body),

        OtpError::ResendTooSoon { .. } | OtpError::TooManyAttempts { .. } => {
            HttpResponse::TooManyRequests().json(body)
        }

        OtpError::ProviderUnavailable | OtpError::Internal { .. } => {
            HttpResponse::InternalServerError().json(body)
        }
    }
}
