//! Debug/introspection endpoints.
//!
//! Registered only when the `DEBUG_ENDPOINTS` capability flag is set;
//! these are diagnostic affordances for a trusted internal context and
//! must not be reachable in a production deployment.

use actix_web::{web, HttpResponse};
use tracing::info;

use tb_core::services::otp::phone::mask_phone;
use tb_core::services::otp::{OtpDelivery, OtpStore};

use crate::dto::{DebugCommand, DebugDump, OtpAck};
use crate::handlers::error_response;

use super::AppState;

/// Handler for `GET /otp/debug`: redacted snapshot of the live store.
pub async fn dump_otp_state<D, S>(state: web::Data<AppState<D, S>>) -> HttpResponse
where
    D: OtpDelivery + 'static,
    S: OtpStore + 'static,
{
    match state.otp.dump_state().await {
        Ok(records) => HttpResponse::Ok().json(DebugDump {
            success: true,
            count: records.len(),
            records,
        }),
        Err(err) => error_response(&err),
    }
}

/// Handler for `POST /otp/debug`.
pub async fn debug_command<D, S>(
    state: web::Data<AppState<D, S>>,
    request: web::Json<DebugCommand>,
) -> HttpResponse
where
    D: OtpDelivery + 'static,
    S: OtpStore + 'static,
{
    match request.action.as_str() {
        "clear-brute-force" => {
            info!(
                phone = %mask_phone(&request.phone),
                "Debug: clearing brute-force state"
            );
            match state.otp.clear_brute_force(&request.phone).await {
                Ok(()) => HttpResponse::Ok().json(OtpAck {
                    success: true,
                    message: Some("Brute-force state cleared".to_string()),
                    resend_after: None,
                    code: None,
                }),
                Err(err) => error_response(&err),
            }
        }
        other => HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "UNSUPPORTED_ACTION",
            "message": format!("Unknown debug action: {}", other),
        })),
    }
}
