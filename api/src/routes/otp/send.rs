use actix_web::{web, HttpResponse};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use tb_core::services::otp::phone::mask_phone;
use tb_core::services::otp::{OtpDelivery, OtpStore};
use tb_core::OtpError;

use crate::dto::{OtpAck, SendOtpRequest};
use crate::handlers::error_response;

use super::AppState;

/// Handler for `POST /otp/send`.
///
/// Issues a one-time code for the submitted phone number. The code itself
/// is never part of the response outside the dev-only echo mode.
pub async fn send_otp<D, S>(
    state: web::Data<AppState<D, S>>,
    request: web::Json<SendOtpRequest>,
) -> HttpResponse
where
    D: OtpDelivery + 'static,
    S: OtpStore + 'static,
{
    let request_id = Uuid::new_v4();

    if request.validate().is_err() {
        return error_response(&OtpError::InvalidPhoneFormat);
    }

    info!(
        %request_id,
        phone = %mask_phone(&request.phone),
        "Processing send request"
    );

    match state.otp.request_code(&request.phone).await {
        Ok(outcome) => HttpResponse::Ok().json(OtpAck {
            success: true,
            message: Some("Verification code sent".to_string()),
            resend_after: Some(outcome.resend_after_seconds),
            code: outcome.echoed_code,
        }),
        Err(err) => error_response(&err),
    }
}
