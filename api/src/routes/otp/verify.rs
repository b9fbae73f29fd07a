use actix_web::{web, HttpResponse};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use tb_core::services::otp::phone::mask_phone;
use tb_core::services::otp::{OtpDelivery, OtpStore};
use tb_core::OtpError;

use crate::dto::{OtpAck, VerifyOtpRequest};
use crate::handlers::error_response;

use super::AppState;

/// Handler for `POST /otp/verify`.
pub async fn verify_otp<D, S>(
    state: web::Data<AppState<D, S>>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse
where
    D: OtpDelivery + 'static,
    S: OtpStore + 'static,
{
    let request_id = Uuid::new_v4();

    if let Err(validation_errors) = request.validate() {
        let err = if validation_errors.field_errors().contains_key("phone") {
            OtpError::InvalidPhoneFormat
        } else {
            OtpError::InvalidOtpFormat
        };
        return error_response(&err);
    }

    info!(
        %request_id,
        phone = %mask_phone(&request.phone),
        "Processing verify request"
    );

    match state.otp.verify_code(&request.phone, &request.otp).await {
        Ok(()) => HttpResponse::Ok().json(OtpAck {
            success: true,
            message: Some("Phone number verified successfully".to_string()),
            resend_after: None,
            code: None,
        }),
        Err(err) => error_response(&err),
    }
}
