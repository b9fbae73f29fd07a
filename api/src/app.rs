//! Application factory.
//!
//! Builds the Actix application from injected state; `main` decides which
//! delivery adapter and store back it.

use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use tb_core::services::otp::{OtpDelivery, OtpStore};

use crate::middleware::cors::create_cors;
use crate::routes::otp::{debug_command, dump_otp_state, send_otp, verify_otp, AppState};

/// Create and configure the application.
///
/// The debug endpoints are registered only when `debug_endpoints` is set;
/// without the flag the paths simply do not exist.
pub fn create_app<D, S>(
    app_state: web::Data<AppState<D, S>>,
    debug_endpoints: bool,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    D: OtpDelivery + 'static,
    S: OtpStore + 'static,
{
    let cors = create_cors();

    let mut otp_scope = web::scope("/otp")
        .route("/send", web::post().to(send_otp::<D, S>))
        .route("/verify", web::post().to(verify_otp::<D, S>));

    if debug_endpoints {
        otp_scope = otp_scope
            .route("/debug", web::get().to(dump_otp_state::<D, S>))
            .route("/debug", web::post().to(debug_command::<D, S>));
    }

    App::new()
        .app_data(app_state)
        .wrap(TracingLogger::default())
        .wrap(cors)
        .route("/health", web::get().to(health_check))
        .service(otp_scope)
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "tiffinbox-otp-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
