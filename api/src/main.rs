use std::sync::Arc;

use actix_web::{web, HttpServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tb_api::app::create_app;
use tb_api::config::Settings;
use tb_api::routes::otp::AppState;
use tb_core::services::otp::{OtpDelivery, OtpService, OtpServiceConfig, OtpStore};
use tb_infra::{HttpOtpGateway, MemoryOtpStore, MockOtpDelivery};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env();
    info!(
        environment = %settings.environment,
        mock_delivery = settings.use_mock_delivery,
        debug_endpoints = settings.debug_endpoints,
        "Starting TiffinBox OTP gatekeeper"
    );

    let store = Arc::new(MemoryOtpStore::new());
    let otp_config = OtpServiceConfig {
        echo_code: settings.echo_code,
        ..OtpServiceConfig::default()
    };

    if settings.use_mock_delivery {
        run(Arc::new(MockOtpDelivery::new()), store, otp_config, settings).await
    } else {
        let gateway = HttpOtpGateway::from_env()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
        run(Arc::new(gateway), store, otp_config, settings).await
    }
}

async fn run<D, S>(
    delivery: Arc<D>,
    store: Arc<S>,
    otp_config: OtpServiceConfig,
    settings: Settings,
) -> std::io::Result<()>
where
    D: OtpDelivery + 'static,
    S: OtpStore + 'static,
{
    let bind_address = settings.bind_address();
    info!(%bind_address, "Server binding");

    let state = web::Data::new(AppState {
        otp: Arc::new(OtpService::new(delivery, store, otp_config)),
    });
    let debug_endpoints = settings.debug_endpoints;

    HttpServer::new(move || create_app(state.clone(), debug_endpoints))
        .bind(&bind_address)?
        .run()
        .await
}
