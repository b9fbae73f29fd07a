//! CORS configuration for the web storefront.
//!
//! Development is permissive for local testing; production restricts
//! origins to the configured storefront domains.
//!
//! # Environment Variables
//! - `ENVIRONMENT`: set to "production" for the restricted policy
//! - `ALLOWED_ORIGINS`: comma-separated origins (production only)
//! - `CORS_MAX_AGE`: preflight cache lifetime in seconds (default 3600)

use actix_cors::Cors;
use actix_web::http::{header, Method};
use std::env;
use tracing::info;

pub fn create_cors() -> Cors {
    let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
    let max_age = env::var("CORS_MAX_AGE")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(3600);

    if environment == "production" {
        create_production_cors(max_age)
    } else {
        create_development_cors(max_age)
    }
}

fn create_development_cors(max_age: usize) -> Cors {
    info!("Configuring CORS for development environment");

    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allow_any_header()
        .max_age(max_age)
}

fn create_production_cors(max_age: usize) -> Cors {
    info!("Configuring CORS for production environment");

    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(max_age);

    let allowed = env::var("ALLOWED_ORIGINS").unwrap_or_default();
    for origin in allowed.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        cors = cors.allowed_origin(origin);
    }

    cors
}
