//! Environment-driven server settings.

use tracing::warn;

/// Runtime settings for the API server.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub environment: String,
    /// Use the mock delivery adapter instead of the HTTP gateway
    pub use_mock_delivery: bool,
    /// Register the `/otp/debug` introspection endpoints
    pub debug_endpoints: bool,
    /// Development-only: echo generated codes in send responses
    pub echo_code: bool,
}

impl Settings {
    /// Load settings from environment variables, with safe defaults.
    pub fn from_env() -> Self {
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080);

        let mut echo_code = env_flag("ECHO_OTP_CODE", false);
        // The echo affordance exists for local testing only
        if echo_code && environment == "production" {
            warn!("ECHO_OTP_CODE ignored in production");
            echo_code = false;
        }

        Self {
            host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            use_mock_delivery: std::env::var("OTP_DELIVERY")
                .map(|v| v != "gateway")
                .unwrap_or(true),
            debug_endpoints: env_flag("DEBUG_ENDPOINTS", false),
            echo_code,
            environment,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    parse_flag(std::env::var(name).ok(), default)
}

fn parse_flag(value: Option<String>, default: bool) -> bool {
    match value.as_deref() {
        Some("1") | Some("true") | Some("yes") => true,
        Some("0") | Some("false") | Some("no") => false,
        _ => default,
    }
}
