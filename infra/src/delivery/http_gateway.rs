//! HTTP gateway for a 2Factor-style OTP delivery provider.
//!
//! The provider exposes two GET endpoints:
//!
//! - send: `{base}/{api_key}/SMS/{phone}/{code}/{template}` replying
//!   `{"Status": "Success", "Details": "<session-id>"}`
//! - verify: `{base}/{api_key}/SMS/VERIFY/{session_id}/{code}` replying
//!   `Details: "OTP Matched"` on a match
//!
//! Deployed gateways are known to return 2xx replies whose body is not the
//! documented shape. Those sends did go out, so they are reported as
//! [`DeliveryOutcome::Ambiguous`] and the gatekeeper falls back to local
//! verification instead of failing the user flow.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use tb_core::services::otp::phone::mask_phone;
use tb_core::services::otp::{DeliveryOutcome, OtpDelivery};

use crate::InfraError;

/// Delivery gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Provider API base URL
    pub base_url: String,
    /// Provider API key
    pub api_key: String,
    /// SMS template name registered with the provider
    pub template: String,
    /// Timeout for provider requests in seconds
    pub request_timeout_secs: u64,
}

impl GatewayConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, InfraError> {
        let api_key = std::env::var("OTP_PROVIDER_API_KEY")
            .map_err(|_| InfraError::Config("OTP_PROVIDER_API_KEY not set".to_string()))?;

        Ok(Self {
            base_url: std::env::var("OTP_PROVIDER_BASE_URL")
                .unwrap_or_else(|_| "https://2factor.in/API/V1".to_string()),
            api_key,
            template: std::env::var("OTP_PROVIDER_TEMPLATE")
                .unwrap_or_else(|_| "OTP1".to_string()),
            request_timeout_secs: std::env::var("OTP_PROVIDER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        })
    }
}

/// Provider reply envelope. Extra fields are ignored.
#[derive(Debug, Deserialize)]
struct GatewayReply {
    #[serde(rename = "Status")]
    status: Option<String>,
    #[serde(rename = "Details")]
    details: Option<String>,
}

/// Production delivery adapter backed by `reqwest`.
pub struct HttpOtpGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpOtpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, InfraError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            base_url = %config.base_url,
            "OTP delivery gateway initialized"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self, InfraError> {
        Self::new(GatewayConfig::from_env()?)
    }

    fn send_url(&self, phone: &str, code: &str) -> String {
        format!(
            "{}/{}/SMS/{}/{}/{}",
            self.config.base_url, self.config.api_key, phone, code, self.config.template
        )
    }

    fn verify_url(&self, session_id: &str, code: &str) -> String {
        format!(
            "{}/{}/SMS/VERIFY/{}/{}",
            self.config.base_url, self.config.api_key, session_id, code
        )
    }
}

#[async_trait]
impl OtpDelivery for HttpOtpGateway {
    async fn send_code(&self, phone: &str, code: &str) -> Result<DeliveryOutcome, String> {
        let response = self
            .client
            .get(self.send_url(phone, code))
            .send()
            .await
            .map_err(|e| format!("provider request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("provider returned HTTP {}", status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| format!("provider response unreadable: {}", e))?;

        match parse_send_reply(&body) {
            SendReply::Accepted(session_id) => {
                debug!(
                    phone = %mask_phone(phone),
                    session_id = %session_id,
                    "Provider accepted send"
                );
                Ok(DeliveryOutcome::Accepted {
                    verification_id: session_id,
                })
            }
            SendReply::Rejected(details) => Err(format!("provider rejected send: {}", details)),
            SendReply::Ambiguous => {
                warn!(
                    phone = %mask_phone(phone),
                    "Provider reply had no usable session id"
                );
                Ok(DeliveryOutcome::Ambiguous)
            }
        }
    }

    async fn check_code(&self, verification_id: &str, code: &str) -> Result<bool, String> {
        let response = self
            .client
            .get(self.verify_url(verification_id, code))
            .send()
            .await
            .map_err(|e| format!("provider request failed: {}", e))?;

        let status = response.status();
        // The provider signals a mismatch with a 400-class reply carrying
        // an explanatory body, so only 5xx is treated as an outage here.
        if status.is_server_error() {
            return Err(format!("provider returned HTTP {}", status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| format!("provider response unreadable: {}", e))?;

        Ok(is_match_reply(&body))
    }
}

enum SendReply {
    Accepted(String),
    Rejected(String),
    Ambiguous,
}

/// Classify the body of a 2xx send reply.
fn parse_send_reply(body: &str) -> SendReply {
    let reply: GatewayReply = match serde_json::from_str(body) {
        Ok(reply) => reply,
        Err(_) => return SendReply::Ambiguous,
    };

    match (reply.status.as_deref(), reply.details) {
        (Some("Success"), Some(details)) if !details.is_empty() => SendReply::Accepted(details),
        (Some("Error"), Some(details)) => SendReply::Rejected(details),
        _ => SendReply::Ambiguous,
    }
}

/// Whether a verify reply indicates a matching code. Anything that is not
/// an explicit success reads as a mismatch.
fn is_match_reply(body: &str) -> bool {
    let reply: GatewayReply = match serde_json::from_str(body) {
        Ok(reply) => reply,
        Err(_) => return false,
    };

    reply.status.as_deref() == Some("Success")
        && reply.details.as_deref() == Some("OTP Matched")
}
