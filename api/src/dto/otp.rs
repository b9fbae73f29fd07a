use serde::{Deserialize, Serialize};
use validator::Validate;

use tb_core::services::otp::OtpDebugEntry;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendOtpRequest {
    /// 10-digit Indian mobile number, with or without the +91 prefix
    #[validate(length(min = 10, max = 20))]
    pub phone: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    /// 10-digit Indian mobile number, with or without the +91 prefix
    #[validate(length(min = 10, max = 20))]
    pub phone: String,

    /// 6-digit verification code
    #[validate(length(equal = 6))]
    pub otp: String,
}

/// Common acknowledgement body for the OTP endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct OtpAck {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Seconds until another code may be requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resend_after: Option<i64>,

    /// Present only when the dev-only echo flag is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DebugCommand {
    pub action: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DebugDump {
    pub success: bool,
    pub count: usize,
    pub records: Vec<OtpDebugEntry>,
}
