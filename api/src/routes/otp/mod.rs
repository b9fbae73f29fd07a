//! OTP endpoint handlers.

pub mod debug;
pub mod send;
pub mod verify;

use std::sync::Arc;

use tb_core::services::otp::{OtpDelivery, OtpService, OtpStore};

pub use debug::{debug_command, dump_otp_state};
pub use send::send_otp;
pub use verify::verify_otp;

/// Shared application state injected into every handler.
pub struct AppState<D: OtpDelivery, S: OtpStore> {
    pub otp: Arc<OtpService<D, S>>,
}
