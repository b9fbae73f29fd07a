//! Request and response bodies for the OTP endpoints.

pub mod otp;

pub use otp::{DebugCommand, DebugDump, OtpAck, SendOtpRequest, VerifyOtpRequest};
