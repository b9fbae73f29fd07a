//! OTP delivery provider adapters.

mod http_gateway;
mod mock;

#[cfg(test)]
mod tests;

pub use http_gateway::{GatewayConfig, HttpOtpGateway};
pub use mock::MockOtpDelivery;
