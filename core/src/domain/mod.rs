//! Domain layer: entities owned by the OTP gatekeeper.

pub mod entities;
