//! Tests for the OTP gatekeeper service.
