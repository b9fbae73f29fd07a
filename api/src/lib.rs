//! HTTP surface for the TiffinBox OTP gatekeeper.
//!
//! Exposes `/otp/send`, `/otp/verify`, the flag-gated `/otp/debug`
//! endpoints, and `/health`. All business rules live in `tb_core`; this
//! crate only parses requests, maps gatekeeper errors to HTTP responses,
//! and wires the application together.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
