//! Mock OTP delivery for development and testing.
//!
//! Logs codes instead of sending SMS, hands out synthetic session ids, and
//! remembers the session/code pairs so provider-side checks work end to end
//! against this adapter.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use tb_core::services::otp::phone::mask_phone;
use tb_core::services::otp::{DeliveryOutcome, OtpDelivery};

/// Development/test stand-in for the delivery provider.
#[derive(Clone, Default)]
pub struct MockOtpDelivery {
    sessions: Arc<Mutex<HashMap<String, String>>>,
    message_count: Arc<AtomicU64>,
    simulate_failure: Arc<AtomicBool>,
    simulate_ambiguous: Arc<AtomicBool>,
}

impl MockOtpDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of sends accepted by this mock.
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Make subsequent sends fail, as if the provider were down.
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// Make subsequent sends succeed with an unusable payload.
    pub fn set_simulate_ambiguous(&self, simulate: bool) {
        self.simulate_ambiguous.store(simulate, Ordering::SeqCst);
    }
}

#[async_trait]
impl OtpDelivery for MockOtpDelivery {
    async fn send_code(&self, phone: &str, code: &str) -> Result<DeliveryOutcome, String> {
        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(
                phone = %mask_phone(phone),
                "Mock delivery simulating provider outage"
            );
            return Err("simulated provider outage".to_string());
        }

        self.message_count.fetch_add(1, Ordering::SeqCst);

        if self.simulate_ambiguous.load(Ordering::SeqCst) {
            info!(
                phone = %mask_phone(phone),
                "Mock delivery simulating ambiguous provider reply"
            );
            return Ok(DeliveryOutcome::Ambiguous);
        }

        let session_id = format!("mock_{}", Uuid::new_v4());
        self.sessions
            .lock()
            .map_err(|_| "mock delivery mutex poisoned".to_string())?
            .insert(session_id.clone(), code.to_string());

        // Development convenience: the code is visible in local logs
        info!(
            phone = %mask_phone(phone),
            code = %code,
            session_id = %session_id,
            "Mock delivery: would send OTP SMS"
        );

        Ok(DeliveryOutcome::Accepted {
            verification_id: session_id,
        })
    }

    async fn check_code(&self, verification_id: &str, code: &str) -> Result<bool, String> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|_| "mock delivery mutex poisoned".to_string())?;
        Ok(sessions.get(verification_id).map(String::as_str) == Some(code))
    }
}
