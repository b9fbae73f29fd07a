//! Main OTP gatekeeper implementation.

use std::sync::Arc;

use chrono::Utc;
use constant_time_eq::constant_time_eq;
use tracing::{error, info, warn};

use crate::domain::entities::otp_record::{OtpRecord, VerificationId};
use crate::errors::{OtpError, OtpResult};

use super::config::OtpServiceConfig;
use super::phone::{is_valid_code_format, is_valid_mobile, mask_phone, normalize_phone};
use super::traits::{AttemptOutcome, DeliveryOutcome, OtpDelivery, OtpStore};
use super::types::{OtpDebugEntry, SendCodeOutcome};

/// Gatekeeper for phone-number verification.
///
/// Owns no state of its own: per-phone records live in the injected store,
/// outbound sends and provider-side code checks go through the injected
/// delivery adapter.
pub struct OtpService<D: OtpDelivery, S: OtpStore> {
    delivery: Arc<D>,
    store: Arc<S>,
    config: OtpServiceConfig,
}

impl<D: OtpDelivery, S: OtpStore> OtpService<D, S> {
    pub fn new(delivery: Arc<D>, store: Arc<S>, config: OtpServiceConfig) -> Self {
        Self {
            delivery,
            store,
            config,
        }
    }

    /// Issues a one-time code for `raw_phone`.
    ///
    /// Rejects invalid phone formats and sends inside the resend cooldown.
    /// Past the cooldown a new record atomically replaces any previous one
    /// for the phone (resend policy: reject while cooling down, replace
    /// after). Makes exactly one provider call; a transport or HTTP failure
    /// surfaces as [`OtpError::ProviderUnavailable`], while a 2xx reply
    /// without a usable session id degrades to a locally issued fallback id
    /// so the flow still completes.
    pub async fn request_code(&self, raw_phone: &str) -> OtpResult<SendCodeOutcome> {
        let phone = normalize_phone(raw_phone);
        if !is_valid_mobile(&phone) {
            warn!(
                phone = %mask_phone(&phone),
                event = "invalid_phone",
                "Rejected code request for malformed phone number"
            );
            return Err(OtpError::InvalidPhoneFormat);
        }

        if let Some(seconds) = self
            .store
            .cooldown_remaining(&phone, self.config.resend_cooldown_seconds)
            .await
            .map_err(OtpError::internal)?
        {
            warn!(
                phone = %mask_phone(&phone),
                cooldown_remaining = seconds,
                event = "resend_too_soon",
                "Code request rejected inside resend cooldown"
            );
            return Err(OtpError::ResendTooSoon { seconds });
        }

        let code = OtpRecord::generate_code();

        let outcome = match self.delivery.send_code(&phone, &code).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(
                    phone = %mask_phone(&phone),
                    error = %e,
                    event = "provider_send_failed",
                    "Delivery provider rejected the send"
                );
                return Err(OtpError::ProviderUnavailable);
            }
        };

        let verification_id = match outcome {
            DeliveryOutcome::Accepted { verification_id } => {
                VerificationId::Provider(verification_id)
            }
            DeliveryOutcome::Ambiguous => {
                warn!(
                    phone = %mask_phone(&phone),
                    event = "provider_ambiguous",
                    "Provider reply carried no session id, using local fallback"
                );
                VerificationId::LocalFallback(code.clone())
            }
        };
        let degraded = verification_id.is_fallback();

        self.store
            .put_record(OtpRecord::new(phone.clone(), verification_id))
            .await
            .map_err(OtpError::internal)?;

        info!(
            phone = %mask_phone(&phone),
            degraded = degraded,
            event = "otp_issued",
            "Issued verification code"
        );

        Ok(SendCodeOutcome {
            resend_after_seconds: self.config.resend_cooldown_seconds,
            degraded,
            echoed_code: self.config.echo_code.then(|| code),
        })
    }

    /// Verifies a submitted code for `raw_phone`.
    ///
    /// Precondition order: phone format, code format, brute-force lockout,
    /// record present and unexpired, attempt ceiling. The lockout check runs
    /// before the record lookup so a locked-out caller cannot use attempts
    /// to probe whether a flow is pending. Every outcome is terminal for
    /// this call.
    pub async fn verify_code(&self, raw_phone: &str, submitted: &str) -> OtpResult<()> {
        let phone = normalize_phone(raw_phone);
        if !is_valid_mobile(&phone) {
            return Err(OtpError::InvalidPhoneFormat);
        }

        if !is_valid_code_format(submitted, self.config.code_length) {
            warn!(
                phone = %mask_phone(&phone),
                code_length = submitted.len(),
                event = "invalid_code_format",
                "Rejected malformed verification code"
            );
            return Err(OtpError::InvalidOtpFormat);
        }

        if let Some(seconds) = self
            .store
            .lockout_remaining(&phone)
            .await
            .map_err(OtpError::internal)?
        {
            let minutes = (seconds + 59) / 60;
            warn!(
                phone = %mask_phone(&phone),
                lock_remaining_minutes = minutes,
                event = "verify_while_locked",
                "Verification attempt during brute-force lockout"
            );
            return Err(OtpError::TooManyAttempts { minutes });
        }

        let attempt = self
            .store
            .begin_attempt(&phone, self.config.code_ttl_seconds, self.config.max_attempts)
            .await
            .map_err(OtpError::internal)?;

        let (verification_id, attempts) = match attempt {
            AttemptOutcome::NoRecord | AttemptOutcome::Expired => {
                info!(
                    phone = %mask_phone(&phone),
                    event = "verify_no_live_record",
                    "No live verification flow for phone"
                );
                return Err(OtpError::VerificationExpired);
            }
            AttemptOutcome::Exhausted => {
                warn!(
                    phone = %mask_phone(&phone),
                    event = "attempts_exhausted",
                    "Attempt ceiling reached, forcing re-issuance"
                );
                return Err(OtpError::VerificationExpired);
            }
            AttemptOutcome::Pending {
                verification_id,
                attempts,
            } => (verification_id, attempts),
        };

        let matched = match &verification_id {
            VerificationId::Provider(id) => {
                match self.delivery.check_code(id, submitted).await {
                    Ok(matched) => matched,
                    Err(e) => {
                        error!(
                            phone = %mask_phone(&phone),
                            error = %e,
                            event = "provider_check_failed",
                            "Delivery provider could not check the code"
                        );
                        return Err(OtpError::ProviderUnavailable);
                    }
                }
            }
            VerificationId::LocalFallback(expected) => {
                constant_time_compare(expected, submitted)
            }
        };

        if matched {
            self.store
                .delete_record(&phone)
                .await
                .map_err(OtpError::internal)?;
            self.store
                .clear_failures(&phone)
                .await
                .map_err(OtpError::internal)?;
            info!(
                phone = %mask_phone(&phone),
                event = "otp_verified",
                "Phone number verified"
            );
            Ok(())
        } else {
            let status = self
                .store
                .record_failure(
                    &phone,
                    self.config.lock_threshold,
                    self.config.lock_duration_seconds,
                    self.config.failure_window_seconds,
                )
                .await
                .map_err(OtpError::internal)?;
            warn!(
                phone = %mask_phone(&phone),
                attempts = attempts,
                failed_attempts = status.failed_attempts,
                locked = status.locked_until.is_some(),
                event = "otp_mismatch",
                "Wrong verification code submitted"
            );
            Err(OtpError::WrongOtpProvided)
        }
    }

    /// Debug/admin affordance: unconditionally drops brute-force state for
    /// a phone, lifting any active lockout.
    pub async fn clear_brute_force(&self, raw_phone: &str) -> OtpResult<()> {
        let phone = normalize_phone(raw_phone);
        self.store
            .clear_failures(&phone)
            .await
            .map_err(OtpError::internal)?;
        info!(
            phone = %mask_phone(&phone),
            event = "brute_force_cleared",
            "Brute-force state cleared"
        );
        Ok(())
    }

    /// Debug/admin affordance: redacted snapshot of every live record.
    pub async fn dump_state(&self) -> OtpResult<Vec<OtpDebugEntry>> {
        let now = Utc::now();
        let records = self.store.snapshot().await.map_err(OtpError::internal)?;

        Ok(records
            .into_iter()
            .map(|record| OtpDebugEntry {
                verification_id: record.verification_id.redacted(),
                attempts: record.attempts,
                max_attempts: self.config.max_attempts,
                time_elapsed: record.time_elapsed(now),
                expires_in: record.expires_in(now, self.config.code_ttl_seconds),
                is_expired: record.is_expired_at(now, self.config.code_ttl_seconds),
                phone: record.phone,
            })
            .collect())
    }
}

/// Constant-time comparison of two codes, tolerant of length mismatch.
fn constant_time_compare(expected: &str, submitted: &str) -> bool {
    if expected.len() != submitted.len() {
        return false;
    }
    constant_time_eq(expected.as_bytes(), submitted.as_bytes())
}
