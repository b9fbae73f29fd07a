//! End-to-end tests for the OTP HTTP surface.
//!
//! Runs the full send/verify/debug flow against the real service wired to
//! the in-memory store and the mock delivery adapter, with code echoing
//! enabled so tests can read the generated codes from responses.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{test, web};
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};

    use tb_api::app::create_app;
    use tb_api::routes::otp::AppState;
    use tb_core::domain::entities::otp_record::{OtpRecord, VerificationId};
    use tb_core::services::otp::{OtpService, OtpServiceConfig, OtpStore};
    use tb_infra::{MemoryOtpStore, MockOtpDelivery};

    const PHONE: &str = "9876543210";

    struct Harness {
        delivery: Arc<MockOtpDelivery>,
        store: Arc<MemoryOtpStore>,
        state: web::Data<AppState<MockOtpDelivery, MemoryOtpStore>>,
    }

    fn harness(config: OtpServiceConfig) -> Harness {
        let delivery = Arc::new(MockOtpDelivery::new());
        let store = Arc::new(MemoryOtpStore::new());
        let state = web::Data::new(AppState {
            otp: Arc::new(OtpService::new(delivery.clone(), store.clone(), config)),
        });
        Harness {
            delivery,
            store,
            state,
        }
    }

    fn echo_config() -> OtpServiceConfig {
        OtpServiceConfig {
            echo_code: true,
            ..OtpServiceConfig::default()
        }
    }

    /// A syntactically valid 6-digit code guaranteed not to match `code`.
    fn wrong_code(code: &str) -> String {
        if code == "000000" {
            "111111".to_string()
        } else {
            "000000".to_string()
        }
    }

    #[actix_web::test]
    async fn send_verify_roundtrip_consumes_the_code() {
        let h = harness(echo_config());
        let app = test::init_service(create_app(h.state.clone(), false)).await;

        // Send with the country prefix; verify without it
        let req = test::TestRequest::post()
            .uri("/otp/send")
            .set_json(json!({ "phone": format!("+91{}", PHONE) }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["resend_after"], 60);
        let code = body["code"].as_str().expect("echoed code").to_string();
        assert_eq!(code.len(), 6);
        assert_eq!(h.delivery.message_count(), 1);

        let req = test::TestRequest::post()
            .uri("/otp/verify")
            .set_json(json!({ "phone": PHONE, "otp": code }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);

        // Success consumed the record; replaying the same code fails
        let req = test::TestRequest::post()
            .uri("/otp/verify")
            .set_json(json!({ "phone": PHONE, "otp": code }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "VERIFICATION_EXPIRED");
    }

    #[actix_web::test]
    async fn send_rejects_invalid_phone() {
        let h = harness(OtpServiceConfig::default());
        let app = test::init_service(create_app(h.state.clone(), false)).await;

        // Ten digits but not a valid mobile prefix
        let req = test::TestRequest::post()
            .uri("/otp/send")
            .set_json(json!({ "phone": "1234567890" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "INVALID_PHONE_FORMAT");

        // Too short to even reach the service
        let req = test::TestRequest::post()
            .uri("/otp/send")
            .set_json(json!({ "phone": "98765" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "INVALID_PHONE_FORMAT");

        assert_eq!(h.delivery.message_count(), 0);
    }

    #[actix_web::test]
    async fn non_ascii_phone_gets_a_clean_rejection() {
        let h = harness(OtpServiceConfig::default());
        let app = test::init_service(create_app(h.state.clone(), false)).await;

        // Ten Devanagari digits pass the DTO length bound but normalize to
        // nothing, so the service rejects them without any panic
        let req = test::TestRequest::post()
            .uri("/otp/send")
            .set_json(json!({ "phone": "१२३४५६७८९०" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "INVALID_PHONE_FORMAT");
        assert_eq!(h.delivery.message_count(), 0);
    }

    #[actix_web::test]
    async fn cross_origin_requests_carry_cors_headers() {
        let h = harness(OtpServiceConfig::default());
        let app = test::init_service(create_app(h.state.clone(), false)).await;

        // Development CORS policy admits any origin
        let req = test::TestRequest::get()
            .uri("/health")
            .insert_header(("Origin", "http://localhost:3000"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        assert!(resp
            .headers()
            .contains_key("access-control-allow-origin"));
    }

    #[actix_web::test]
    async fn resend_inside_cooldown_is_rejected() {
        let h = harness(OtpServiceConfig::default());
        let app = test::init_service(create_app(h.state.clone(), false)).await;

        let req = test::TestRequest::post()
            .uri("/otp/send")
            .set_json(json!({ "phone": PHONE }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let req = test::TestRequest::post()
            .uri("/otp/send")
            .set_json(json!({ "phone": PHONE }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 429);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "RESEND_TOO_SOON");

        assert_eq!(h.delivery.message_count(), 1);
    }

    #[actix_web::test]
    async fn verify_rejects_malformed_code() {
        let h = harness(echo_config());
        let app = test::init_service(create_app(h.state.clone(), false)).await;

        let req = test::TestRequest::post()
            .uri("/otp/send")
            .set_json(json!({ "phone": PHONE }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        // Right length, not all digits
        let req = test::TestRequest::post()
            .uri("/otp/verify")
            .set_json(json!({ "phone": PHONE, "otp": "12ab56" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "INVALID_OTP_FORMAT");

        // Wrong length, rejected at the DTO layer
        let req = test::TestRequest::post()
            .uri("/otp/verify")
            .set_json(json!({ "phone": PHONE, "otp": "123" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "INVALID_OTP_FORMAT");
    }

    #[actix_web::test]
    async fn lockout_blocks_correct_code_until_cleared() {
        // Cooldown disabled so failures can accumulate across issuances
        let h = harness(OtpServiceConfig {
            resend_cooldown_seconds: 0,
            echo_code: true,
            ..OtpServiceConfig::default()
        });
        let app = test::init_service(create_app(h.state.clone(), true)).await;

        let send = || {
            test::TestRequest::post()
                .uri("/otp/send")
                .set_json(json!({ "phone": PHONE }))
                .to_request()
        };

        let resp = test::call_service(&app, send()).await;
        let body: Value = test::read_body_json(resp).await;
        let code = body["code"].as_str().expect("echoed code").to_string();
        let bad = wrong_code(&code);

        // Three failures exhaust this record's attempt ceiling
        for _ in 0..3 {
            let req = test::TestRequest::post()
                .uri("/otp/verify")
                .set_json(json!({ "phone": PHONE, "otp": bad }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 400);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "WRONG_OTP_PROVIDED");
        }

        // Re-issue and push the rolling failure count to the lock threshold
        let resp = test::call_service(&app, send()).await;
        let body: Value = test::read_body_json(resp).await;
        let code = body["code"].as_str().expect("echoed code").to_string();
        let bad = wrong_code(&code);
        for _ in 0..2 {
            let req = test::TestRequest::post()
                .uri("/otp/verify")
                .set_json(json!({ "phone": PHONE, "otp": bad }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 400);
        }

        // Locked out now, even with the correct code
        let req = test::TestRequest::post()
            .uri("/otp/verify")
            .set_json(json!({ "phone": PHONE, "otp": code }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 429);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "TOO_MANY_ATTEMPTS");

        // Admin clears the lock; the live record still has attempts left
        let req = test::TestRequest::post()
            .uri("/otp/debug")
            .set_json(json!({ "action": "clear-brute-force", "phone": PHONE }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let req = test::TestRequest::post()
            .uri("/otp/verify")
            .set_json(json!({ "phone": PHONE, "otp": code }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
    }

    #[actix_web::test]
    async fn stale_record_reads_as_expired_and_is_dropped() {
        let h = harness(OtpServiceConfig::default());
        let app = test::init_service(create_app(h.state.clone(), true)).await;

        let mut record = OtpRecord::new(
            PHONE.to_string(),
            VerificationId::LocalFallback("123456".to_string()),
        );
        record.issued_at = Utc::now() - Duration::seconds(301);
        h.store.put_record(record).await.unwrap();

        let req = test::TestRequest::post()
            .uri("/otp/verify")
            .set_json(json!({ "phone": PHONE, "otp": "123456" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "VERIFICATION_EXPIRED");

        // The stale record was deleted on access
        let req = test::TestRequest::get().uri("/otp/debug").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["count"], 0);
    }

    #[actix_web::test]
    async fn debug_endpoints_require_the_capability_flag() {
        let h = harness(OtpServiceConfig::default());
        let app = test::init_service(create_app(h.state.clone(), false)).await;

        let req = test::TestRequest::get().uri("/otp/debug").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);

        let req = test::TestRequest::post()
            .uri("/otp/debug")
            .set_json(json!({ "action": "clear-brute-force", "phone": PHONE }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);

        let app = test::init_service(create_app(h.state.clone(), true)).await;
        let req = test::TestRequest::get().uri("/otp/debug").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 0);
    }

    #[actix_web::test]
    async fn debug_dump_redacts_fallback_sessions() {
        let h = harness(echo_config());
        let app = test::init_service(create_app(h.state.clone(), true)).await;

        h.delivery.set_simulate_ambiguous(true);
        let req = test::TestRequest::post()
            .uri("/otp/send")
            .set_json(json!({ "phone": PHONE }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        let code = body["code"].as_str().expect("echoed code").to_string();

        let req = test::TestRequest::get().uri("/otp/debug").to_request();
        let resp = test::call_service(&app, req).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["records"][0]["verification_id"], "local_fallback");
        assert_eq!(body["records"][0]["phone"], PHONE);
        assert_eq!(body["records"][0]["is_expired"], false);

        // The fallback path still verifies without the provider
        let req = test::TestRequest::post()
            .uri("/otp/verify")
            .set_json(json!({ "phone": PHONE, "otp": code }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }

    #[actix_web::test]
    async fn unknown_debug_action_is_rejected() {
        let h = harness(OtpServiceConfig::default());
        let app = test::init_service(create_app(h.state.clone(), true)).await;

        let req = test::TestRequest::post()
            .uri("/otp/debug")
            .set_json(json!({ "action": "drop-everything", "phone": PHONE }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "UNSUPPORTED_ACTION");
    }

    #[actix_web::test]
    async fn provider_outage_surfaces_as_server_error() {
        let h = harness(OtpServiceConfig::default());
        let app = test::init_service(create_app(h.state.clone(), false)).await;

        h.delivery.set_simulate_failure(true);
        let req = test::TestRequest::post()
            .uri("/otp/send")
            .set_json(json!({ "phone": PHONE }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 500);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "PROVIDER_UNAVAILABLE");
    }

    #[actix_web::test]
    async fn echo_disabled_omits_code_from_response() {
        let h = harness(OtpServiceConfig::default());
        let app = test::init_service(create_app(h.state.clone(), false)).await;

        let req = test::TestRequest::post()
            .uri("/otp/send")
            .set_json(json!({ "phone": PHONE }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert!(body.get("code").is_none());
    }

    #[actix_web::test]
    async fn health_check_reports_healthy() {
        let h = harness(OtpServiceConfig::default());
        let app = test::init_service(create_app(h.state.clone(), false)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
    }
}
