// End-to-end staged validation of the mock verification endpoint.
// Each stage short-circuits: the earliest violated stage names the error.

#[cfg(test)]
mod test {

    use std::net::SocketAddr;

    use http::StatusCode;
    use serde_json::{json, Value};
    use tokio::task::JoinHandle;

    use crate::config::settings::{MetricsConfig, MockConfig};
    use crate::helpers::time::now_i64;
    use crate::observability::metrics::get_metrics;
    use crate::server::register::REQUIRED_DETAIL_FIELDS;
    use crate::server::server::{register_router, AppState};
    use crate::tests::common::{build_reqwest_client, sample_jwt, spawn_axum};

    const AUDIENCE: &str = "api://identity-verification";

    fn claims_mock() -> MockConfig {
        MockConfig {
            expected_audience: AUDIENCE.into(),
            static_token: "mock_token_123".into(),
            claims: true,
        }
    }

    fn static_mock() -> MockConfig {
        MockConfig {
            claims: false,
            ..claims_mock()
        }
    }

    async fn spawn_register_server(mock: MockConfig) -> (JoinHandle<()>, SocketAddr) {
        let metrics = get_metrics().await;
        let state = AppState::new(metrics, &mock);
        spawn_axum(register_router().with_state(state)).await
    }

    fn valid_details() -> Value {
        json!({
            "clientName": "my-client",
            "globalTransactionId": "txn-001",
            "recordRestricted": false,
            "registerAccessed": true,
            "requestId": "req-001",
            "requestReason": "Verification",
            "requestTimestamp": "2025-04-23T12:00:00Z",
            "requesterType": "internal",
            "subjectRegisterId": "subject-12345"
        })
    }

    fn valid_body() -> Value {
        json!({ "serviceAccessDataDetails": valid_details() })
    }

    struct Req<'a> {
        register_type: &'a str,
        ars_id: &'a str,
        token: Option<String>,
        correlation_id: Option<&'a str>,
        client_name: Option<&'a str>,
        body: Value,
    }

    impl Default for Req<'_> {
        fn default() -> Self {
            Self {
                register_type: "verified-identity",
                ars_id: "ARS12345",
                token: Some(sample_jwt(AUDIENCE, now_i64() + 60)),
                correlation_id: Some("test-corr-id"),
                client_name: Some("my-client"),
                body: valid_body(),
            }
        }
    }

    async fn post_register(addr: SocketAddr, req: Req<'_>) -> reqwest::Response {
        let url = format!(
            "http://{}/register/{}/{}",
            addr, req.register_type, req.ars_id
        );
        let mut builder = build_reqwest_client().post(&url).json(&req.body);
        if let Some(token) = &req.token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(corr) = req.correlation_id {
            builder = builder.header("CorrelationId", corr);
        }
        if let Some(name) = req.client_name {
            builder = builder.header("ClientName", name);
        }
        builder.send().await.expect("request failed")
    }

    async fn error_of(response: reqwest::Response) -> String {
        let body: Value = response.json().await.expect("error body is JSON");
        body["error"].as_str().expect("error field").to_string()
    }

    #[tokio::test]
    async fn happy_path_returns_synthetic_record() {
        let (handle, addr) = spawn_register_server(claims_mock()).await;

        let response = post_register(addr, Req::default()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let record: Value = response.json().await.unwrap();
        assert_eq!(record["registerKey"], "ARS12345");
        assert_eq!(record["identityStatus"], "Verified");
        // booleans stay booleans through the wire
        assert!(record["genderInDispute"].is_boolean());
        assert!(record["dateOfBirthInDispute"].is_boolean());
        assert!(record["personName"]["nameInDispute"].is_boolean());
        assert!(record["entryNumber"].is_u64());
        assert!(record["verificationDate"]["expiryDate"].is_string());

        handle.abort();
    }

    #[tokio::test]
    async fn static_variant_accepts_configured_token_only() {
        let (handle, addr) = spawn_register_server(static_mock()).await;

        let ok = post_register(
            addr,
            Req {
                token: Some("mock_token_123".into()),
                ..Req::default()
            },
        )
        .await;
        assert_eq!(ok.status(), StatusCode::OK);

        let rejected = post_register(
            addr,
            Req {
                token: Some("some-other-token".into()),
                ..Req::default()
            },
        )
        .await;
        assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);

        handle.abort();
    }

    #[tokio::test]
    async fn missing_authorization_header_is_unauthorized() {
        let (handle, addr) = spawn_register_server(claims_mock()).await;

        let response = post_register(
            addr,
            Req {
                token: None,
                ..Req::default()
            },
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(error_of(response).await.contains("bearer token"));

        handle.abort();
    }

    #[tokio::test]
    async fn wrong_audience_rejected_before_any_later_stage() {
        let (handle, addr) = spawn_register_server(claims_mock()).await;

        // every later stage is also violated; the auth stage must win
        let response = post_register(
            addr,
            Req {
                token: Some(sample_jwt("api://someone-else", now_i64() + 60)),
                correlation_id: None,
                client_name: None,
                register_type: "other-register",
                body: json!({}),
                ..Req::default()
            },
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(error_of(response).await.contains("audience"));

        handle.abort();
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        let (handle, addr) = spawn_register_server(claims_mock()).await;

        let response = post_register(
            addr,
            Req {
                token: Some(sample_jwt(AUDIENCE, now_i64() - 30)),
                ..Req::default()
            },
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(error_of(response).await.contains("expired"));

        handle.abort();
    }

    #[tokio::test]
    async fn malformed_token_is_unauthorized() {
        let (handle, addr) = spawn_register_server(claims_mock()).await;

        let response = post_register(
            addr,
            Req {
                token: Some("not-a-jwt".into()),
                ..Req::default()
            },
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(error_of(response).await.contains("malformed"));

        handle.abort();
    }

    #[tokio::test]
    async fn missing_required_headers_is_bad_request() {
        let (handle, addr) = spawn_register_server(claims_mock()).await;

        for req in [
            Req {
                correlation_id: None,
                ..Req::default()
            },
            Req {
                client_name: None,
                ..Req::default()
            },
            Req {
                client_name: Some(""),
                ..Req::default()
            },
        ] {
            let response = post_register(addr, req).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert!(error_of(response).await.contains("headers"));
        }

        handle.abort();
    }

    #[tokio::test]
    async fn unknown_register_type_is_bad_request() {
        let (handle, addr) = spawn_register_server(claims_mock()).await;

        // body is fully valid; the path stage still rejects
        let response = post_register(
            addr,
            Req {
                register_type: "disputed-identity",
                ..Req::default()
            },
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(error_of(response).await.contains("register type"));

        handle.abort();
    }

    #[tokio::test]
    async fn each_missing_body_field_is_named_alone() {
        let (handle, addr) = spawn_register_server(claims_mock()).await;

        for field in REQUIRED_DETAIL_FIELDS {
            let mut details = valid_details();
            details.as_object_mut().unwrap().remove(field);

            let response = post_register(
                addr,
                Req {
                    body: json!({ "serviceAccessDataDetails": details }),
                    ..Req::default()
                },
            )
            .await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);

            let error = error_of(response).await;
            assert!(error.contains(field), "error '{}' names '{}'", error, field);
            // only the removed field is reported
            assert!(error.ends_with(&format!("[{}]", field)), "error: {}", error);
        }

        handle.abort();
    }

    #[tokio::test]
    async fn body_without_details_object_is_bad_request() {
        let (handle, addr) = spawn_register_server(claims_mock()).await;

        for body in [json!({}), json!({"serviceAccessDataDetails": "not-an-object"})] {
            let response = post_register(
                addr,
                Req {
                    body,
                    ..Req::default()
                },
            )
            .await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert!(error_of(response)
                .await
                .contains("serviceAccessDataDetails"));
        }

        handle.abort();
    }

    #[tokio::test]
    async fn metrics_route_exposes_verification_counters() {
        let metrics = get_metrics().await;
        let mock = claims_mock();
        let state = AppState::new(metrics, &mock);
        let metrics_config = MetricsConfig {
            path: "/metrics".into(),
            is_enabled: true,
        };
        let app = register_router()
            .merge(state.metrics_state.router(&metrics_config))
            .with_state(state);
        let (handle, addr) = spawn_axum(app).await;

        // one accepted request so the counters have something to show
        let response = post_register(addr, Req::default()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let scrape = build_reqwest_client()
            .get(format!("http://{}/metrics", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(scrape.status(), StatusCode::OK);
        let text = scrape.text().await.unwrap();
        assert!(text.contains("idvagent_verify_requests_total"));

        handle.abort();
    }
}
