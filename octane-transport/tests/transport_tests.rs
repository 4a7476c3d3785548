use octane_transport::{
    Authentication, BinaryContent, ClientAuthentication, HttpRequest, SessionTransport,
    TransportConfig, TransportError, UserAuthentication,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SIGN_IN: &str = "/authentication/sign_in";
const SIGN_OUT: &str = "/authentication/sign_out";
const DEFECTS: &str = "/api/shared_spaces/1001/workspaces/1002/defects";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("octane_transport=trace")
        .with_test_writer()
        .try_init();
}

fn transport(server: &MockServer) -> SessionTransport {
    init_tracing();
    SessionTransport::new(TransportConfig::new(server.uri())).unwrap()
}

fn user() -> Arc<dyn Authentication> {
    Arc::new(UserAuthentication::new("sa@nga", "Welcome1"))
}

fn url(server: &MockServer) -> String {
    format!("{}{DEFECTS}", server.uri())
}

fn sign_in_ok(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).insert_header("set-cookie", format!("LWSSO_COOKIE_KEY={token}; Path=/; HttpOnly"))
}

fn error_body(code: &str, description: &str) -> serde_json::Value {
    serde_json::json!({ "error_code": code, "description": description })
}

async fn mount_sign_in(server: &MockServer, expected: u64) {
    Mock::given(method("POST"))
        .and(path(SIGN_IN))
        .respond_with(sign_in_ok("token-1"))
        .expect(expected)
        .mount(server)
        .await;
}

// ── Authentication ──────────────────────────────────────────────

#[tokio::test]
async fn authenticate_posts_credentials_and_stores_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIGN_IN))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({ "user": "sa@nga", "password": "Welcome1" })))
        .respond_with(sign_in_ok("abc"))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server);
    assert!(!transport.is_authenticated().await);

    transport.authenticate(user()).await.unwrap();
    assert!(transport.is_authenticated().await);
    assert_eq!(transport.session_cookie().await.as_deref(), Some("abc"));
}

#[tokio::test]
async fn authenticate_with_api_keys() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIGN_IN))
        .and(body_json(serde_json::json!({ "client_id": "key", "client_secret": "secret" })))
        .respond_with(sign_in_ok("abc"))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server);
    transport
        .authenticate(Arc::new(ClientAuthentication::new("key", "secret")))
        .await
        .unwrap();
    assert!(transport.is_authenticated().await);
}

#[tokio::test]
async fn rejected_sign_in_reports_server_error_and_forgets_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIGN_IN))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(error_body("platform.authentication_failed", "bad password")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DEFECTS))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server);
    let err = transport.authenticate(user()).await.unwrap_err();
    match &err {
        TransportError::AuthenticationFailed(error) => {
            assert_eq!(error.description(), Some("bad password"));
            assert_eq!(error.error_code(), Some("platform.authentication_failed"));
        }
        other => panic!("expected AuthenticationFailed, got {other:?}"),
    }
    assert!(err.is_auth_failure());
    assert!(!transport.is_authenticated().await);

    // No stored credentials, so no re-authentication attempt.
    let err = transport.execute(&HttpRequest::get(url(&server))).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(matches!(err, TransportError::Server { .. }));
}

#[tokio::test]
async fn unreachable_server_fails_authentication() {
    init_tracing();
    let transport = SessionTransport::new(TransportConfig::new("http://127.0.0.1:1")).unwrap();
    let err = transport.authenticate(user()).await.unwrap_err();
    assert!(matches!(err, TransportError::AuthenticationFailed(_)));
    assert!(!transport.is_authenticated().await);
}

#[tokio::test]
async fn client_type_header_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIGN_IN))
        .and(header("HPECLIENTTYPE", "HPE_REST_API_TECH_PREVIEW"))
        .respond_with(sign_in_ok("abc"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DEFECTS))
        .and(header("HPECLIENTTYPE", "HPE_REST_API_TECH_PREVIEW"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server);
    let auth = UserAuthentication::new("u", "p").with_client_type("HPE_REST_API_TECH_PREVIEW");
    transport.authenticate(Arc::new(auth)).await.unwrap();
    transport.execute(&HttpRequest::get(url(&server))).await.unwrap();
}

// ── Cookies ─────────────────────────────────────────────────────

#[tokio::test]
async fn session_cookie_is_attached_to_requests() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(DEFECTS))
        .and(header("cookie", "LWSSO_COOKIE_KEY=token-1"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server);
    transport.authenticate(user()).await.unwrap();
    let response = transport.execute(&HttpRequest::get(url(&server))).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, "{}");
}

#[tokio::test]
async fn cookie_is_renewed_from_any_response() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(DEFECTS))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "LWSSO_COOKIE_KEY=token-2; Path=/")
                .set_body_string("{}"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server);
    transport.authenticate(user()).await.unwrap();
    assert_eq!(transport.session_cookie().await.as_deref(), Some("token-1"));

    transport.execute(&HttpRequest::get(url(&server))).await.unwrap();
    assert_eq!(transport.session_cookie().await.as_deref(), Some("token-2"));
}

#[tokio::test]
async fn unrelated_cookies_leave_session_untouched() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(DEFECTS))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "JSESSIONID=xyz; Path=/"))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server);
    transport.authenticate(user()).await.unwrap();
    transport.execute(&HttpRequest::get(url(&server))).await.unwrap();
    assert_eq!(transport.session_cookie().await.as_deref(), Some("token-1"));
}

// ── Re-authentication ───────────────────────────────────────────

#[tokio::test]
async fn expired_session_is_renewed_and_request_retried_once() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 2).await;
    Mock::given(method("GET"))
        .and(path(DEFECTS))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DEFECTS))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server);
    transport.authenticate(user()).await.unwrap();
    let response = transport.execute(&HttpRequest::get(url(&server))).await.unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn forbidden_also_triggers_reauthentication() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 2).await;
    Mock::given(method("DELETE"))
        .and(path(DEFECTS))
        .respond_with(ResponseTemplate::new(403))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(DEFECTS))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server);
    transport.authenticate(user()).await.unwrap();
    transport.execute(&HttpRequest::delete(url(&server))).await.unwrap();
}

#[tokio::test]
async fn persistent_rejection_exhausts_the_single_retry() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 2).await;
    Mock::given(method("GET"))
        .and(path(DEFECTS))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_body("platform.unauthorized", "no access")))
        .expect(2)
        .mount(&server)
        .await;

    let transport = transport(&server);
    transport.authenticate(user()).await.unwrap();
    let err = transport.execute(&HttpRequest::get(url(&server))).await.unwrap_err();
    match err {
        TransportError::RetryExhausted { status, error } => {
            assert_eq!(status, 401);
            assert_eq!(error.description(), Some("no access"));
        }
        other => panic!("expected RetryExhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_reauthentication_surfaces_original_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIGN_IN))
        .respond_with(sign_in_ok("token-1"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(SIGN_IN))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_body("auth", "account locked")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DEFECTS))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_body("session", "session expired")))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server);
    transport.authenticate(user()).await.unwrap();
    let err = transport.execute(&HttpRequest::get(url(&server))).await.unwrap_err();
    match &err {
        TransportError::Server { status, error } => {
            assert_eq!(*status, 401);
            assert_eq!(error.description(), Some("session expired"));
        }
        other => panic!("expected Server error, got {other:?}"),
    }
    assert!(!transport.is_authenticated().await);
}

#[tokio::test]
async fn server_errors_are_not_retried() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(DEFECTS))
        .respond_with(ResponseTemplate::new(500).set_body_json(error_body("platform.internal", "boom")))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server);
    transport.authenticate(user()).await.unwrap();
    let err = transport.execute(&HttpRequest::get(url(&server))).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(!err.is_auth_failure());
    assert_eq!(err.error_model().and_then(|e| e.description()), Some("boom"));
}

#[tokio::test]
async fn bad_request_is_not_retried() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;
    Mock::given(method("POST"))
        .and(path(DEFECTS))
        .respond_with(ResponseTemplate::new(400).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server);
    transport.authenticate(user()).await.unwrap();
    let err = transport
        .execute(&HttpRequest::post(url(&server), r#"{"data":[]}"#))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    // Unparseable bodies become the description.
    assert_eq!(err.error_model().and_then(|e| e.description()), Some("not json"));
}

// ── Request shapes ──────────────────────────────────────────────

#[tokio::test]
async fn put_sends_json_body() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;
    Mock::given(method("PUT"))
        .and(path(DEFECTS))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({ "data": [{ "id": "5", "name": "x" }] })))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server);
    transport.authenticate(user()).await.unwrap();
    transport
        .execute(&HttpRequest::put(url(&server), r#"{"data":[{"id":"5","name":"x"}]}"#))
        .await
        .unwrap();
}

#[tokio::test]
async fn binary_post_sends_multipart_body() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/attachments"))
        .and(header(
            "content-type",
            "multipart/form-data; boundary=---------------------------92348603315617859231724135434",
        ))
        .and(body_string_contains(r#"name="entity"; filename="blob""#))
        .and(body_string_contains(r#"name="content"; filename="notes.txt""#))
        .and(body_string_contains("hello attachment"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server);
    transport.authenticate(user()).await.unwrap();
    let request = HttpRequest::post_binary(
        format!("{}/attachments", server.uri()),
        r#"{"data":[{"name":"notes.txt"}]}"#,
        BinaryContent::new(b"hello attachment".to_vec(), "text/plain", "notes.txt"),
    );
    let response = transport.execute(&request).await.unwrap();
    assert_eq!(response.status, 201);
}

#[tokio::test]
async fn binary_download_keeps_raw_bytes() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;
    let payload = vec![0u8, 159, 146, 150, 255];
    Mock::given(method("GET"))
        .and(path("/attachments/7"))
        .and(header("accept", "application/octet-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server);
    transport.authenticate(user()).await.unwrap();
    let request = HttpRequest::get(format!("{}/attachments/7", server.uri())).with_accept("application/octet-stream");
    let response = transport.execute(&request).await.unwrap();
    assert_eq!(response.raw, payload);
}

// ── Deadlines ───────────────────────────────────────────────────

#[tokio::test]
async fn slow_response_exceeds_deadline() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(DEFECTS))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let transport = transport(&server);
    transport.authenticate(user()).await.unwrap();
    let deadline = Duration::from_millis(50);
    let err = transport
        .execute_with_deadline(&HttpRequest::get(url(&server)), deadline)
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::DeadlineExceeded(d) if d == deadline));
}

#[tokio::test]
async fn fast_response_meets_deadline() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(DEFECTS))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let transport = transport(&server);
    transport.authenticate(user()).await.unwrap();
    let response = transport
        .execute_with_deadline(&HttpRequest::get(url(&server)), Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(response.status, 200);
}

// ── Sign-out ────────────────────────────────────────────────────

#[tokio::test]
async fn sign_out_clears_session() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;
    Mock::given(method("POST"))
        .and(path(SIGN_OUT))
        .and(header("cookie", "LWSSO_COOKIE_KEY=token-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DEFECTS))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server);
    transport.authenticate(user()).await.unwrap();
    transport.sign_out().await.unwrap();
    assert!(!transport.is_authenticated().await);

    // Credentials are gone: a 401 is no longer retried.
    let err = transport.execute(&HttpRequest::get(url(&server))).await.unwrap_err();
    assert!(matches!(err, TransportError::Server { status: 401, .. }));
}

#[tokio::test]
async fn failed_sign_out_still_clears_session() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;
    Mock::given(method("POST"))
        .and(path(SIGN_OUT))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server);
    transport.authenticate(user()).await.unwrap();
    let err = transport.sign_out().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(!transport.is_authenticated().await);
}

// ── Concurrency ─────────────────────────────────────────────────

#[tokio::test]
async fn concurrent_requests_share_one_session() {
    let server = MockServer::start().await;
    mount_sign_in(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(DEFECTS))
        .and(header("cookie", "LWSSO_COOKIE_KEY=token-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(8)
        .mount(&server)
        .await;

    let transport = Arc::new(transport(&server));
    transport.authenticate(user()).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let transport = Arc::clone(&transport);
        let request = HttpRequest::get(url(&server));
        handles.push(tokio::spawn(async move { transport.execute(&request).await }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().status, 200);
    }
}
