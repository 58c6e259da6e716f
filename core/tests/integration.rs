//! Session lifecycle test against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every client
//! operation over real HTTP through a ureq-backed `Transport`. Validates that
//! request mapping, status classification and error translation line up with
//! an actual server.

use kyc_core::{
    HttpMethod, HttpRequest, HttpResponse, KycApiClient, KycError, SessionData,
    StartSessionRequest, Transport, TransportError,
};
use serde_json::json;

/// `Transport` backed by a ureq agent.
///
/// Disables ureq's status-as-error behavior so 4xx/5xx responses come back
/// with their bodies intact, then classifies them with
/// `TransportError::check`.
struct UreqTransport {
    agent: ureq::Agent,
    base_url: String,
}

impl UreqTransport {
    fn new(base_url: String) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent, base_url }
    }
}

impl Transport for UreqTransport {
    fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = format!("{}{}", self.base_url, req.path);
        let mut builder = match req.method {
            HttpMethod::Post => self.agent.post(&url),
        };
        for (key, value) in &req.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        let body = req.body.unwrap_or_default();
        let mut response = builder
            .send(body.as_bytes())
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        let body = response.body_mut().read_to_string().unwrap_or_default();

        TransportError::check(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Start the mock server on a random port and return its base URL.
fn spawn_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, mock_server::DEFAULT_API_KEY).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn session_lifecycle() {
    let base_url = spawn_server();
    let client = KycApiClient::new(UreqTransport::new(base_url.clone()), mock_server::DEFAULT_API_KEY);

    // Step 1: no session data: rejected before any request.
    let err = client.start_session(&StartSessionRequest::default()).unwrap_err();
    assert!(matches!(err, KycError::MissingSessionData));

    // Step 2: session data without email: the server answers 400.
    let err = client
        .start_session(&StartSessionRequest::new(SessionData {
            first_name: Some("Jane".to_string()),
            ..Default::default()
        }))
        .unwrap_err();
    assert_eq!(
        err.invalid_fields(),
        Some(&json!({"field": "sessionData.email", "message": "required"}))
    );

    // Step 3: start a real session.
    let session_data = SessionData {
        first_name: Some("Jane".to_string()),
        last_name: Some("Doe".to_string()),
        email: Some("jane@example.com".to_string()),
        country: Some("LT".to_string()),
        language: Some("en".to_string()),
        ..Default::default()
    };
    let started = client
        .start_session(&StartSessionRequest::new(session_data.clone()))
        .unwrap();
    let token = started.token.expect("token in start-session reply");
    assert!(started.session_id.is_some());
    assert_eq!(started.url.as_deref(), Some(format!("https://verify.example.com/{token}").as_str()));

    // Step 4: fetch the data: session data round-trips through the server.
    let data = client.get_data(&token).unwrap();
    assert_eq!(data.session_data.as_ref(), Some(&session_data));
    let document = data.parsed_document_data.expect("parsed document data");
    assert_eq!(document.document_type.as_deref(), Some("Passport"));
    assert_eq!(document.last_name.as_deref(), Some("Doe"));
    assert_eq!(document.nationality.as_deref(), Some("LT"));

    // Step 5: status by email.
    let status = client.get_status("jane@example.com").unwrap();
    assert_eq!(status.status.as_deref(), Some("Pending"));
    assert_eq!(status.token.as_deref(), Some(token.as_str()));
    assert!(!status.is_approved());

    // Step 6: unknown email and token: 400 translated.
    let err = client.get_status("nobody@example.com").unwrap_err();
    assert_eq!(
        err.invalid_fields(),
        Some(&json!({"field": "email", "message": "invalid"}))
    );
    let err = client.get_data("no-such-token").unwrap_err();
    assert_eq!(
        err.invalid_fields(),
        Some(&json!({"field": "token", "message": "invalid"}))
    );

    // Step 7: wrong API key: 401 passes through untouched.
    let intruder = KycApiClient::new(UreqTransport::new(base_url), "wrong-key");
    match intruder.get_status("jane@example.com").unwrap_err() {
        KycError::Transport(TransportError::Client { status, response }) => {
            assert_eq!(status, 401);
            assert_eq!(response.body, r#"{"message":"invalid api key"}"#);
        }
        other => panic!("expected raw 401, got {other:?}"),
    }
}

#[test]
fn unreachable_server_is_a_connection_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = KycApiClient::new(UreqTransport::new(format!("http://{addr}")), "key");

    let err = client.get_status("a@b.com").unwrap_err();
    assert!(matches!(err, KycError::Transport(TransportError::Connection(_))));
}
