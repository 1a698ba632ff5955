use gsmcheck::config::Config;
use gsmcheck::gateway::run_gateway_with_listener;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPLETIONS: &str = "/v1/chat/completions";

struct GatewayTestServer {
    port: u16,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl GatewayTestServer {
    async fn start(upstream: &MockServer) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral gateway listener should bind");
        let port = listener
            .local_addr()
            .expect("ephemeral gateway listener should expose local address")
            .port();

        let mut config = Config::default();
        config.default_provider = Some(format!("custom:{}", upstream.uri()));
        config.api_key = Some("sk-test-key".to_string());
        config.reliability.provider_retries = 0;
        config.reliability.provider_backoff_ms = 0;
        config.gateway.port = 0;

        let handle = tokio::spawn(async move {
            run_gateway_with_listener("127.0.0.1", listener, Arc::new(config)).await
        });

        wait_until_gateway_ready(port).await;

        Self { port, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let response = reqwest::Client::new()
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("gateway request should complete");
        let status = response.status();
        let body = response.json().await.expect("gateway response should be json");
        (status, body)
    }
}

impl Drop for GatewayTestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn wait_until_gateway_ready(port: u16) {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .expect("reqwest client should be built");

    for _ in 0..100 {
        let health = client
            .get(format!("http://127.0.0.1:{port}/health"))
            .send()
            .await;
        if matches!(health, Ok(resp) if resp.status() == StatusCode::OK) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    panic!("gateway did not become ready on port {port}");
}

fn text_completion(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{
            "message": {"content": text},
            "finish_reason": "stop"
        }]
    }))
}

fn function_call_completion(arguments: &Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{
            "message": {
                "content": null,
                "function_call": {
                    "name": "validate_book_gsm",
                    "arguments": arguments.to_string()
                }
            },
            "finish_reason": "function_call"
        }]
    }))
}

fn overweight_book() -> Value {
    json!({
        "length": 20,
        "breadth": 14,
        "textPages": 200,
        "textGSM": 80,
        "coverGSM": 250,
        "measuredWeight": 280
    })
}

async fn completion_bodies(upstream: &MockServer) -> Vec<Value> {
    upstream
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == COMPLETIONS)
        .map(|request| serde_json::from_slice(&request.body).expect("completion body is json"))
        .collect()
}

#[tokio::test]
async fn chat_relays_a_plain_model_reply() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(text_completion(
            "What is the length of the book in centimeters?",
        ))
        .mount(&upstream)
        .await;
    let server = GatewayTestServer::start(&upstream).await;

    let (status, body) = server.post("/api/chat", json!({"message": "Hello"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "What is the length of the book in centimeters?"
    );
    assert_eq!(body["session_id"], "default");

    let requests = completion_bodies(&upstream).await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["function_call"], "auto");
    assert_eq!(requests[0]["functions"][0]["name"], "validate_book_gsm");
    assert_eq!(requests[0]["messages"][0]["role"], "system");
}

#[tokio::test]
async fn function_call_runs_validation_then_phrases_the_result() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .and(body_partial_json(json!({"function_call": "auto"})))
        .respond_with(function_call_completion(&overweight_book()))
        .with_priority(1)
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(text_completion(
            "Your book is heavier than expected: the actual text GSM is 95.",
        ))
        .with_priority(10)
        .expect(1)
        .mount(&upstream)
        .await;
    let server = GatewayTestServer::start(&upstream).await;

    let (status, body) = server
        .post(
            "/api/chat",
            json!({"message": "It weighs 280 grams", "session_id": "book-1"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Your book is heavier than expected: the actual text GSM is 95."
    );
    assert_eq!(body["session_id"], "book-1");

    let requests = completion_bodies(&upstream).await;
    assert_eq!(requests.len(), 2);
    let follow_up = &requests[1];
    assert!(follow_up.get("functions").is_none());

    let messages = follow_up["messages"].as_array().expect("messages array");
    let result_message = messages.last().expect("function result message");
    assert_eq!(result_message["role"], "function");
    assert_eq!(result_message["name"], "validate_book_gsm");
    let payload: Value = serde_json::from_str(
        result_message["content"]
            .as_str()
            .expect("function result content is a string"),
    )
    .expect("function result is json");
    assert_eq!(payload["status"], "OVERWEIGHT");
    assert_eq!(payload["gsmStatus"], "CALCULATED");
    assert_eq!(payload["calculations"]["actualGSMUsed"], 95.0);
}

#[tokio::test]
async fn empty_phrasing_falls_back_to_builtin_description() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .and(body_partial_json(json!({"function_call": "auto"})))
        .respond_with(function_call_completion(&overweight_book()))
        .with_priority(1)
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(text_completion(""))
        .with_priority(10)
        .mount(&upstream)
        .await;
    let server = GatewayTestServer::start(&upstream).await;

    let (status, body) = server
        .post("/api/chat", json!({"message": "280 g", "language": "fr"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let message = body["message"].as_str().expect("message is a string");
    assert!(message.contains("plus lourd"), "{message}");
    assert!(message.contains("95"), "{message}");
}

#[tokio::test]
async fn upstream_failure_returns_apology_and_keeps_conversation_clean() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(text_completion("What is the length?"))
        .with_priority(10)
        .mount(&upstream)
        .await;
    let server = GatewayTestServer::start(&upstream).await;

    let (status, body) = server.post("/api/chat", json!({"message": "Hello"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = body["error"].as_str().expect("error is a string");
    assert!(!error.contains("upstream exploded"));

    let (status, _) = server.post("/api/chat", json!({"message": "Hello"})).await;
    assert_eq!(status, StatusCode::OK);

    let requests = completion_bodies(&upstream).await;
    let retried = requests.last().expect("second completion request");
    // system + the retried user message only
    assert_eq!(retried["messages"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn blank_message_is_rejected_without_calling_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(text_completion("unused"))
        .expect(0)
        .mount(&upstream)
        .await;
    let server = GatewayTestServer::start(&upstream).await;

    let (status, body) = server.post("/api/chat", json!({"message": "   "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "message is required");
}

#[tokio::test]
async fn reset_forgets_the_conversation() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(text_completion("What is the length?"))
        .mount(&upstream)
        .await;
    let server = GatewayTestServer::start(&upstream).await;

    server
        .post("/api/chat", json!({"message": "Hello", "session_id": "tab-1"}))
        .await;
    server
        .post("/api/chat", json!({"message": "20", "session_id": "tab-1"}))
        .await;

    let (status, body) = server
        .post("/api/reset", json!({"session_id": "tab-1"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session_id"], "tab-1");
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));

    server
        .post("/api/chat", json!({"message": "Hello", "session_id": "tab-1"}))
        .await;
    let requests = completion_bodies(&upstream).await;
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[2]["messages"], requests[0]["messages"]);
}

#[tokio::test]
async fn health_reports_provider_and_conversation_count() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(text_completion("Hi"))
        .mount(&upstream)
        .await;
    let server = GatewayTestServer::start(&upstream).await;
    server.post("/api/chat", json!({"message": "Hello"})).await;

    let body: Value = reqwest::get(server.url("/health"))
        .await
        .expect("health request should complete")
        .json()
        .await
        .expect("health response should be json");
    assert_eq!(body["status"], "ok");
    assert_eq!(
        body["provider"],
        format!("custom:{}", upstream.uri()).as_str()
    );
    assert_eq!(body["conversations"], 1);
}
