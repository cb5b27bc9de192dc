//! `GeminiClient` against an in-process axum stub of `generateContent`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{Json, Router};
use serde_json::{Value, json};

use goalsplit_core::decompose::{
    BackendError, GeminiClient, GeminiConfig, GoalDecomposer, TextGenerator, fallback_result,
};
use goalsplit_db::models::GenerationSource;

const GOAL: &str = "Run a half marathon";

// -----------------------------------------------------------------------
// Stub server
// -----------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Recorded {
    path: String,
    api_key: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: Value,
    delay: Duration,
    seen: Arc<Mutex<Vec<Recorded>>>,
}

impl Stub {
    fn new(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body,
            delay: Duration::ZERO,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn replying_text(text: &str) -> Self {
        Self::new(
            StatusCode::OK,
            json!({"candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]}),
        )
    }

    fn recorded(&self) -> Vec<Recorded> {
        self.seen.lock().unwrap().clone()
    }
}

async fn handle(
    State(stub): State<Stub>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    stub.seen.lock().unwrap().push(Recorded {
        path: uri.path().to_string(),
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    tokio::time::sleep(stub.delay).await;
    (stub.status, Json(stub.body.clone()))
}

/// Serve `stub` on an ephemeral port and return its API base URL.
async fn spawn_stub(stub: Stub) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(handle).with_state(stub);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1beta")
}

fn config(base_url: &str) -> GeminiConfig {
    GeminiConfig {
        api_key: Some("test-key".to_string()),
        model: "gemini-test".to_string(),
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
    }
}

fn client(config: &GeminiConfig) -> GeminiClient {
    GeminiClient::from_config(config, reqwest::Client::new()).expect("api key is set")
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn sends_prompt_with_key_to_model_endpoint() {
    let stub = Stub::replying_text("hello");
    let base_url = spawn_stub(stub.clone()).await;

    let text = client(&config(&base_url))
        .generate_text("Goal: something")
        .await
        .expect("request should succeed");
    assert_eq!(text, "hello");

    let recorded = stub.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].path, "/v1beta/models/gemini-test:generateContent");
    assert_eq!(recorded[0].api_key.as_deref(), Some("test-key"));
    assert_eq!(
        recorded[0].body["contents"][0]["parts"][0]["text"],
        "Goal: something"
    );
    assert_eq!(recorded[0].body["generationConfig"]["maxOutputTokens"], 512);
}

#[tokio::test]
async fn decomposer_uses_remote_answer() {
    let stub = Stub::replying_text(
        "```json\n{\"steps\": [\"Buy shoes\", \"Run 5k\", \"Run 10k\", \"Run 15k\", \"Race\"], \"complexity\": 6}\n```",
    );
    let base_url = spawn_stub(stub.clone()).await;

    let decomposer = GoalDecomposer::from_config(&config(&base_url), reqwest::Client::new());
    let d = decomposer.decompose(GOAL).await;

    assert_eq!(d.source, GenerationSource::Remote);
    assert_eq!(
        d.result.step_refs(),
        ["Buy shoes", "Run 5k", "Run 10k", "Run 15k", "Race"]
    );
    assert_eq!(d.result.complexity(), 6);

    let prompt = stub.recorded()[0].body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(prompt.contains("Goal: Run a half marathon"));
}

#[tokio::test]
async fn error_status_is_reported() {
    let stub = Stub::new(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": {"code": 429, "message": "quota exhausted"}}),
    );
    let base_url = spawn_stub(stub).await;

    let err = client(&config(&base_url))
        .generate_text("prompt")
        .await
        .unwrap_err();
    match err {
        BackendError::Status { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("quota exhausted"));
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn error_status_degrades_to_fallback() {
    let stub = Stub::new(StatusCode::INTERNAL_SERVER_ERROR, json!({}));
    let base_url = spawn_stub(stub).await;

    let d = GoalDecomposer::from_config(&config(&base_url), reqwest::Client::new())
        .decompose(GOAL)
        .await;
    assert_eq!(d.source, GenerationSource::Fallback);
    assert_eq!(d.result, fallback_result(GOAL));
}

#[tokio::test]
async fn empty_candidates_is_empty_response() {
    let stub = Stub::new(StatusCode::OK, json!({"candidates": []}));
    let base_url = spawn_stub(stub).await;

    let err = client(&config(&base_url))
        .generate_text("prompt")
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::EmptyResponse), "got {err:?}");
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let base_url = format!("http://{addr}/v1beta");

    let err = client(&config(&base_url))
        .generate_text("prompt")
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Transport(_)), "got {err:?}");

    let d = GoalDecomposer::from_config(&config(&base_url), reqwest::Client::new())
        .decompose(GOAL)
        .await;
    assert_eq!(d.source, GenerationSource::Fallback);
}

#[tokio::test]
async fn slow_server_times_out() {
    let mut stub = Stub::replying_text("{\"steps\": [], \"complexity\": 1}");
    stub.delay = Duration::from_secs(3);
    let base_url = spawn_stub(stub).await;

    let mut cfg = config(&base_url);
    cfg.timeout = Duration::from_millis(200);

    let err = client(&cfg).generate_text("prompt").await.unwrap_err();
    assert!(matches!(err, BackendError::Transport(_)), "got {err:?}");
}
