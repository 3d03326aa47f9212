//! Fake OpenAI-compatible HTTP server for integration tests.
//!
//! Spins up a minimal `axum` server on a random TCP port bound to 127.0.0.1.
//! Serves:
//! - `POST /v1/embeddings`
//! - `GET /v1/models`
//!
//! Any other path goes to the same handler through the router fallback.
//! Every request is recorded so tests can assert on paths, headers and
//! bodies.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::IntoResponse,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A request as seen by the fake server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

type Handler = Arc<dyn Fn(&RecordedRequest) -> (u16, String) + Send + Sync>;

/// State shared between the router and test code.
#[derive(Clone)]
struct ApiState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handler: Handler,
}

/// Handle to the running fake server.
pub struct FakeOpenAi {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeOpenAi {
    /// Start a server that answers every request with `handler`.
    pub async fn start<F>(handler: F) -> std::io::Result<Self>
    where
        F: Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = ApiState {
            requests: requests.clone(),
            handler: Arc::new(handler),
        };

        let app = Router::new()
            .route("/v1/embeddings", post(answer))
            .route("/v1/models", get(answer))
            .fallback(answer)
            .with_state(state);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("fake OpenAI server stopped");
        });

        Ok(Self { addr, requests })
    }

    /// Start a server that always answers with the same status and body.
    pub async fn fixed(status: u16, body: &str) -> std::io::Result<Self> {
        let body = body.to_string();
        Self::start(move |_| (status, body.clone())).await
    }

    /// Start a server answering `/embeddings` with `embed(text)` for every
    /// input, in reverse order, so clients must honor the `index` field.
    pub async fn embeddings<F>(embed: F) -> std::io::Result<Self>
    where
        F: Fn(&str) -> Vec<f32> + Send + Sync + 'static,
    {
        Self::start(move |request| {
            if request.path != "/v1/embeddings" {
                return (404, r#"{"error": {"message": "not found"}}"#.to_string());
            }
            let inputs: Vec<String> = request.json()["input"]
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();

            let data: Vec<serde_json::Value> = inputs
                .iter()
                .enumerate()
                .rev()
                .map(|(index, text)| {
                    serde_json::json!({
                        "object": "embedding",
                        "index": index,
                        "embedding": embed(text),
                    })
                })
                .collect();

            let body = serde_json::json!({"object": "list", "data": data});
            (200, body.to_string())
        })
        .await
    }

    /// API root including the `/v1` prefix.
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn answer(
    State(state): State<ApiState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let request = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        body,
    };

    let (status, response_body) = (state.handler)(&request);
    state.requests.lock().await.push(request);

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        response_body,
    )
}
