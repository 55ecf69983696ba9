#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use axum::{
    body::{to_bytes, Body},
    extract::{Path, State},
    http::{HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use detective_case_backend::{config::Config, routes, AppState};
use serde_json::{json, Value as JsonValue};
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const TEST_TOKEN: &str = "test-token";

/// How the fake generation service treats one submission.
#[derive(Debug, Clone)]
pub enum Script {
    /// Succeeds after `polls` status checks with the given output fragments.
    Output { fragments: Vec<String>, polls: u32 },
    /// Reports a failed job on the first status check.
    Failure(Option<String>),
    /// Stays in `processing` forever.
    Stalled,
    /// Refuses the submission with this status and body.
    Rejected(u16, String),
}

impl Script {
    pub fn output(text: &str) -> Self {
        Script::Output {
            fragments: vec![text.to_string()],
            polls: 1,
        }
    }
}

#[derive(Clone)]
struct FakeState {
    base_url: String,
    scripts: Arc<Mutex<VecDeque<Script>>>,
    jobs: Arc<Mutex<HashMap<String, (Script, u32)>>>,
    submissions: Arc<Mutex<Vec<JsonValue>>>,
}

pub struct FakeReplicate {
    pub base_url: String,
    submissions: Arc<Mutex<Vec<JsonValue>>>,
}

impl FakeReplicate {
    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    pub fn submissions(&self) -> Vec<JsonValue> {
        self.submissions.lock().unwrap().clone()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Token {}", TEST_TOKEN))
        .unwrap_or(false)
}

fn job_doc(base_url: &str, id: &str, status: &str, output: JsonValue, error: JsonValue) -> JsonValue {
    json!({
        "id": id,
        "status": status,
        "output": output,
        "error": error,
        "urls": { "get": format!("{}/predictions/{}", base_url, id) }
    })
}

async fn create_prediction(
    State(state): State<FakeState>,
    Path((_owner, _name)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<JsonValue>,
) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "{\"detail\":\"Unauthenticated\"}").into_response();
    }
    let index = {
        let mut submissions = state.submissions.lock().unwrap();
        submissions.push(body);
        submissions.len()
    };
    let Some(script) = state.scripts.lock().unwrap().pop_front() else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "no script left").into_response();
    };
    if let Script::Rejected(status, body) = &script {
        let status = StatusCode::from_u16(*status).unwrap();
        return (status, body.clone()).into_response();
    }

    let id = format!("pred-{}", index);
    state.jobs.lock().unwrap().insert(id.clone(), (script, 0));
    (
        StatusCode::CREATED,
        Json(job_doc(&state.base_url, &id, "starting", JsonValue::Null, JsonValue::Null)),
    )
        .into_response()
}

async fn get_prediction(
    State(state): State<FakeState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let mut jobs = state.jobs.lock().unwrap();
    let Some((script, seen)) = jobs.get_mut(&id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    *seen += 1;

    let doc = match script {
        Script::Output { fragments, polls } if *seen >= *polls => job_doc(
            &state.base_url,
            &id,
            "succeeded",
            json!(fragments),
            JsonValue::Null,
        ),
        Script::Failure(reason) => job_doc(
            &state.base_url,
            &id,
            "failed",
            JsonValue::Null,
            json!(reason),
        ),
        _ => job_doc(&state.base_url, &id, "processing", JsonValue::Null, JsonValue::Null),
    };
    Json(doc).into_response()
}

pub async fn spawn_fake_replicate(scripts: Vec<Script>) -> FakeReplicate {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake");
    let addr = listener.local_addr().expect("fake addr");
    let base_url = format!("http://{}/v1", addr);
    let submissions = Arc::new(Mutex::new(Vec::new()));

    let state = FakeState {
        base_url: base_url.clone(),
        scripts: Arc::new(Mutex::new(scripts.into())),
        jobs: Arc::new(Mutex::new(HashMap::new())),
        submissions: submissions.clone(),
    };
    let app = Router::new()
        .route("/v1/models/:owner/:name/predictions", post(create_prediction))
        .route("/v1/predictions/:id", get(get_prediction))
        .with_state(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake server");
    });

    FakeReplicate {
        base_url,
        submissions,
    }
}

pub fn test_config(fake: &FakeReplicate) -> Config {
    Config {
        replicate_api_token: Some(TEST_TOKEN.to_string()),
        replicate_api_base: fake.base_url.clone(),
        poll_interval_ms: 20,
        poll_timeout_ms: 3_000,
        ..Config::default()
    }
}

pub fn app(config: &Config) -> Router {
    let state = AppState::new(config).expect("app state");
    routes::router(state, config)
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let resp = app.oneshot(request).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn post_case_json(app: Router, body: JsonValue) -> (StatusCode, JsonValue) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/case-json")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, _, text) = send(app, request).await;
    let json = serde_json::from_str(&text).unwrap_or(JsonValue::Null);
    (status, json)
}
