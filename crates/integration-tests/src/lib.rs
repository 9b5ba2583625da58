//! Integration tests for the Gerbang Lalin dashboard.
//!
//! Each test spins up two servers on ephemeral ports:
//!
//! - a mock toll-gate backend that records every request it receives, and
//! - the real admin router configured to talk to that mock.
//!
//! Tests then drive the admin with a cookie-keeping `reqwest` client, the way
//! a browser would, and assert on both the pages and the backend calls.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lalin-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use reqwest::cookie::Jar;
use serde::Deserialize;
use serde_json::{Value, json};

use lalin_admin::config::AdminConfig;
use lalin_admin::state::AppState;

/// Username the mock backend accepts.
pub const USERNAME: &str = "admin";
/// Password the mock backend accepts.
pub const PASSWORD: &str = "secret";
/// Token issued by the mock backend.
pub const TOKEN: &str = "mock-token-123";

/// One request seen by the mock backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
    pub authorization: Option<String>,
}

/// Data served and requests recorded by the mock backend.
#[derive(Debug, Default)]
pub struct BackendState {
    pub gates: Vec<Value>,
    pub traffic: Vec<Value>,
    pub calls: Vec<RecordedCall>,
    /// When set, every gate mutation fails with this status and message.
    pub fail_mutations: Option<(StatusCode, String)>,
}

type Shared = Arc<Mutex<BackendState>>;

/// A running mock backend.
#[derive(Clone)]
pub struct MockBackend {
    pub addr: SocketAddr,
    state: Shared,
}

impl MockBackend {
    /// Start the mock with the given fixtures.
    pub async fn start(gates: Vec<Value>, traffic: Vec<Value>) -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState {
            gates,
            traffic,
            ..BackendState::default()
        }));

        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route(
                "/api/gerbangs",
                get(list_gates)
                    .post(create_gate)
                    .put(update_gate)
                    .delete(delete_gate),
            )
            .route("/api/lalins", get(list_traffic))
            .with_state(state.clone());

        let addr = serve(app).await;
        Self { addr, state }
    }

    /// Base URL the admin should use.
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Every call recorded so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Forget recorded calls (e.g. the ones made while logging in).
    pub fn reset_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Make gate mutations fail from now on.
    pub fn fail_mutations(&self, status: StatusCode, message: &str) {
        self.state.lock().unwrap().fail_mutations = Some((status, message.to_string()));
    }

    /// Current gate fixtures.
    pub fn gates(&self) -> Vec<Value> {
        self.state.lock().unwrap().gates.clone()
    }
}

fn record(
    state: &Shared,
    method: Method,
    path: &str,
    query: Option<String>,
    headers: &HeaderMap,
    body: Option<Value>,
) {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    state.lock().unwrap().calls.push(RecordedCall {
        method,
        path: path.to_string(),
        query,
        body,
        authorization,
    });
}

fn envelope(rows: Vec<Value>) -> Value {
    json!({ "data": { "rows": { "rows": rows } } })
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {TOKEN}").as_str())
}

async fn login(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    record(&state, Method::POST, "/api/auth/login", None, &headers, Some(body.clone()));

    if body["username"] == USERNAME && body["password"] == PASSWORD {
        (StatusCode::OK, Json(json!({ "status": true, "token": TOKEN })))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "status": false, "message": "Username atau password salah" })),
        )
    }
}

async fn list_gates(State(state): State<Shared>, headers: HeaderMap) -> impl IntoResponse {
    record(&state, Method::GET, "/api/gerbangs", None, &headers, None);
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" })));
    }
    let gates = state.lock().unwrap().gates.clone();
    (StatusCode::OK, Json(envelope(gates)))
}

fn mutation_failure(state: &Shared) -> Option<(StatusCode, Json<Value>)> {
    state
        .lock()
        .unwrap()
        .fail_mutations
        .clone()
        .map(|(status, message)| (status, Json(json!({ "message": message }))))
}

async fn create_gate(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    record(&state, Method::POST, "/api/gerbangs", None, &headers, Some(body.clone()));
    if let Some(failure) = mutation_failure(&state) {
        return failure;
    }
    state.lock().unwrap().gates.push(body);
    (StatusCode::CREATED, Json(json!({ "status": true })))
}

async fn update_gate(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    record(&state, Method::PUT, "/api/gerbangs", None, &headers, Some(body.clone()));
    if let Some(failure) = mutation_failure(&state) {
        return failure;
    }
    let mut guard = state.lock().unwrap();
    if let Some(gate) = guard.gates.iter_mut().find(|g| g["id"] == body["id"]) {
        *gate = body;
    }
    (StatusCode::OK, Json(json!({ "status": true })))
}

async fn delete_gate(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    record(&state, Method::DELETE, "/api/gerbangs", None, &headers, Some(body.clone()));
    if let Some(failure) = mutation_failure(&state) {
        return failure;
    }
    state
        .lock()
        .unwrap()
        .gates
        .retain(|g| !(g["id"] == body["id"] && g["IdCabang"] == body["IdCabang"]));
    (StatusCode::OK, Json(json!({ "status": true })))
}

#[derive(Deserialize)]
struct TrafficQuery {
    tanggal: Option<String>,
}

async fn list_traffic(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<TrafficQuery>,
) -> impl IntoResponse {
    record(&state, Method::GET, "/api/lalins", query.tanggal.clone(), &headers, None);
    let day = query.tanggal.unwrap_or_default();
    let rows = state
        .lock()
        .unwrap()
        .traffic
        .iter()
        .filter(|r| r["Tanggal"].as_str().is_some_and(|t| t.starts_with(&day)))
        .cloned()
        .collect();
    Json(envelope(rows))
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// The admin app wired to a mock backend, plus browser-like clients.
///
/// `client` follows redirects; `raw` shares its cookies but stops at the
/// first response so tests can inspect `Location` headers.
pub struct TestContext {
    pub backend: MockBackend,
    pub admin_url: String,
    pub client: reqwest::Client,
    pub raw: reqwest::Client,
}

impl TestContext {
    /// Start with a small gate and traffic fixture set.
    pub async fn new() -> Self {
        Self::with_fixtures(sample_gates(), sample_traffic()).await
    }

    /// Start with custom fixtures.
    pub async fn with_fixtures(gates: Vec<Value>, traffic: Vec<Value>) -> Self {
        let backend = MockBackend::start(gates, traffic).await;

        let api_url = backend.base_url();
        let static_dir = static_dir();
        let config = AdminConfig::from_lookup(|key| match key {
            "LALIN_API_URL" => Some(api_url.clone()),
            "ADMIN_STATIC_DIR" => Some(static_dir.clone()),
            "LALIN_DEFAULT_DATE" => Some("2023-11-01".to_string()),
            _ => None,
        })
        .unwrap();

        let addr = serve(lalin_admin::app(AppState::new(config).unwrap())).await;

        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .build()
            .unwrap();
        let raw = reqwest::Client::builder()
            .cookie_provider(jar)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            backend,
            admin_url: format!("http://{addr}"),
            client,
            raw,
        }
    }

    /// Absolute admin URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.admin_url)
    }

    /// Log in through the form and forget the calls it caused.
    pub async fn login(&self) {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .form(&[("username", USERNAME), ("password", PASSWORD)])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(response.url().path(), "/dashboard");
        self.backend.reset_calls();
    }

    /// GET a page and return its final status, path and body.
    pub async fn get(&self, path: &str) -> (u16, String, String) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        let status = response.status().as_u16();
        let final_path = response.url().path().to_string();
        (status, final_path, response.text().await.unwrap())
    }

    /// POST a form and return the final status, path and body.
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> (u16, String, String) {
        let response = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        let final_path = response.url().path().to_string();
        (status, final_path, response.text().await.unwrap())
    }
}

fn static_dir() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../admin/static")
        .to_string_lossy()
        .into_owned()
}

/// Two gates in two branches.
pub fn sample_gates() -> Vec<Value> {
    vec![
        json!({ "id": 1, "IdCabang": 16, "NamaGerbang": "Kayu Agung", "NamaCabang": "Kapal Betung" }),
        json!({ "id": 2, "IdCabang": 21, "NamaGerbang": "Cikampek Utama", "NamaCabang": "Jakarta Cikampek" }),
    ]
}

/// Three records on 2023-11-01 and one on the next day.
pub fn sample_traffic() -> Vec<Value> {
    vec![
        json!({ "id": 1, "IdGerbang": 1, "IdCabang": 16, "Tanggal": "2023-11-01T01:00:00", "Shift": 1, "Tunai": 5, "eBca": 2 }),
        json!({ "id": 2, "IdGerbang": 1, "IdCabang": 16, "Tanggal": "2023-11-01T09:30:00", "Shift": 2, "Tunai": 3, "eMandiri": 4 }),
        json!({ "id": 3, "IdGerbang": 2, "IdCabang": 21, "Tanggal": "2023-11-01T17:45:00", "Shift": 3, "eFlo": 7 }),
        json!({ "id": 4, "IdGerbang": 2, "IdCabang": 21, "Tanggal": "2023-11-02T08:00:00", "Shift": 1, "Tunai": 1 }),
    ]
}
