//! Shared utilities for integration testing.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use tokio::net::TcpListener;

use gate_proxy::config::ProxyConfig;
use gate_proxy::http::HttpServer;
use gate_proxy::lifecycle::Shutdown;

/// One request exactly as the backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Handle onto the requests a mock backend has received.
#[derive(Clone, Default)]
pub struct Recorder {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Recorder {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn push(&self, request: RecordedRequest) {
        self.requests.lock().unwrap().push(request);
    }
}

#[derive(Clone)]
struct BackendState {
    recorder: Recorder,
    status: StatusCode,
    body: &'static str,
}

async fn record_handler(
    State(state): State<BackendState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    state.recorder.push(RecordedRequest {
        method,
        uri,
        headers,
        body,
    });
    (state.status, [("x-backend", "origin")], state.body)
}

/// Start a mock backend that records every request and answers 200.
pub async fn start_recording_backend() -> (SocketAddr, Recorder) {
    start_recording_backend_with(StatusCode::OK, "backend response").await
}

/// Start a mock backend that records every request and answers with the
/// given status and body.
pub async fn start_recording_backend_with(
    status: StatusCode,
    body: &'static str,
) -> (SocketAddr, Recorder) {
    let recorder = Recorder::default();
    let app = Router::new()
        .fallback(record_handler)
        .with_state(BackendState {
            recorder: recorder.clone(),
            status,
            body,
        });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, recorder)
}

/// A complete gate configuration minus the endpoints, which `start_gate`
/// fills in from the sockets it binds.
pub fn gate_config() -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.gate.header_names = vec!["X-Edge-Key".into(), "X-Edge-Token".into()];
    config.gate.header_values = vec!["alpha".into(), "beta".into()];
    config.gate.user_agent = "SyncAgent/2.4".into();
    config.service_token.client_id = "test-id.access".into();
    config.service_token.client_secret = "test-secret".into();
    config
}

/// A gate proxy running on an ephemeral port.
pub struct RunningGate {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl RunningGate {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the proxy against the given backend address.
///
/// The listener is bound before the server task is spawned, so requests
/// sent immediately after this returns queue in the accept backlog.
pub async fn start_gate(mut config: ProxyConfig, backend: SocketAddr) -> RunningGate {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    config.listener.bind_address = addr.to_string();
    config.upstream.public_endpoint = format!("http://{}", addr);
    config.upstream.backend_endpoint = format!("http://{}", backend);

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    RunningGate { addr, shutdown }
}

/// Request client that neither pools connections nor picks up proxy
/// settings from the environment.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
