//! HTTP server setup and the request pipeline.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all gate handler
//! - Wire up middleware (request timeout, tracing)
//! - Build the shared outbound client (https-or-http, native roots)
//! - Run the pipeline per request: gate → rewrite → credentials → forward → relay
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::config::schema::{ProxyConfig, TimeoutConfig};
use crate::config::validation::ValidationError;
use crate::http::rewrite::TargetRewriter;
use crate::security::credentials::ServiceCredentials;
use crate::security::gate::GatePolicy;

/// Errors that can occur while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configuration did not compile into runtime policies.
    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),

    /// The TLS root store for the outbound client could not be loaded.
    #[error("failed to load TLS roots for the outbound client: {0}")]
    TlsRoots(#[from] std::io::Error),
}

/// Shared outbound client. Plain-http and https backends both work.
type ForwardClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<GatePolicy>,
    pub credentials: Arc<ServiceCredentials>,
    pub rewriter: Arc<TargetRewriter>,
    pub client: ForwardClient,
}

/// HTTP server for the gate proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Compile the request policies and assemble the router.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let gate = Arc::new(GatePolicy::from_config(&config.gate)?);
        let credentials = Arc::new(ServiceCredentials::from_config(&config.service_token)?);
        let rewriter = Arc::new(TargetRewriter::from_config(&config.upstream)?);
        let client = build_forward_client(&config.timeouts)?;

        let state = AppState {
            gate,
            credentials,
            rewriter,
            client,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gate_handler))
            .route("/", any(gate_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend_endpoint = %self.config.upstream.backend_endpoint,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the outbound client used for every forwarded request.
fn build_forward_client(timeouts: &TimeoutConfig) -> Result<ForwardClient, std::io::Error> {
    let mut connector = HttpConnector::new();
    connector.enforce_http(false);
    connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .wrap_connector(connector);

    Ok(Client::builder(TokioExecutor::new()).build(https))
}

/// Main gate handler.
/// Validates the request, rewrites its target, applies the credential
/// decision, forwards it, and relays the backend response verbatim.
async fn gate_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    // Correlation id for logs only; forwarded headers are never extended.
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    // 1. Gate checks: required header pairs in configured order, then
    //    User-Agent. Fail closed, backend untouched.
    if let Err(rejection) = state.gate.evaluate(request.headers()) {
        tracing::warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            reason = %rejection,
            "request rejected"
        );
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    }

    // 2. Forwarded target: public prefix stripped onto the backend endpoint.
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let (parts, body) = request.into_parts();

    let target = state.rewriter.target_for(&parts.uri, host.as_deref());
    let target_uri: Uri = match target.parse() {
        Ok(uri) => uri,
        Err(error) => {
            tracing::warn!(
                request_id = %request_id,
                target = %target,
                error = %error,
                "rewritten target is not a valid URI"
            );
            return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
        }
    };

    // 3. Forwarded headers: everything the caller sent, minus Host (it has
    //    to follow the rewritten target), with the credential decision
    //    applied on top.
    let mut headers = parts.headers;
    headers.remove(header::HOST);
    state.credentials.apply(&mut headers);

    // 4. Same method, same body stream, rewritten target. The outbound
    //    connection negotiates its own protocol version.
    let mut builder = Request::builder().method(parts.method).uri(target_uri);
    if let Some(map) = builder.headers_mut() {
        *map = headers;
    }
    let forward = match builder.body(body) {
        Ok(request) => request,
        Err(error) => {
            tracing::error!(
                request_id = %request_id,
                error = %error,
                "failed to build outbound request"
            );
            return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
        }
    };

    // 5. One outbound call, no retry. Success is relayed byte-for-byte;
    //    failure surfaces as 502 for this request alone.
    match state.client.request(forward).await {
        Ok(response) => {
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = %response.status(),
                "relaying backend response"
            );
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(error) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                error = %error,
                "backend request failed"
            );
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
