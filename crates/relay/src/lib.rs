pub mod api;
pub mod broadcast;
pub mod config;
pub mod cors;
pub mod document;
pub mod error;
pub mod identity;
pub mod presence;
pub mod session;
pub mod ws;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::config::RelayConfig;
use crate::document::DocumentRegistry;
use crate::error::{
    attach_request_id_header, request_id_from_headers_or_generate, with_request_id_scope, ErrorCode,
    RelayError, REQUEST_ID_HEADER,
};
use crate::identity::{GuestIdentityProvider, IdentityProvider};
use crate::session::SessionManager;

/// Identifies one live transport connection.
pub type ConnectionId = Uuid;

const DEFAULT_MAX_FRAME_BYTES: usize = 1024 * 1024;

/// Shared relay state handed to every route.
#[derive(Clone)]
pub struct Relay {
    pub registry: Arc<DocumentRegistry>,
    pub sessions: Arc<SessionManager>,
    pub identity: Arc<dyn IdentityProvider>,
    pub max_frame_bytes: usize,
}

impl Relay {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        let registry = Arc::new(DocumentRegistry::default());
        let sessions = Arc::new(SessionManager::new(Arc::clone(&registry)));
        Self { registry, sessions, identity, max_frame_bytes: DEFAULT_MAX_FRAME_BYTES }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        Self::default().with_max_frame_bytes(config.max_frame_bytes)
    }

    pub fn with_max_frame_bytes(mut self, max_frame_bytes: usize) -> Self {
        self.max_frame_bytes = max_frame_bytes;
        self
    }
}

impl Default for Relay {
    fn default() -> Self {
        Self::new(Arc::new(GuestIdentityProvider))
    }
}

pub fn build_router(relay: Relay, config: &RelayConfig) -> Router {
    apply_middleware(Router::new().merge(api::router()).merge(ws::router()).with_state(relay))
        .layer(cors::cors_layer(config.cors_origins.as_deref()))
}

fn apply_middleware(router: Router) -> Router {
    router
        .layer(middleware::from_fn(request_context_middleware))
        .layer(middleware::from_fn(panic_handler))
}

// Outermost layer. It pins the request id on the request so the id in a
// panic response matches the one the inner middleware logged.
async fn panic_handler(mut request: Request<Body>, next: Next) -> Response {
    let request_id = request_id_from_headers_or_generate(request.headers());
    if let Ok(header) = HeaderValue::from_str(&request_id) {
        request.headers_mut().insert(REQUEST_ID_HEADER, header);
    }

    match tokio::spawn(async move { next.run(request).await }).await {
        Ok(response) => response,
        Err(join_error) => {
            error!(request_id = %request_id, ?join_error, "request handling panicked");
            RelayError::from_code(ErrorCode::InternalError)
                .with_request_id(request_id)
                .into_response()
        }
    }
}

async fn request_context_middleware(request: Request<Body>, next: Next) -> Response {
    let request_id = request_id_from_headers_or_generate(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started_at = Instant::now();

    let mut response = with_request_id_scope(request_id.clone(), next.run(request)).await;
    attach_request_id_header(&mut response, &request_id);

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        latency_ms = started_at.elapsed().as_millis() as u64,
        "request completed"
    );
    response
}
