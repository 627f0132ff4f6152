//! HTTP server setup and the front controller.
//!
//! # Responsibilities
//! - Create the axum router and wire middleware (tracing, timeout,
//!   request id)
//! - Derive a dispatch path from each request and run one walk
//! - Map walk outcomes to responses at the top-level error boundary
//!
//! # Design Decisions
//! - The walk is synchronous and may block on handler I/O, so it runs on
//!   the blocking pool, off the async workers
//! - Reserved segments and the pop sentinel are rejected before dispatch:
//!   they are tree-internal vocabulary, not wire-reachable paths
//! - Application failures are logged with the request id and answered
//!   with a generic page; details never reach the client

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::context::{RequestContext, Services};
use crate::dispatch::{dispatch, ActionTree, DispatchError, DispatchPath, WalkEnd};
use crate::lifecycle::Shutdown;

/// Application state injected into the front controller.
#[derive(Clone)]
pub struct AppState {
    pub root: Arc<ActionTree>,
    pub services: Services,
}

/// HTTP server hosting the front controller.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server over a composed root tree and its collaborators.
    pub fn new(root: Arc<ActionTree>, services: Services) -> Self {
        let timeout = services
            .settings
            .snapshot()
            .server
            .request_timeout_secs;
        let state = AppState { root, services };
        Self {
            router: Self::build_router(state, timeout),
        }
    }

    fn build_router(state: AppState, timeout_secs: u64) -> Router {
        Router::new()
            .route("/{*path}", any(front_controller))
            .route("/", any(front_controller))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(timeout_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown coordinator fires.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut rx = shutdown.subscribe();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = rx.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// One request, one walk.
async fn front_controller(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Response {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let raw_path = request.uri().path().to_owned();
    let path = DispatchPath::from_request_path(&raw_path);

    // Reserved names never arrive from the wire.
    if path.contains_reserved() {
        tracing::debug!(request_id = %request_id, path = %raw_path, "reserved segment rejected");
        return error_page(&state.services, StatusCode::NOT_FOUND, &raw_path);
    }

    let mut ctx = RequestContext::new(state.services.clone(), request_id.clone());
    ctx.auth_token = bearer_token(request.headers());
    ctx.set_var("path", raw_path.clone());

    let root = state.root.clone();
    let walked = tokio::task::spawn_blocking(move || {
        let end = dispatch(&root, &mut ctx, path);
        (ctx, end)
    })
    .await;

    let (ctx, end) = match walked {
        Ok(pair) => pair,
        Err(join_err) => {
            tracing::error!(request_id = %request_id, error = %join_err, "dispatch task failed");
            return error_page(&state.services, StatusCode::INTERNAL_SERVER_ERROR, &raw_path);
        }
    };

    match end {
        Ok(WalkEnd::Done) => {
            let (status, body) = ctx.into_response_parts();
            let status =
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Html(body)).into_response()
        }
        Ok(WalkEnd::Popped(tail)) => {
            // A pop at the outermost tree means nothing consumed the tail.
            tracing::debug!(request_id = %request_id, tail = %tail, "walk popped past the root");
            error_page(&state.services, StatusCode::NOT_FOUND, &raw_path)
        }
        Err(DispatchError::NotFound) => {
            error_page(&state.services, StatusCode::NOT_FOUND, &raw_path)
        }
        Err(DispatchError::App(err)) => {
            tracing::error!(request_id = %request_id, error = %err, "handler failed");
            error_page(&state.services, StatusCode::INTERNAL_SERVER_ERROR, &raw_path)
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned)
}

/// Render the generic 404/500 page outside the dispatch engine.
fn error_page(services: &Services, status: StatusCode, raw_path: &str) -> Response {
    let template = if status == StatusCode::NOT_FOUND {
        "not_found"
    } else {
        "error"
    };
    let mut vars = serde_json::Map::new();
    vars.insert("path".into(), serde_json::Value::String(raw_path.into()));
    let body = services
        .renderer
        .render(template, &vars)
        .unwrap_or_else(|_| status.to_string());
    (status, Html(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc123"));

        headers.insert(header::AUTHORIZATION, "Basic abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}
