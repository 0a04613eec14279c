//! HTTP server: router assembly, middleware stack and serve loop.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use calculator::Service;
use tokio_util::sync::CancellationToken;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::field::Empty;

use crate::config::{AppConfig, ServerConfig};
use crate::request_id::{self, MakeReqId};

/// Build the complete application: calculator routes plus middleware.
#[must_use]
pub fn build_router(config: &AppConfig) -> Router {
    let router = calculator::router(Arc::new(Service::new()), &config.calculator);
    apply_middleware_stack(router, &config.server)
}

/// Apply the middleware layers, innermost first.
///
/// At runtime requests flow outermost to innermost:
/// `SetRequestId` -> `PropagateRequestId` -> Trace -> Timeout -> `BodyLimit` -> Router.
#[must_use]
pub fn apply_middleware_stack(router: Router, config: &ServerConfig) -> Router {
    // 4) Body limit
    let router = router
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        .layer(DefaultBodyLimit::max(config.body_limit_bytes));

    // 3) Timeout
    let router = router.layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        config.request_timeout,
    ));

    // 2) Trace
    let router = apply_trace_layer(router);

    // 1) Request id: set if absent (outermost), echo on the response
    router
        .layer(PropagateRequestIdLayer::new(request_id::header()))
        .layer(SetRequestIdLayer::new(request_id::header(), MakeReqId))
}

fn apply_trace_layer(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &axum::http::Request<axum::body::Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri().path(),
                    version = ?req.version(),
                    request_id = %request_id::of(req),
                    status = Empty,
                    latency_ms = Empty,
                )
            })
            .on_response(
                |res: &axum::http::Response<axum::body::Body>,
                 latency: std::time::Duration,
                 span: &tracing::Span| {
                    span.record("status", res.status().as_u16());
                    span.record("latency_ms", latency.as_millis());
                    tracing::debug!(parent: span, "request completed");
                },
            ),
    )
}

/// Bind, then serve until `cancel` fires.
///
/// # Errors
/// Returns an error if the bind address is invalid, the socket cannot be
/// bound, or the server fails while running.
pub async fn serve(config: &AppConfig, cancel: CancellationToken) -> Result<()> {
    let addr = config.server.socket_addr()?;
    let router = build_router(config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server bound on {}", listener.local_addr()?);

    let shutdown = async move {
        cancel.cancelled().await;
        tracing::info!("HTTP server shutting down gracefully (cancellation)");
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

/// Run the server with signal-driven shutdown.
///
/// # Errors
/// Propagates errors from [`serve`].
pub async fn run_server(config: &AppConfig) -> Result<()> {
    let cancel = CancellationToken::new();

    let cancel_for_signals = cancel.clone();
    tokio::spawn(async move {
        match crate::signals::wait_for_shutdown().await {
            Ok(signal) => {
                tracing::info!(%signal, "shutdown signal received, draining connections");
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "shutdown: signal waiter failed, falling back to ctrl_c()"
                );
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "shutdown: ctrl_c() waiter failed");
                }
            }
        }
        cancel_for_signals.cancel();
    });

    serve(config, cancel).await
}
