//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with a wildcard proxy handler
//! - Wire up tracing middleware
//! - Serve until shutdown is triggered, then close the listener at once
//! - Dispatch each request to the routing table or the built-in fallback
//!
//! # Design Decisions
//! - One spawned task per connection/request (Axum/Tokio default)
//! - Shutdown drops the accept loop immediately: no graceful drain,
//!   in-flight requests observe their own cancellation tokens
//! - The handler depends on `dyn Transport`, never on the pooled client

use std::future::IntoFuture;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::forward::forward;
use crate::lifecycle::Shutdown;
use crate::routing::Router as ProxyRouter;
use crate::transport::Transport;

/// Body served when no upstream pattern matches. A liveness greeting,
/// not an error.
pub const FALLBACK_BODY: &str = "welcome\n";

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ProxyRouter>,
    pub transport: Arc<dyn Transport>,
    pub shutdown: Shutdown,
}

/// HTTP server for the reverse proxy.
pub struct HttpServer {
    router: Router,
    shutdown: Shutdown,
}

impl HttpServer {
    /// Build the server from validated configuration and a transport.
    pub fn new(config: &ProxyConfig, transport: Arc<dyn Transport>, shutdown: Shutdown) -> Self {
        let proxy_router = Arc::new(ProxyRouter::from_config(&config.upstreams));

        let state = AppState {
            router: proxy_router,
            transport,
            shutdown: shutdown.clone(),
        };

        let router = Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        Self { router, shutdown }
    }

    /// Serve connections on `listener` until shutdown is triggered.
    ///
    /// Returns as soon as the trigger fires; the listener is dropped here,
    /// so new connections are refused immediately. Requests already
    /// dispatched keep running against their cancelled request tokens and
    /// finish within the forward deadline.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server serving");

        let HttpServer { router, shutdown } = self;

        let result = tokio::select! {
            result = axum::serve(listener, router).into_future() => result,
            _ = shutdown.triggered() => {
                tracing::info!("Shutdown triggered, closing listener");
                Ok(())
            }
        };

        tracing::info!("HTTP server stopped");
        result
    }
}

/// Main proxy handler: route lookup, then forward or fallback.
async fn proxy_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Response<Body> {
    let matched = state.router.match_path(request.uri().path());

    match matched {
        Some(route) => {
            tracing::debug!(
                method = %request.method(),
                path = %request.uri().path(),
                upstream = %route.addr,
                "Proxying request"
            );
            forward(request, route, state.transport.as_ref(), &state.shutdown).await
        }
        None => {
            tracing::debug!(path = %request.uri().path(), "No upstream matched, serving fallback");
            Response::new(Body::from(FALLBACK_BODY))
        }
    }
}
