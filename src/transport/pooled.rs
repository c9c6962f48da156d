//! Pooled network transport.
//!
//! # Responsibilities
//! - Own the outbound HTTP client and its connection pool
//! - Apply pool sizing and idle retention from configuration
//! - Enforce the fixed connect timeout

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;

use crate::config::schema::ProxyConfig;
use crate::transport::{Transport, TransportError};

/// Ceiling on establishing an outbound TCP connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// TCP keep-alive interval for pooled connections.
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Transport backed by a connection-pooling hyper client.
///
/// The pool is shared across all concurrent requests; idle retention per
/// host and idle timeout come from configuration.
pub struct PooledTransport {
    client: Client<HttpConnector, Body>,
}

impl PooledTransport {
    /// Build the pooled client from validated configuration.
    pub fn from_config(config: &ProxyConfig) -> Self {
        Self::new(
            config.max_idle_conns_per_host,
            Duration::from_secs(config.idle_conn_timeout),
        )
    }

    pub fn new(max_idle_per_host: usize, idle_timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(CONNECT_TIMEOUT));
        connector.set_keepalive(Some(KEEPALIVE_INTERVAL));

        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(max_idle_per_host)
            .pool_idle_timeout(idle_timeout)
            .build(connector);

        tracing::debug!(
            max_idle_per_host,
            idle_timeout_secs = idle_timeout.as_secs(),
            "Pooled transport ready"
        );
        Self { client }
    }
}

#[async_trait::async_trait]
impl Transport for PooledTransport {
    async fn send(&self, request: Request<Body>) -> Result<Response<Body>, TransportError> {
        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| TransportError::Send(e.into()))?;

        Ok(response.map(Body::new))
    }
}
