//! Deterministic stand-in transport for tests and benchmarks.

use std::sync::Mutex;

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{request, HeaderMap, HeaderName, HeaderValue, Request, Response, StatusCode};

use crate::transport::{Transport, TransportError};

/// Transport that performs no network I/O.
///
/// Drains the outbound request body, records the request head for later
/// inspection, and answers with a fixed status and body (or a fixed
/// failure, for exercising error paths).
pub struct FixedTransport {
    status: StatusCode,
    body: Bytes,
    headers: HeaderMap,
    fail: bool,
    seen: Mutex<Vec<request::Parts>>,
}

impl FixedTransport {
    /// Respond to every request with `status` and `body`.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
            headers: HeaderMap::new(),
            fail: false,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Add a header to every response. Panics on invalid name/value,
    /// which is acceptable for a test stand-in.
    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers
            .insert(HeaderName::from_static(name), HeaderValue::from_static(value));
        self
    }

    /// Respond to every request with 200 OK and `body`.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// Fail every request with a `TransportError`.
    pub fn failing() -> Self {
        Self {
            status: StatusCode::OK,
            body: Bytes::new(),
            headers: HeaderMap::new(),
            fail: true,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Drain and return the request heads received so far, oldest first.
    /// Resets `request_count`.
    pub fn take_requests(&self) -> Vec<request::Parts> {
        std::mem::take(&mut *self.seen.lock().expect("seen lock poisoned"))
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.seen.lock().expect("seen lock poisoned").len()
    }
}

#[async_trait::async_trait]
impl Transport for FixedTransport {
    async fn send(&self, request: Request<Body>) -> Result<Response<Body>, TransportError> {
        let (parts, body) = request.into_parts();
        // Drain like a real peer would; the bytes themselves are discarded.
        let _ = to_bytes(body, usize::MAX).await;
        self.seen.lock().expect("seen lock poisoned").push(parts);

        if self.fail {
            return Err(TransportError::Send("fixed transport failure".into()));
        }

        let mut response = Response::new(Body::from(self.body.clone()));
        *response.status_mut() = self.status;
        for (name, value) in &self.headers {
            response.headers_mut().insert(name.clone(), value.clone());
        }
        Ok(response)
    }
}
