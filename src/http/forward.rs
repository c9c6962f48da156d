//! Request forwarding.
//!
//! # Responsibilities
//! - Build the outbound request (scheme, authority, rewritten path)
//! - Copy inbound headers, rewriting `Host` to the upstream host
//! - Bind the outbound call to a per-request deadline and the server's
//!   cancellation token
//! - Map transport failures to a single 500 response
//!
//! # Design Decisions
//! - Single attempt, fail fast; no retries
//! - No upstream error detail leaks to the caller (empty 500 body)
//! - The response body stream stays bound to the same deadline/token,
//!   so a cancelled request cannot hang on body streaming either

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderValue, Request, Response, StatusCode, Uri};
use futures_util::{stream, StreamExt};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::lifecycle::Shutdown;
use crate::routing::RouteMatch;
use crate::transport::Transport;

/// Hard ceiling on one forwarded request, independent of shutdown.
pub const FORWARD_DEADLINE: Duration = Duration::from_secs(60);

/// Forward an inbound request to its matched upstream.
///
/// Always produces exactly one response; every failure path collapses to
/// an empty 500.
pub async fn forward(
    request: Request<Body>,
    route: RouteMatch,
    transport: &dyn Transport,
    shutdown: &Shutdown,
) -> Response<Body> {
    let token = shutdown.request_token();
    let deadline = Instant::now() + FORWARD_DEADLINE;

    let outbound = match build_outbound(request, &route) {
        Ok(outbound) => outbound,
        Err(error) => {
            tracing::error!(upstream = %route.addr, %error, "Failed to build outbound request");
            return internal_error();
        }
    };

    // Biased so an already-cancelled token wins over a ready transport.
    let sent = tokio::select! {
        biased;
        _ = token.cancelled() => {
            tracing::warn!(upstream = %route.addr, "Forward cancelled by shutdown");
            return internal_error();
        }
        _ = tokio::time::sleep_until(deadline) => {
            tracing::warn!(upstream = %route.addr, "Forward deadline exceeded");
            return internal_error();
        }
        result = transport.send(outbound) => result,
    };

    match sent {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, bounded_body(body, token, deadline))
        }
        Err(error) => {
            tracing::error!(upstream = %route.addr, %error, "Forward failed");
            internal_error()
        }
    }
}

/// Build the outbound request: plain HTTP to the upstream, rewritten path,
/// inherited method/query/body, cloned headers with `Host` rewritten.
fn build_outbound(
    request: Request<Body>,
    route: &RouteMatch,
) -> Result<Request<Body>, axum::http::Error> {
    let (parts, body) = request.into_parts();

    // The stripped remainder may be empty or start mid-segment (pattern
    // "/" leaves "anything"); the outbound path must always be rooted.
    let mut path_and_query = String::with_capacity(route.rewritten_path.len() + 1);
    if !route.rewritten_path.starts_with('/') {
        path_and_query.push('/');
    }
    path_and_query.push_str(&route.rewritten_path);
    if let Some(query) = parts.uri.query() {
        path_and_query.push('?');
        path_and_query.push_str(query);
    }

    let uri = Uri::builder()
        .scheme("http")
        .authority(route.addr.as_str())
        .path_and_query(path_and_query)
        .build()?;

    let host = HeaderValue::from_str(uri.host().unwrap_or(route.addr.as_str()))?;

    let mut builder = Request::builder().method(parts.method).uri(uri);
    if let Some(headers) = builder.headers_mut() {
        for (name, value) in &parts.headers {
            headers.append(name.clone(), value.clone());
        }
        headers.insert(header::HOST, host);
    }
    builder.body(body)
}

/// Tie a response body stream to the request deadline and token.
///
/// The stream ends early when either fires; the client sees a truncated
/// body instead of a hang.
fn bounded_body(body: Body, token: CancellationToken, deadline: Instant) -> Body {
    let sleep = Box::pin(tokio::time::sleep_until(deadline));
    let bounded = stream::unfold(
        (body.into_data_stream(), token, sleep),
        |(mut data, token, mut sleep)| async move {
            tokio::select! {
                chunk = data.next() => chunk.map(|c| (c, (data, token, sleep))),
                _ = token.cancelled() => None,
                _ = &mut sleep => None,
            }
        },
    );
    Body::from_stream(bounded)
}

/// Empty-bodied 500, the one failure shape callers ever see.
fn internal_error() -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}
