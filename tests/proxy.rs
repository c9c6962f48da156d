//! End-to-end tests: live proxy against raw-TCP mock backends.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use prefix_proxy::config::{ProxyConfig, UpstreamConfig};
use prefix_proxy::http::server::FALLBACK_BODY;
use prefix_proxy::http::HttpServer;
use prefix_proxy::lifecycle::Shutdown;
use prefix_proxy::transport::{FixedTransport, PooledTransport, Transport};

mod common;

fn config_with(upstreams: Vec<(&str, SocketAddr)>) -> ProxyConfig {
    ProxyConfig {
        upstreams: upstreams
            .into_iter()
            .map(|(pattern, addr)| UpstreamConfig {
                pattern: pattern.into(),
                addr: addr.to_string(),
            })
            .collect(),
        ..ProxyConfig::default()
    }
}

async fn start_proxy(
    config: ProxyConfig,
    transport: Arc<dyn Transport>,
) -> (
    SocketAddr,
    Shutdown,
    tokio::task::JoinHandle<Result<(), std::io::Error>>,
) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, transport, shutdown.clone());
    let handle = tokio::spawn(server.run(listener));
    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown, handle)
}

fn pooled() -> Arc<dyn Transport> {
    Arc::new(PooledTransport::new(4, Duration::from_secs(5)))
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn forwards_with_prefix_stripped() {
    let (backend, mut requests) = common::start_recording_backend("1").await;
    let (proxy, _shutdown, _handle) =
        start_proxy(config_with(vec![("/foo", backend)]), pooled()).await;

    let res = client()
        .get(format!("http://{proxy}/foo/bar"))
        .send()
        .await
        .expect("proxy unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "1");
    assert_eq!(requests.recv().await.unwrap(), "GET /bar HTTP/1.1");
}

#[tokio::test]
async fn exact_prefix_forwards_root_path() {
    let (backend, mut requests) = common::start_recording_backend("ok").await;
    let (proxy, _shutdown, _handle) =
        start_proxy(config_with(vec![("/foo", backend)]), pooled()).await;

    let res = client()
        .get(format!("http://{proxy}/foo"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(requests.recv().await.unwrap(), "GET / HTTP/1.1");
}

#[tokio::test]
async fn root_pattern_forwards_every_path_rerooted() {
    let (backend, mut requests) = common::start_recording_backend("catchall").await;
    let (proxy, _shutdown, _handle) =
        start_proxy(config_with(vec![("/", backend)]), pooled()).await;

    let res = client()
        .get(format!("http://{proxy}/anything"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "catchall");
    assert_eq!(requests.recv().await.unwrap(), "GET /anything HTTP/1.1");
}

#[tokio::test]
async fn upstream_response_headers_reach_the_caller() {
    let (backend, _requests) = common::start_recording_backend("ok").await;
    let (proxy, _shutdown, _handle) =
        start_proxy(config_with(vec![("/foo", backend)]), pooled()).await;

    let res = client()
        .get(format!("http://{proxy}/foo"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers().get("x-served-by").unwrap(), "mock-backend");
}

#[tokio::test]
async fn query_string_is_preserved() {
    let (backend, mut requests) = common::start_recording_backend("ok").await;
    let (proxy, _shutdown, _handle) =
        start_proxy(config_with(vec![("/foo", backend)]), pooled()).await;

    client()
        .get(format!("http://{proxy}/foo/bar?x=1&y=2"))
        .send()
        .await
        .unwrap();

    assert_eq!(requests.recv().await.unwrap(), "GET /bar?x=1&y=2 HTTP/1.1");
}

#[tokio::test]
async fn unmatched_path_serves_fallback_without_touching_upstream() {
    let fixed = Arc::new(FixedTransport::ok("upstream"));
    let backend = common::dead_addr().await;
    let (proxy, _shutdown, _handle) =
        start_proxy(config_with(vec![("/foo", backend)]), fixed.clone()).await;

    let res = client()
        .get(format!("http://{proxy}/other"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), FALLBACK_BODY);
    assert_eq!(fixed.request_count(), 0);
}

#[tokio::test]
async fn dead_upstream_yields_500() {
    let backend = common::dead_addr().await;
    let (proxy, _shutdown, _handle) =
        start_proxy(config_with(vec![("/foo", backend)]), pooled()).await;

    let res = client()
        .get(format!("http://{proxy}/foo/bar"))
        .send()
        .await
        .expect("the proxy itself must answer");

    assert_eq!(res.status(), 500);
    assert!(res.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_requests_to_distinct_upstreams_do_not_interfere() {
    let (backend_foo, _rx_foo) = common::start_recording_backend("1").await;
    let (backend_bar, _rx_bar) = common::start_recording_backend("2").await;
    let (proxy, _shutdown, _handle) = start_proxy(
        config_with(vec![("/foo", backend_foo), ("/bar", backend_bar)]),
        pooled(),
    )
    .await;

    let client = client();
    let mut tasks = Vec::new();
    for i in 0..16 {
        let client = client.clone();
        let path = if i % 2 == 0 { "/foo/x" } else { "/bar/x" };
        let expected = if i % 2 == 0 { "1" } else { "2" };
        tasks.push(tokio::spawn(async move {
            let res = client
                .get(format!("http://{proxy}{path}"))
                .send()
                .await
                .unwrap();
            assert_eq!(res.status(), 200);
            assert_eq!(res.text().await.unwrap(), expected);
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }
}

#[tokio::test]
async fn close_rejects_new_connections() {
    let (backend, _requests) = common::start_recording_backend("ok").await;
    let (proxy, shutdown, handle) =
        start_proxy(config_with(vec![("/foo", backend)]), pooled()).await;

    // Sanity check: serving before close.
    let res = client()
        .get(format!("http://{proxy}/foo"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
    handle.await.unwrap().unwrap();

    let err = client().get(format!("http://{proxy}/foo")).send().await;
    assert!(err.is_err(), "listener must be closed after shutdown");
}

#[tokio::test]
async fn longest_prefix_wins_end_to_end() {
    let (backend_api, _rx_api) = common::start_recording_backend("api").await;
    let (backend_v1, mut rx_v1) = common::start_recording_backend("v1").await;
    let (proxy, _shutdown, _handle) = start_proxy(
        config_with(vec![("/api", backend_api), ("/api/v1", backend_v1)]),
        pooled(),
    )
    .await;

    let res = client()
        .get(format!("http://{proxy}/api/v1/users"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.text().await.unwrap(), "v1");
    assert_eq!(rx_v1.recv().await.unwrap(), "GET /users HTTP/1.1");
}
