//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, Request, Uri},
    response::{IntoResponse, Response},
    Router,
};
use edge_relay::{RelayConfig, RelayServer, Shutdown};
use tokio::net::TcpListener;

/// A request as the origin saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

type Responder = Arc<dyn Fn(&Recorded) -> Response + Send + Sync>;

#[derive(Clone)]
struct OriginState {
    requests: Arc<Mutex<Vec<Recorded>>>,
    respond: Responder,
    delay: Duration,
}

/// Origin that records every request and answers with `respond`.
pub struct MockOrigin {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockOrigin {
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(&Recorded) -> Response + Send + Sync + 'static,
    {
        Self::start_delayed(Duration::ZERO, respond).await
    }

    /// Origin that waits `delay` before sending response headers.
    pub async fn start_delayed<F>(delay: Duration, respond: F) -> Self
    where
        F: Fn(&Recorded) -> Response + Send + Sync + 'static,
    {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = OriginState {
            requests: requests.clone(),
            respond: Arc::new(respond),
            delay,
        };
        let app = Router::new().fallback(record).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, requests }
    }

    /// Origin answering `200 OK` with a fixed body.
    pub async fn fixed(body: &'static str) -> Self {
        Self::start(move |_| body.into_response()).await
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn only_request(&self) -> Recorded {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one outbound request");
        requests.into_iter().next().unwrap()
    }
}

async fn record(State(state): State<OriginState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    let recorded = Recorded {
        method: parts.method,
        uri: parts.uri,
        headers: parts.headers,
        body,
    };
    let response = (state.respond)(&recorded);
    state.requests.lock().unwrap().push(recorded);
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    response
}

/// Relay configuration pointing at `origin`.
pub fn config_for(origin: Option<String>) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.origin.env_var = "EDGE_RELAY_TEST_UNSET_ORIGIN".to_string();
    config.origin.url = origin;
    config
}

/// A relay serving on an ephemeral port.
pub struct RunningRelay {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl RunningRelay {
    pub async fn start(config: RelayConfig) -> Self {
        let server = RelayServer::new(config).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let rx = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, rx).await;
        });

        Self { addr, shutdown }
    }

    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

impl Drop for RunningRelay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Client that never follows redirects.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
