//! Local peers for exercising the client in tests: a scripted WebSocket
//! endpoint and a canned-response REST endpoint, both on ephemeral loopback
//! ports.

use std::future::Future;
use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::response::IntoResponse;
use axum::Router;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{accept_async, WebSocketStream};

/// Server side of one accepted test WebSocket.
pub(crate) type PeerSocket = WebSocketStream<TcpStream>;

/// Bind a loopback WebSocket listener and run `script` on the first
/// accepted connection. Returns the `ws://` URL to connect to.
pub(crate) async fn ws_peer<F, Fut>(script: F) -> String
where
    F: FnOnce(PeerSocket) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ws listener");
    let addr = listener.local_addr().expect("listener addr");
    tokio::spawn(async move {
        if let Ok((stream, _)) = listener.accept().await {
            if let Ok(socket) = accept_async(stream).await {
                script(socket).await;
            }
        }
    });
    format!("ws://{addr}")
}

/// Keep a peer socket open without ever sending on it.
pub(crate) async fn hold_open(socket: PeerSocket) {
    let _socket = socket;
    std::future::pending::<()>().await;
}

/// One request observed by [`rest_peer`].
#[derive(Debug, Clone)]
pub(crate) struct SeenRequest {
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Vec<u8>,
}

impl SeenRequest {
    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

pub(crate) type SeenRequests = Arc<Mutex<Vec<SeenRequest>>>;

#[derive(Clone)]
struct Canned {
    status: u16,
    body: serde_json::Value,
    seen: SeenRequests,
}

/// REST endpoint answering every request with one canned JSON response,
/// recording what it saw. Returns the base URL and the request log.
pub(crate) async fn rest_peer(status: u16, body: serde_json::Value) -> (String, SeenRequests) {
    let seen: SeenRequests = Arc::new(Mutex::new(Vec::new()));
    let canned = Canned {
        status,
        body,
        seen: Arc::clone(&seen),
    };
    let app = Router::new().fallback(respond).with_state(canned);
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind rest listener");
    let addr = listener.local_addr().expect("listener addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve rest peer");
    });
    (format!("http://{addr}"), seen)
}

async fn respond(State(canned): State<Canned>, request: Request) -> impl IntoResponse {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);
    let headers = request
        .headers()
        .iter()
        .map(|(key, value)| {
            (
                key.to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let body = to_bytes(request.into_body(), usize::MAX)
        .await
        .unwrap_or_default()
        .to_vec();

    canned.seen.lock().unwrap().push(SeenRequest {
        method,
        path,
        query,
        headers,
        body,
    });

    (
        axum::http::StatusCode::from_u16(canned.status).expect("valid status"),
        axum::Json(canned.body.clone()),
    )
}
