//! Shared utilities for integration tests.

use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, UnixListener};

/// A request as seen by a mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl RecordedRequest {
    #[allow(dead_code)]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

pub type Log = Arc<Mutex<Vec<RecordedRequest>>>;

/// Start a programmable container-runtime mock on a unix socket.
///
/// Every request is recorded; the handler decides status and JSON body.
#[allow(dead_code)]
pub fn start_mock_runtime<F, Fut>(socket_path: &Path, f: F) -> Log
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = UnixListener::bind(socket_path).unwrap();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);
    let task_log = log.clone();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let f = f.clone();
            let log = task_log.clone();
            tokio::spawn(serve_one(socket, log, f));
        }
    });

    log
}

/// Start a programmable HTTP mock on a TCP port; returns its base URL.
#[allow(dead_code)]
pub async fn start_mock_http<F, Fut>(f: F) -> (String, Log)
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);
    let task_log = log.clone();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let f = f.clone();
            let log = task_log.clone();
            tokio::spawn(serve_one(socket, log, f));
        }
    });

    (format!("http://{}", addr), log)
}

/// Docker-like handler: one container list, exec create and start all succeed.
#[allow(dead_code)]
pub async fn healthy_runtime(req: RecordedRequest) -> (u16, String) {
    match (req.method.as_str(), req.path.as_str()) {
        ("GET", "/containers/json") => (
            200,
            r#"[{"Id":"c0ffee000000aaaa","Names":["/caddy"]},{"Id":"bbbb","Names":["/other"]}]"#
                .to_string(),
        ),
        ("POST", "/containers/c0ffee000000aaaa/exec") => (201, r#"{"Id":"exec-1"}"#.to_string()),
        ("POST", "/exec/exec-1/start") => (200, String::new()),
        _ => (404, r#"{"message":"page not found"}"#.to_string()),
    }
}

async fn serve_one<S, F, Fut>(mut socket: S, log: Log, f: Arc<F>)
where
    S: AsyncRead + AsyncWrite + Unpin,
    F: Fn(RecordedRequest) -> Fut,
    Fut: Future<Output = (u16, String)>,
{
    let Some(request) = read_request(&mut socket).await else {
        return;
    };
    log.lock().unwrap().push(request.clone());

    let (status, body) = (*f)(request).await;
    let reason = match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        404 => "Not Found",
        409 => "Conflict",
        500 => "Internal Server Error",
        _ => "Unknown",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

async fn read_request<S: AsyncRead + Unpin>(socket: &mut S) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let content_length = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let end = buf.len().min(body_start + content_length);
    let body = String::from_utf8_lossy(&buf[body_start..end]).into_owned();

    Some(RecordedRequest { method, path, body })
}
