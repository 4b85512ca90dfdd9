//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use axum::http::StatusCode;
use caddyfile_editor::config::EditorConfig;
use caddyfile_editor::lifecycle::{startup, Shutdown};
use tempfile::TempDir;

/// A request as seen by the mock control API.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

pub type Recorded = Arc<Mutex<Vec<RecordedRequest>>>;

/// Start a programmable mock control API on an ephemeral port.
///
/// Every request is recorded before `f` decides the response.
pub async fn start_control_api<F, Fut>(f: F) -> (SocketAddr, Recorded)
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let log = recorded.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let log = log.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        log.lock().unwrap().push(request.clone());
                        let (status, body) = f(request).await;

                        let reason = StatusCode::from_u16(status)
                            .ok()
                            .and_then(|s| s.canonical_reason())
                            .unwrap_or("Unknown");
                        let response_str = format!(
                            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            reason,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, recorded)
}

/// Mock control API that answers every call with a fixed status and body.
pub async fn start_fixed_control_api(status: u16, body: &'static str) -> (SocketAddr, Recorded) {
    start_control_api(move |_| async move { (status, body.to_string()) }).await
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let mut content_length = 0usize;
    let mut content_type = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().ok()?;
            } else if name.eq_ignore_ascii_case("content-type") {
                content_type = Some(value.to_string());
            }
        }
    }

    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(RecordedRequest {
        method,
        path,
        content_type,
        body,
    })
}

/// A base URL nobody is listening on.
pub async fn unreachable_control_api() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// A running editor backed by a scratch directory.
pub struct Editor {
    pub addr: SocketAddr,
    pub caddyfile: PathBuf,
    pub client: reqwest::Client,
    shutdown: Shutdown,
    _dir: TempDir,
}

impl Editor {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn caddyfile_contents(&self) -> String {
        std::fs::read_to_string(&self.caddyfile).unwrap()
    }
}

impl Drop for Editor {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Test configuration rooted in `dir`.
pub fn test_config(dir: &std::path::Path, control_api: &str) -> EditorConfig {
    let mut config = EditorConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.control_api.base_url = control_api.to_string();
    config.control_api.connect_timeout_secs = 2;
    config.control_api.request_timeout_secs = 5;
    config.storage.caddyfile_path = dir.join("config").join("Caddyfile").display().to_string();
    config.storage.static_dir = dir.join("static").display().to_string();
    config
}

/// Start an editor. `initial` seeds the Caddyfile; `None` leaves it absent.
pub async fn start_editor(control_api: &str, initial: Option<&str>) -> Editor {
    start_editor_with(control_api, initial, |_| {}).await
}

pub async fn start_editor_with<F>(control_api: &str, initial: Option<&str>, tweak: F) -> Editor
where
    F: FnOnce(&mut EditorConfig),
{
    let dir = tempfile::tempdir().unwrap();
    let static_dir = dir.path().join("static");
    std::fs::create_dir_all(&static_dir).unwrap();
    std::fs::write(static_dir.join("index.html"), "<h1>Caddyfile editor</h1>").unwrap();
    std::fs::write(static_dir.join("app.js"), "console.log('editor');").unwrap();

    let caddyfile = dir.path().join("config").join("Caddyfile");
    if let Some(contents) = initial {
        std::fs::create_dir_all(caddyfile.parent().unwrap()).unwrap();
        std::fs::write(&caddyfile, contents).unwrap();
    }

    let mut config = test_config(dir.path(), control_api);
    tweak(&mut config);

    let server = startup::prepare(config).await.unwrap();
    let listener = startup::bind(server.config()).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    Editor {
        addr,
        caddyfile,
        client,
        shutdown,
        _dir: dir,
    }
}
