//! Test doubles shared by the unit tests: a canned [`PageRenderer`] and a
//! throwaway HTTP server for article pages.

use crate::browser::{PageRenderer, RenderError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

enum FakePage {
    Html(String),
    Timeout,
    Fatal,
}

/// Renderer that serves canned HTML and records every requested URL.
///
/// Unknown URLs render as an empty `<body>`.
#[derive(Default)]
pub struct FakeRenderer {
    pages: HashMap<String, FakePage>,
    requested: Arc<Mutex<Vec<String>>>,
    shutdowns: Arc<AtomicUsize>,
}

impl FakeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), FakePage::Html(html.into()));
        self
    }

    pub fn timeout(mut self, url: &str) -> Self {
        self.pages.insert(url.to_string(), FakePage::Timeout);
        self
    }

    pub fn fatal(mut self, url: &str) -> Self {
        self.pages.insert(url.to_string(), FakePage::Fatal);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    /// Handles that stay readable after the renderer has been consumed.
    pub fn handles(&self) -> (Arc<Mutex<Vec<String>>>, Arc<AtomicUsize>) {
        (Arc::clone(&self.requested), Arc::clone(&self.shutdowns))
    }
}

impl PageRenderer for FakeRenderer {
    async fn render(
        &mut self,
        url: &str,
        ready_selector: &str,
        timeout: Duration,
    ) -> Result<String, RenderError> {
        self.requested.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(FakePage::Html(html)) => Ok(html.clone()),
            Some(FakePage::Timeout) => Err(RenderError::Timeout {
                waiting_for: format!("selector {ready_selector:?}"),
                timeout,
            }),
            Some(FakePage::Fatal) => Err(RenderError::Driver("session deleted".to_string())),
            None => Ok("<html><body></body></html>".to_string()),
        }
    }

    fn shutdown(self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}

/// Minimal HTTP/1.1 server answering from a path → (status, body) table.
/// Unknown paths get a 404.
pub struct TestServer {
    pub base: Url,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start(routes: Vec<(&str, u16, String)>) -> Self {
        let routes: HashMap<String, (u16, String)> = routes
            .into_iter()
            .map(|(path, status, body)| (path.to_string(), (status, body)))
            .collect();
        let routes = Arc::new(routes);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let routes = Arc::clone(&routes);
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut chunk = [0u8; 1024];
                    loop {
                        let n = socket.read(&mut chunk).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        request.extend_from_slice(&chunk[..n]);
                        if request.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }

                    let request = String::from_utf8_lossy(&request);
                    let path = request.split_whitespace().nth(1).unwrap_or("/");
                    let (status, body) = routes
                        .get(path)
                        .cloned()
                        .unwrap_or((404, "<html><body>not found</body></html>".to_string()));
                    let reason = match status {
                        200 => "OK",
                        404 => "Not Found",
                        500 => "Internal Server Error",
                        _ => "Unknown",
                    };
                    let response = format!(
                        "HTTP/1.1 {status} {reason}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base: Url::parse(&format!("http://{addr}/")).unwrap(),
            handle,
        }
    }

    /// Server that accepts connections but never answers, for timeouts.
    pub async fn stalled() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        Self {
            base: Url::parse(&format!("http://{addr}/")).unwrap(),
            handle,
        }
    }

    /// Absolute URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        self.base.join(path).unwrap().to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// HTTP client that never routes loopback traffic through a proxy.
pub fn local_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}
