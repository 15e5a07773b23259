//! Loader that fetches pages over HTTP.
//!
//! Existence is checked with a `HEAD` request and content is fetched with
//! `GET`, both relative to a base URL.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::content::{Content, ContentPath};
use crate::error::{NavError, NavResult};
use crate::loader::Loader;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HttpLoader {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLoader {
    /// Creates a loader rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// [`NavError::Transport`] if the HTTP client cannot be initialised.
    pub fn new(base_url: &str) -> NavResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| NavError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, path: &ContentPath) -> String {
        format!("{}/{}", self.base_url, path.as_str().trim_start_matches('/'))
    }
}

#[async_trait]
impl Loader for HttpLoader {
    async fn probe(&self, path: &ContentPath) -> bool {
        match self.client.head(self.url_for(path)).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("probe for {path} failed: {e}");
                false
            }
        }
    }

    async fn fetch(&self, path: &ContentPath) -> NavResult<Content> {
        let response = self
            .client
            .get(self.url_for(path))
            .send()
            .await
            .map_err(|e| NavError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(NavError::ContentNotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(NavError::Transport(format!("{status} for {path}")));
        }

        let markup = response
            .text()
            .await
            .map_err(|e| NavError::Transport(e.to_string()))?;
        Ok(Content::new(path.clone(), markup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves `screens/connect.html` and answers 404 for anything else,
    /// except `screens/broken.html` which answers 500.
    async fn spawn_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        }
                    }
                    let head = String::from_utf8_lossy(&buf);
                    let mut parts = head.split_whitespace();
                    let method = parts.next().unwrap_or_default().to_string();
                    let target = parts.next().unwrap_or_default().to_string();

                    let (status, body) = match target.as_str() {
                        "/app/screens/connect.html" => ("200 OK", "<div id=\"connect\"></div>"),
                        "/app/screens/broken.html" => ("500 Internal Server Error", "boom"),
                        _ => ("404 Not Found", "missing"),
                    };
                    let payload = if method == "HEAD" { "" } else { body };
                    let response = format!(
                        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        format!("http://{addr}/app/")
    }

    #[test]
    fn url_for_joins_without_double_slash() {
        let loader = HttpLoader::new("http://example.com/app/").unwrap();
        assert_eq!(
            loader.url_for(&ContentPath::new("screens/a.html")),
            "http://example.com/app/screens/a.html"
        );
        assert_eq!(
            loader.url_for(&ContentPath::new("/screens/a.html")),
            "http://example.com/app/screens/a.html"
        );
    }

    #[tokio::test]
    async fn probe_and_fetch_existing_page() {
        let base = spawn_server().await;
        let loader = HttpLoader::new(&base).unwrap();
        let path = ContentPath::new("screens/connect.html");

        assert!(loader.probe(&path).await);
        let content = loader.fetch(&path).await.unwrap();
        assert_eq!(content.markup, "<div id=\"connect\"></div>");
    }

    #[tokio::test]
    async fn missing_page_is_not_found() {
        let base = spawn_server().await;
        let loader = HttpLoader::new(&base).unwrap();
        let path = ContentPath::new("screens/missing.html");

        assert!(!loader.probe(&path).await);
        assert!(loader.fetch(&path).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn server_error_is_transport() {
        let base = spawn_server().await;
        let loader = HttpLoader::new(&base).unwrap();
        let err = loader
            .fetch(&ContentPath::new("screens/broken.html"))
            .await
            .unwrap_err();
        assert!(matches!(err, NavError::Transport(_)));
    }
}
