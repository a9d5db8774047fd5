//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use rag_proxy::config::RagProxyConfig;
use rag_proxy::http::HttpServer;
use rag_proxy::lifecycle::Shutdown;
use rag_proxy::search::{SearchBackend, SearchError, SearchOptions, SearchReply, SearchResult};

/// How the scripted backend answers.
#[derive(Clone)]
#[allow(dead_code)]
pub enum Script {
    /// Stream `chunks` in stream mode, return `batch` otherwise.
    Answer {
        chunks: Vec<&'static str>,
        batch: serde_json::Value,
    },
    /// Always return `batch`, even when a stream was requested.
    BatchOnly(serde_json::Value),
    /// Fail every call with this message.
    Fail(&'static str),
    /// Sleep this long before answering with an empty batch.
    Stall(Duration),
}

/// In-process search backend that records every call.
#[allow(dead_code)]
pub struct ScriptedSearch {
    script: Script,
    calls: Mutex<Vec<(String, SearchOptions)>>,
}

#[allow(dead_code)]
impl ScriptedSearch {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, SearchOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for ScriptedSearch {
    async fn ai_search(&self, rag_name: &str, options: &SearchOptions) -> SearchResult<SearchReply> {
        self.calls
            .lock()
            .unwrap()
            .push((rag_name.to_string(), options.clone()));

        match &self.script {
            Script::Answer { chunks, batch } => {
                if options.stream {
                    let items: Vec<SearchResult<Bytes>> = chunks
                        .iter()
                        .map(|c| Ok(Bytes::from_static(c.as_bytes())))
                        .collect();
                    Ok(SearchReply::Stream(futures_util::stream::iter(items).boxed()))
                } else {
                    Ok(SearchReply::Batch(batch.clone()))
                }
            }
            Script::BatchOnly(batch) => Ok(SearchReply::Batch(batch.clone())),
            Script::Fail(message) => Err(SearchError::Api(message.to_string())),
            Script::Stall(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(SearchReply::Batch(serde_json::json!({})))
            }
        }
    }
}

/// Backend whose single stream is fed by the test, chunk by chunk.
#[allow(dead_code)]
pub struct ChannelSearch {
    chunks: Mutex<Option<mpsc::UnboundedReceiver<Bytes>>>,
}

#[allow(dead_code)]
impl ChannelSearch {
    /// The sender feeds the stream; dropping it ends the stream.
    pub fn new() -> (Arc<Self>, mpsc::UnboundedSender<Bytes>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let backend = Arc::new(Self {
            chunks: Mutex::new(Some(rx)),
        });
        (backend, tx)
    }
}

#[async_trait]
impl SearchBackend for ChannelSearch {
    async fn ai_search(&self, _rag_name: &str, _options: &SearchOptions) -> SearchResult<SearchReply> {
        let rx = self
            .chunks
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| SearchError::Api("stream already taken".into()))?;

        let stream = futures_util::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|chunk| (Ok::<_, SearchError>(chunk), rx))
        });
        Ok(SearchReply::Stream(stream.boxed()))
    }
}

/// Start the proxy on an ephemeral port with the given backend.
#[allow(dead_code)]
pub async fn start_proxy(backend: Arc<dyn SearchBackend>) -> (SocketAddr, Shutdown) {
    start_proxy_with_config(RagProxyConfig::default(), backend).await
}

/// Start the proxy on an ephemeral port with a custom configuration.
#[allow(dead_code)]
pub async fn start_proxy_with_config(
    config: RagProxyConfig,
    backend: Arc<dyn SearchBackend>,
) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, backend);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// A request as seen by the programmable upstream.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct CapturedRequest {
    pub head: String,
    pub body: Vec<u8>,
}

#[allow(dead_code)]
impl CapturedRequest {
    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim())
        })
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Start an HTTP/1.1 upstream that answers every request with a fixed
/// status, content type and body, reporting each request it receives.
#[allow(dead_code)]
pub async fn start_programmable_backend(
    status: u16,
    content_type: &'static str,
    body: String,
) -> (SocketAddr, mpsc::UnboundedReceiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let tx = tx.clone();
            let body = body.clone();
            tokio::spawn(async move {
                if let Some(request) = read_request(&mut socket).await {
                    let _ = tx.send(request);
                }

                let status_text = match status {
                    200 => "200 OK",
                    400 => "400 Bad Request",
                    401 => "401 Unauthorized",
                    404 => "404 Not Found",
                    500 => "500 Internal Server Error",
                    502 => "502 Bad Gateway",
                    _ => "200 OK",
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    content_type,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, rx)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while buf.len() < head_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some(CapturedRequest {
        head,
        body: buf[head_end..].to_vec(),
    })
}
