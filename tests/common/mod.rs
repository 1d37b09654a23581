//! In-process HTTP stub standing in for the Gemini endpoint.

#![allow(dead_code)]

use ayan_chat::{GeminiClient, Settings};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// What the stub saw for the one request it served
#[derive(Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub body: String,
}

pub struct Stub {
    pub base_url: String,
    pub request: oneshot::Receiver<CapturedRequest>,
    /// Release the reply; the stub holds the response until this fires
    pub release: Option<oneshot::Sender<()>>,
}

fn header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|i| i + 4)
}

fn content_length(headers: &str) -> usize {
    headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse().ok())
                .flatten()
        })
        .unwrap_or(0)
}

/// Serve exactly one request with `status` and `body`.
pub async fn serve_once(status: u16, body: &str) -> Stub {
    serve(status, body, false).await
}

/// Like `serve_once`, but the reply waits for `Stub::release`.
pub async fn serve_held(status: u16, body: &str) -> Stub {
    serve(status, body, true).await
}

async fn serve(status: u16, body: &str, held: bool) -> Stub {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (req_tx, req_rx) = oneshot::channel();
    let (release_tx, release_rx) = oneshot::channel::<()>();
    let body = body.to_string();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let (head_len, body_len) = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = header_end(&buf) {
                let headers = String::from_utf8_lossy(&buf[..end]).to_string();
                break (end, content_length(&headers));
            }
        };
        while buf.len() < head_len + body_len {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let head = String::from_utf8_lossy(&buf[..head_len]).to_string();
        let request_line = head.lines().next().unwrap_or_default().to_string();
        let request_body = String::from_utf8_lossy(&buf[head_len..]).to_string();
        let _ = req_tx.send(CapturedRequest {
            request_line,
            body: request_body,
        });

        if held {
            let _ = release_rx.await;
        }

        let response = format!(
            "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    Stub {
        base_url: format!("http://{addr}/v1beta"),
        request: req_rx,
        release: Some(release_tx),
    }
}

pub fn client_for(base_url: &str) -> GeminiClient {
    GeminiClient::new(&Settings {
        api_key: "test-key".to_string(),
        model: "gemini-2.0-flash".to_string(),
        base_url: base_url.to_string(),
    })
}

/// A base URL nothing is listening on
pub async fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/v1beta")
}
