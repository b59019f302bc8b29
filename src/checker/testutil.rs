// src/checker/testutil.rs
// =============================================================================
// A miniature HTTP server for tests, in the spirit of Go's httptest.
//
// It speaks just enough HTTP/1.1 for reqwest to be happy: it reads the
// request headers, hands the path to a handler, and writes back an empty
// response with the status code the handler chose. Handlers are async so
// tests can make the server slow on purpose.
// =============================================================================

use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub(crate) type Handler = Arc<dyn Fn(String) -> BoxFuture<'static, u16> + Send + Sync>;

/// Wraps an async closure from request path to status code.
pub(crate) fn handler<F, Fut>(f: F) -> Handler
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = u16> + Send + 'static,
{
    Arc::new(move |path| f(path).boxed())
}

pub(crate) struct TestServer {
    pub(crate) base_url: String,
    accept_loop: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.accept_loop.abort();
    }
}

/// Starts a server on an ephemeral local port.
pub(crate) async fn serve(handler: Handler) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let accept_loop = tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let handler = handler.clone();
            tokio::spawn(handle_connection(stream, handler));
        }
    });

    TestServer {
        base_url: format!("http://{addr}"),
        accept_loop,
    }
}

async fn handle_connection(mut stream: TcpStream, handler: Handler) {
    let mut buf = vec![0u8; 4096];
    let mut read = 0;
    // Read until the blank line that ends the request headers.
    loop {
        match stream.read(&mut buf[read..]).await {
            Ok(0) | Err(_) => return,
            Ok(n) => {
                read += n;
                if buf[..read].windows(4).any(|window| window == b"\r\n\r\n") {
                    break;
                }
                if read == buf.len() {
                    return;
                }
            }
        }
    }

    let request = String::from_utf8_lossy(&buf[..read]).into_owned();
    let path = request
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();

    let status = handler(path).await;
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Response",
    };
    let response =
        format!("HTTP/1.1 {status} {reason}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
