// Throw-away HTTP/1.1 server for existence-check tests.
//
// Answers every HEAD with one canned reply and every GET with another, so a
// test can simulate servers that mishandle HEAD. Runs until the test's
// runtime shuts down.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Debug, Clone, Copy)]
pub struct Reply {
    pub status: u16,
}

impl Reply {
    pub fn status(status: u16) -> Self {
        Self { status }
    }
}

/// Starts the server and returns its base URL ("http://127.0.0.1:PORT/").
pub async fn start(head: Reply, get: Reply) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let n = match stream.read(&mut buf).await {
                    Ok(n) if n > 0 => n,
                    _ => return,
                };
                let request = String::from_utf8_lossy(&buf[..n]);
                let reply = if request.starts_with("HEAD") { head } else { get };
                let response = format!(
                    "HTTP/1.1 {} Test\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    reply.status
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    format!("http://127.0.0.1:{}/", port)
}

/// A local port nothing is listening on.
pub fn unused_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.local_addr().expect("local addr").port()
}
