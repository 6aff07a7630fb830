//! Minimal HTTP/1.1 server standing in for a media CDN in integration tests.
//!
//! Serves a single static body for every GET. Options let a test return an
//! error status, drip the body slowly, or close the connection early.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default)]
pub struct MediaServerOptions {
    /// Status line sent instead of `200 OK` (body is then empty).
    pub error_status: Option<&'static str>,
    /// Send the body in 1 KiB chunks with this pause between them.
    pub drip: Option<Duration>,
    /// Announce the full length but stop after this many bytes.
    pub truncate_at: Option<usize>,
}

/// A running server: base URL plus the raw request heads it has received.
pub struct MediaServer {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MediaServer {
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread serving `body` at `/media`.
/// The server runs until the process exits.
pub fn start(body: Vec<u8>) -> MediaServer {
    start_with_options(body, MediaServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: MediaServerOptions) -> MediaServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let seen = Arc::clone(&seen);
            thread::spawn(move || handle(stream, &body, opts, &seen));
        }
    });
    MediaServer {
        url: format!("http://127.0.0.1:{}/media", port),
        requests,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    body: &[u8],
    opts: MediaServerOptions,
    seen: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]).into_owned();
    let is_get = request.starts_with("GET ");
    seen.lock().unwrap().push(request);
    if !is_get {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }

    if let Some(status) = opts.error_status {
        let response = format!("HTTP/1.1 {}\r\nContent-Length: 0\r\n\r\n", status);
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    let head = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: video/mp4\r\nContent-Length: {}\r\n\r\n",
        body.len()
    );
    if stream.write_all(head.as_bytes()).is_err() {
        return;
    }

    let end = opts.truncate_at.unwrap_or(body.len()).min(body.len());
    let payload = &body[..end];
    match opts.drip {
        Some(pause) => {
            for chunk in payload.chunks(1024) {
                if stream.write_all(chunk).is_err() {
                    return;
                }
                thread::sleep(pause);
            }
        }
        None => {
            let _ = stream.write_all(payload);
        }
    }
}
