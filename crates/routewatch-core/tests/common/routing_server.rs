//! Minimal HTTP/1.1 server standing in for the routing API in integration tests.
//!
//! Answers every GET with a fixed JSON body, optionally preceded by a number
//! of 503 responses. Records each request line so tests can inspect the URL.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone, Copy, Default)]
pub struct RoutingServerOptions {
    /// Number of initial requests answered with 503 Service Unavailable.
    pub initial_failures: u32,
}

pub struct RoutingServer {
    /// Base URL to hand to the client, e.g. "http://127.0.0.1:12345/routing/1/calculateRoute".
    pub base_url: String,
    hits: Arc<AtomicU32>,
    request_lines: Arc<Mutex<Vec<String>>>,
}

impl RoutingServer {
    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn request_lines(&self) -> Vec<String> {
        self.request_lines.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread serving `body`. Runs until the process exits.
pub fn start(body: &str) -> RoutingServer {
    start_with_options(body, RoutingServerOptions::default())
}

pub fn start_with_options(body: &str, opts: RoutingServerOptions) -> RoutingServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body.to_string());
    let hits = Arc::new(AtomicU32::new(0));
    let request_lines = Arc::new(Mutex::new(Vec::new()));

    {
        let hits = Arc::clone(&hits);
        let request_lines = Arc::clone(&request_lines);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let body = Arc::clone(&body);
                let hits = Arc::clone(&hits);
                let request_lines = Arc::clone(&request_lines);
                thread::spawn(move || handle(stream, &body, opts, &hits, &request_lines));
            }
        });
    }

    RoutingServer {
        base_url: format!("http://127.0.0.1:{}/routing/1/calculateRoute", port),
        hits,
        request_lines,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    body: &str,
    opts: RoutingServerOptions,
    hits: &AtomicU32,
    request_lines: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let first_line = request.lines().next().unwrap_or("").to_string();
    if !first_line.starts_with("GET ") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }
    request_lines.lock().unwrap().push(first_line);

    let seen = hits.fetch_add(1, Ordering::SeqCst);
    if seen < opts.initial_failures {
        let _ = stream.write_all(
            b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        return;
    }

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}
