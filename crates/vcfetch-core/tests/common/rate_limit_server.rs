//! Minimal HTTP/1.1 server that replays a script of replies for integration tests.
//!
//! Each connection gets the next reply in the script; once the script runs out
//! the last reply repeats. Every response closes the connection.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u32,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            headers: vec![("Content-Type".to_string(), "text/plain; charset=utf-8".to_string())],
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn too_many_requests() -> Self {
        Self {
            status: 429,
            headers: Vec::new(),
            body: b"rate limited\n".to_vec(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: &[u8]) -> Self {
        self.body = body.to_vec();
        self
    }
}

pub struct Server {
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl Server {
    /// Requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread. The server runs until the process exits.
pub fn start(script: Vec<Reply>) -> Server {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let last = script.last().cloned().unwrap_or_else(|| Reply::ok(""));
    let script = Arc::new(Mutex::new(VecDeque::from(script)));
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_srv = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let reply = script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| last.clone());
            hits_srv.fetch_add(1, Ordering::SeqCst);
            handle(stream, &reply);
        }
    });
    Server {
        url: format!("http://127.0.0.1:{}/repo.git/info/refs", port),
        hits,
    }
}

fn reason(status: u32) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

fn handle(mut stream: std::net::TcpStream, reply: &Reply) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    // Drain the request head; bodies are never sent by the client under test.
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    let is_head = request.starts_with(b"HEAD ");

    let mut head = format!("HTTP/1.1 {} {}\r\n", reply.status, reason(reply.status));
    for (name, value) in &reply.headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    head.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n",
        reply.body.len()
    ));
    let _ = stream.write_all(head.as_bytes());
    if !is_head {
        let _ = stream.write_all(&reply.body);
    }
    let _ = stream.flush();
}
