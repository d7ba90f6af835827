//! Minimal in-process HTTP server for exercising the client end-to-end.
//!
//! Binds a random loopback port and serves a canned response to every
//! connection. `hang()` accepts connections and never responds, for timeout
//! and cancellation tests.

// Not every test crate uses every helper.
#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{channel, Receiver};

/// Builds a full HTTP/1.1 response with the given status line, e.g.
/// `"200 OK"`.
pub fn http_response(status: &str, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

pub fn json_response(body: &str) -> String {
    http_response("200 OK", "application/json", body)
}

/// Serves `response` to every connection. Returns the base URL.
pub fn serve(response: String) -> String {
    let (url, _requests) = serve_capture(response);
    url
}

/// Serves `response` to every connection and captures each raw request
/// (head plus body) on the returned channel.
pub fn serve_capture(response: String) -> (String, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = channel();

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { break };
            let response = response.clone();
            let tx = tx.clone();
            std::thread::spawn(move || {
                let _ = handle(stream, &response, |request| {
                    let _ = tx.send(request);
                });
            });
        }
    });

    (format!("http://{addr}"), rx)
}

/// Accepts connections and never responds.
pub fn hang() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        // Keep the streams alive so the client sits waiting on the socket
        // instead of seeing a closed connection.
        let mut parked = Vec::new();
        for stream in listener.incoming() {
            let Ok(stream) = stream else { break };
            parked.push(stream);
        }
    });

    format!("http://{addr}")
}

/// Accepts connections, never responds, and signals on the returned channel
/// once a connected peer closes its end of the socket.
pub fn hang_notify_close() -> (String, Receiver<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = channel();

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let tx = tx.clone();
            std::thread::spawn(move || {
                // Drain whatever the client writes; EOF or an error means
                // the peer tore the connection down.
                let mut buf = [0u8; 1024];
                loop {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(_) => {}
                    }
                }
                let _ = tx.send(());
            });
        }
    });

    (format!("http://{addr}"), rx)
}

fn handle(
    stream: TcpStream,
    response: &str,
    capture: impl FnOnce(String),
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream);
    let mut request = String::new();
    let mut content_length = 0usize;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(()); // client went away
        }
        if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap_or(0);
        }
        let done = line == "\r\n";
        request.push_str(&line);
        if done {
            break;
        }
    }

    if content_length > 0 {
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body)?;
        request.push_str(&String::from_utf8_lossy(&body));
    }
    capture(request);

    let mut stream = reader.into_inner();
    stream.write_all(response.as_bytes())?;
    stream.flush()
}
