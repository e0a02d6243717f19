//! One-shot local servers for end-to-end tests.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

/// Read one request (header block plus `Content-Length` body) from `stream`.
pub fn read_request<S: Read>(stream: &mut S) -> Vec<u8> {
    let mut request = Vec::new();
    let mut buf = [0u8; 512];

    let header_end = loop {
        if let Some(pos) = find(&request, b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            return request;
        }
        request.extend_from_slice(&buf[..n]);
    };

    let body_len = content_length(&request[..header_end]);
    while request.len() < header_end + body_len {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buf[..n]);
    }
    request
}

fn content_length(head: &[u8]) -> usize {
    String::from_utf8_lossy(head)
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("Content-Length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Accept one connection, read the request, send `response` in `parts`
/// separate writes, then close. The handle yields the raw request.
pub fn serve_once(parts: Vec<Vec<u8>>) -> (u16, JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        for part in parts {
            stream.write_all(&part).unwrap();
            stream.flush().unwrap();
        }
        request
    });
    (port, handle)
}

/// [`serve_once`] with the whole response in a single write.
pub fn serve_bytes(response: impl Into<Vec<u8>>) -> (u16, JoinHandle<Vec<u8>>) {
    serve_once(vec![response.into()])
}

/// Accept one connection and hold it open without answering.
pub fn serve_silent(hold: std::time::Duration) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        let (stream, _): (TcpStream, _) = listener.accept().unwrap();
        thread::sleep(hold);
        drop(stream);
    });
    port
}
