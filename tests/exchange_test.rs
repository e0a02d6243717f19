//! End-to-end exchanges against in-process HTTP servers.

mod common;

use common::{find, serve_bytes, serve_once, serve_silent};
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use hcnet::{Client, NetError};
use std::io::Write;
use std::time::Duration;

fn host(port: u16, path: &str) -> String {
    format!("127.0.0.1:{port}{path}")
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn test_content_length_response() {
    let (port, server) =
        serve_bytes(&b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nHELLOextra"[..]);

    let resp = Client::new().get(host(port, "/index.html")).send().unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.reason(), "OK");
    assert_eq!(resp.headers().length(), 38);
    assert_eq!(resp.text().unwrap(), "HELLO");

    let request = String::from_utf8(server.join().unwrap()).unwrap();
    assert!(request.starts_with("GET /index.html HTTP/1.1\r\n"));
    assert!(request.contains(&format!("\r\nHost: 127.0.0.1:{port}\r\n")));
    assert!(request.contains("\r\nUser-Agent: hcli/"));
    assert!(request.ends_with("Connection: close\r\n\r\n"));
}

#[test]
fn test_chunked_response_in_small_fragments() {
    let (port, _server) = serve_once(vec![
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n".to_vec(),
        b"4\r\nWiki\r\n".to_vec(),
        b"5\r\npedia\r\n".to_vec(),
        b"0\r\n\r\n".to_vec(),
    ]);

    let resp = Client::builder()
        .read_buffer_size(7)
        .build()
        .get(host(port, "/"))
        .send()
        .unwrap();
    assert!(resp.headers().equals("Transfer-Encoding", "chunked"));
    assert_eq!(resp.text().unwrap(), "Wikipedia");
}

#[test]
fn test_gzip_response() {
    let body = gzip(b"compressed hello");
    let mut response = format!(
        "HTTP/1.1 200 OK\r\nContent-Encoding: gzip\r\nContent-Length: {}\r\n\r\n",
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(&body);
    let (port, server) = serve_bytes(response);

    let resp = Client::builder()
        .gzip(true)
        .build()
        .get(host(port, "/"))
        .send()
        .unwrap();
    assert_eq!(&resp.body()[..], b"compressed hello");

    let request = String::from_utf8(server.join().unwrap()).unwrap();
    assert!(request.contains("\r\nAccept-Encoding: gzip, deflate\r\n"));
}

#[test]
fn test_deflate_over_chunked_response() {
    let body = zlib(b"deflated and chunked");
    let (first, second) = body.split_at(body.len() / 2);

    let mut response = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nContent-Encoding: deflate\r\n\r\n"
        .to_vec();
    for part in [first, second] {
        response.extend_from_slice(format!("{:x}\r\n", part.len()).as_bytes());
        response.extend_from_slice(part);
        response.extend_from_slice(b"\r\n");
    }
    response.extend_from_slice(b"0\r\n\r\n");
    let (port, _server) = serve_bytes(response);

    let resp = Client::new().get(host(port, "/")).send().unwrap();
    assert_eq!(resp.text().unwrap(), "deflated and chunked");
}

#[test]
fn test_stream_until_close() {
    let (port, _server) = serve_once(vec![
        b"HTTP/1.0 200 OK\r\nServer: test\r\n\r\npart one, ".to_vec(),
        b"part two".to_vec(),
    ]);

    let resp = Client::new().get(host(port, "/")).send().unwrap();
    assert_eq!(resp.text().unwrap(), "part one, part two");
}

#[test]
fn test_repeated_headers_keep_arrival_order() {
    let (port, _server) = serve_bytes(
        &b"HTTP/1.1 200 OK\r\nSet-Cookie: a=1\r\nContent-Length: 0\r\nSet-Cookie: b=2\r\n\r\n"[..],
    );

    let resp = Client::new().get(host(port, "/")).send().unwrap();
    assert_eq!(resp.headers().get("Set-Cookie"), ["a=1", "b=2"]);
    assert_eq!(resp.headers().keys(), ["Set-Cookie", "Content-Length"]);
    assert!(resp.body().is_empty());
}

#[test]
fn test_post_params_sent_as_form_body() {
    let (port, server) = serve_bytes(&b"HTTP/1.1 201 Created\r\nContent-Length: 0\r\n\r\n"[..]);

    let resp = Client::new()
        .post(host(port, "/form"))
        .param("name", "hc net")
        .param("lang", "rust")
        .cookie("session=abc")
        .header("X-Request-Id", "42")
        .send()
        .unwrap();
    assert_eq!(resp.status(), 201);

    let request = server.join().unwrap();
    let head_end = find(&request, b"\r\n\r\n").unwrap() + 4;
    let head = String::from_utf8_lossy(&request[..head_end]);
    assert!(head.starts_with("POST /form HTTP/1.1\r\n"));
    assert!(head.contains("\r\nX-Request-Id: 42\r\n"));
    assert!(head.contains("\r\nCookie: session=abc\r\n"));
    assert!(head.contains("\r\nContent-Type: application/x-www-form-urlencoded\r\n"));
    assert!(head.contains("\r\nContent-Length: 21\r\n"));
    assert_eq!(&request[head_end..], b"name=hc+net&lang=rust");
}

#[test]
fn test_get_params_sent_in_query() {
    let (port, server) = serve_bytes(&b"HTTP/1.1 204 No Content\r\n\r\n"[..]);

    let resp = Client::new()
        .get(host(port, "/search"))
        .param("q", "a b")
        .send()
        .unwrap();
    assert_eq!(resp.status(), 204);
    assert!(resp.body().is_empty());

    let request = String::from_utf8(server.join().unwrap()).unwrap();
    assert!(request.starts_with("GET /search?q=a+b HTTP/1.1\r\n"));
}

#[test]
fn test_head_request_has_no_body() {
    let (port, _server) = serve_bytes(&b"HTTP/1.1 200 OK\r\nContent-Length: 512\r\n\r\n"[..]);

    let resp = Client::new().head(host(port, "/")).send().unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.body().is_empty());
}

#[test]
fn test_short_body_is_an_error() {
    let (port, _server) =
        serve_bytes(&b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\ntoo short"[..]);

    let err = Client::new().get(host(port, "/")).send().unwrap_err();
    assert_eq!(
        err,
        NetError::ContentLengthMismatch {
            expected: 100,
            actual: 9
        }
    );
}

#[test]
fn test_malformed_chunk_size() {
    let (port, _server) = serve_bytes(
        &b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\nnope\r\ndata\r\n0\r\n\r\n"[..],
    );

    let err = Client::new().get(host(port, "/")).send().unwrap_err();
    assert!(matches!(err, NetError::InvalidChunkedEncoding { .. }));
    assert_eq!(err.as_i32(), -321);
}

#[test]
fn test_peer_closes_without_response() {
    let (port, _server) = serve_bytes(Vec::new());

    let err = Client::new().get(host(port, "/")).send().unwrap_err();
    assert_eq!(err, NetError::EmptyResponse);
}

#[test]
fn test_connection_refused() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let err = Client::new().get(host(port, "/")).send().unwrap_err();
    assert!(matches!(err, NetError::ConnectionFailed { .. }));
    assert!(err.is_transport());
}

#[test]
fn test_read_timeout() {
    let port = serve_silent(Duration::from_secs(3));

    let err = Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .get(host(port, "/"))
        .send()
        .unwrap_err();
    assert_eq!(err, NetError::ConnectionTimedOut);
}

#[test]
fn test_empty_host() {
    assert_eq!(Client::new().get("").send().unwrap_err(), NetError::EmptyHost);
}
