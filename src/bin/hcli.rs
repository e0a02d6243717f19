//! hcli: send one HTTP/1.1 request and print the response.
//!
//! # Usage
//!
//! ```bash
//! # port 80, path /
//! hcli --host example.com
//!
//! # TLS on port 8443, path /login, with a form parameter
//! hcli --host example.com:8443/login -s -m POST --param user:alice
//! ```

// CLI tools are expected to print to stdout/stderr
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use hcnet::{Client, TlsContext};
use http::Method;
use tracing_subscriber::EnvFilter;

/// Send one HTTP/1.1 request and print the response.
///
/// Host values: `example.com` (port 80, path /), `example.com -s` (port
/// 443), `example.com:8443 -s`, `example.com:8080/login`.
#[derive(Parser, Debug)]
#[command(name = "hcli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Target as [host][:port][/path]
    #[arg(long)]
    host: String,

    /// Use TLS
    #[arg(long, short = 's')]
    ssl: bool,

    /// Send Accept-Encoding: gzip, deflate and gzip the request body
    #[arg(long, short = 'g')]
    gzip: bool,

    /// HTTP method
    #[arg(long, short = 'm', default_value = "GET", value_parser = parse_method)]
    method: Method,

    /// Extra request header, key:value (can be specified multiple times)
    #[arg(long, value_parser = parse_pair, action = clap::ArgAction::Append)]
    header: Vec<(String, String)>,

    /// Cookie value (can be specified multiple times)
    #[arg(long, action = clap::ArgAction::Append)]
    cookie: Vec<String>,

    /// Request parameter, key:value (can be specified multiple times)
    #[arg(long, value_parser = parse_pair, action = clap::ArgAction::Append)]
    param: Vec<(String, String)>,

    /// Socket deadline in seconds for connect, read and write
    #[arg(long)]
    timeout: Option<u64>,

    /// Verify the server certificate chain and host name
    #[arg(long)]
    verify_peer: bool,

    /// Print the body as a hex dump
    #[arg(long)]
    hex: bool,

    /// Log protocol progress to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn parse_method(s: &str) -> Result<Method> {
    Method::from_bytes(s.as_bytes()).map_err(|_| anyhow!("invalid method: {s}"))
}

/// `key:value`, split on the first colon.
fn parse_pair(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once(':')
        .ok_or_else(|| anyhow!("invalid format (key:value): {s}"))?;
    Ok((key.to_string(), value.to_string()))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "hcnet=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// 16 bytes per line: offset, hex bytes split in two groups, printable ASCII.
fn hex_dump(data: &[u8]) -> String {
    let mut out = String::new();
    for (i, line) in data.chunks(16).enumerate() {
        out.push_str(&format!("{:08x}  ", i * 16));
        for col in 0..16 {
            match line.get(col) {
                Some(b) => out.push_str(&format!("{b:02x} ")),
                None => out.push_str("   "),
            }
            if col == 7 {
                out.push(' ');
            }
        }
        out.push(' ');
        out.extend(line.iter().map(|&b| {
            if (0x20..=0x7e).contains(&b) {
                b as char
            } else {
                '.'
            }
        }));
        out.push('\n');
    }
    out
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut builder = Client::builder()
        .gzip(cli.gzip)
        .tls_context(TlsContext::new().verify_peer(cli.verify_peer));
    if let Some(secs) = cli.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder.build();

    let mut request = client.request(cli.method.clone(), &cli.host).ssl(cli.ssl);
    for (key, value) in &cli.header {
        request = request.header(key, value);
    }
    for cookie in cli.cookie {
        request = request.cookie(cookie);
    }
    for (key, value) in cli.param {
        request = request.param(key, value);
    }

    let resp = request
        .send()
        .with_context(|| format!("{} {} failed", cli.method, cli.host))?;
    let headers = resp.headers();

    println!("Response code {}, reason: '{}'", resp.status(), resp.reason());
    println!("List of headers (length: {}):", headers.length());
    for (key, value) in headers.iter() {
        println!("{key}: {value}");
    }
    println!("Body length: {}", resp.body().len());
    if !resp.body().is_empty() {
        if cli.hex {
            print!("{}", hex_dump(resp.body()));
        } else {
            println!("{}", String::from_utf8_lossy(resp.body()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair_splits_on_first_colon() {
        assert_eq!(
            parse_pair("Referer:http://example.com").unwrap(),
            ("Referer".to_string(), "http://example.com".to_string())
        );
        assert!(parse_pair("no-colon").is_err());
    }

    #[test]
    fn test_cli_arguments() {
        let cli = Cli::try_parse_from([
            "hcli", "--host", "example.com:8080/x", "-s", "-g", "-m", "POST", "--header",
            "X-A:1", "--header", "X-B:2", "--param", "k:v", "--cookie", "c=1",
        ])
        .unwrap();
        assert_eq!(cli.host, "example.com:8080/x");
        assert!(cli.ssl && cli.gzip);
        assert_eq!(cli.method, Method::POST);
        assert_eq!(cli.header.len(), 2);
        assert_eq!(cli.param, [("k".to_string(), "v".to_string())]);
        assert_eq!(cli.cookie, ["c=1"]);
    }

    #[test]
    fn test_malformed_header_rejected() {
        assert!(Cli::try_parse_from(["hcli", "--host", "x", "--header", "bad"]).is_err());
    }

    #[test]
    fn test_hex_dump() {
        let dump = hex_dump(b"HTTP/1.1 200 OK\r\nX");
        let lines: Vec<_> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("00000000  48 54 54 50 2f 31 2e 31  20 32 30 30"));
        assert!(lines[0].ends_with("HTTP/1.1 200 OK."));
        assert!(lines[1].starts_with("00000010  0a 58"));
        assert!(lines[1].ends_with(".X"));
    }
}
