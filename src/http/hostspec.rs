//! `[host][:port][/path]` target strings.

use crate::base::neterror::NetError;

pub const DEFAULT_HTTP_PORT: u16 = 80;
pub const DEFAULT_HTTPS_PORT: u16 = 443;

/// Where one request goes: host, effective port and request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSpec {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl HostSpec {
    /// Split `input` into host, port and path.
    ///
    /// The path starts at the first `/` and is kept verbatim, defaulting to
    /// `/`. The port defaults to 80, or 443 when `tls` is set. IPv6 literals
    /// are written in brackets: `[::1]:8080/x`. A path holding whitespace or
    /// control characters is `InvalidUrl`, since it could not sit in a
    /// request line.
    pub fn parse(input: &str, tls: bool) -> Result<Self, NetError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(NetError::EmptyHost);
        }

        let (authority, path) = match input.find('/') {
            Some(idx) => (&input[..idx], &input[idx..]),
            None => (input, "/"),
        };
        if !is_request_target(path) {
            return Err(invalid(input));
        }

        let (host, port) = split_authority(authority).ok_or_else(|| invalid(input))?;
        if host.is_empty() {
            return Err(NetError::EmptyHost);
        }

        let port = match port {
            Some(p) => p.parse::<u16>().map_err(|_| invalid(input))?,
            None => default_port(tls),
        };

        Ok(Self {
            host: host.to_string(),
            port,
            path: path.to_string(),
        })
    }

    /// Value of the `Host` header: the host, plus `:port` when it is not the
    /// scheme's default.
    pub fn authority(&self, tls: bool) -> String {
        let host = if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        if self.port == default_port(tls) {
            host
        } else {
            format!("{}:{}", host, self.port)
        }
    }
}

fn default_port(tls: bool) -> u16 {
    if tls {
        DEFAULT_HTTPS_PORT
    } else {
        DEFAULT_HTTP_PORT
    }
}

/// No bytes that would end or split the request line.
pub(crate) fn is_request_target(path: &str) -> bool {
    !path.bytes().any(|b| b == b' ' || b.is_ascii_control())
}

fn invalid(input: &str) -> NetError {
    NetError::InvalidUrl(input.to_string())
}

/// `(host, port)` from `host`, `host:port`, `[v6]` or `[v6]:port`.
fn split_authority(authority: &str) -> Option<(&str, Option<&str>)> {
    if let Some(rest) = authority.strip_prefix('[') {
        let (host, after) = rest.split_once(']')?;
        return match after {
            "" => Some((host, None)),
            _ => Some((host, Some(after.strip_prefix(':')?))),
        };
    }
    match authority.split_once(':') {
        Some((host, port)) => Some((host, Some(port))),
        None => Some((authority, None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_host() {
        let spec = HostSpec::parse("example.com", false).unwrap();
        assert_eq!(spec.host, "example.com");
        assert_eq!(spec.port, 80);
        assert_eq!(spec.path, "/");
    }

    #[test]
    fn test_tls_default_port() {
        let spec = HostSpec::parse("example.com", true).unwrap();
        assert_eq!(spec.port, 443);
        assert_eq!(spec.authority(true), "example.com");
    }

    #[test]
    fn test_port_and_path() {
        let spec = HostSpec::parse("example.com:8080/api/v1?x=1", false).unwrap();
        assert_eq!(spec.host, "example.com");
        assert_eq!(spec.port, 8080);
        assert_eq!(spec.path, "/api/v1?x=1");
        assert_eq!(spec.authority(false), "example.com:8080");
    }

    #[test]
    fn test_path_starts_at_first_slash() {
        let spec = HostSpec::parse("example.com/a:b/c", false).unwrap();
        assert_eq!(spec.host, "example.com");
        assert_eq!(spec.port, 80);
        assert_eq!(spec.path, "/a:b/c");
    }

    #[test]
    fn test_ipv6_literal() {
        let spec = HostSpec::parse("[::1]:8443/x", true).unwrap();
        assert_eq!(spec.host, "::1");
        assert_eq!(spec.port, 8443);
        assert_eq!(spec.path, "/x");
        assert_eq!(spec.authority(true), "[::1]:8443");

        let spec = HostSpec::parse("[::1]", false).unwrap();
        assert_eq!(spec.port, 80);
    }

    #[test]
    fn test_empty_host() {
        assert_eq!(HostSpec::parse("", false).unwrap_err(), NetError::EmptyHost);
        assert_eq!(HostSpec::parse("   ", false).unwrap_err(), NetError::EmptyHost);
        assert_eq!(HostSpec::parse(":8080/x", false).unwrap_err(), NetError::EmptyHost);
    }

    #[test]
    fn test_path_with_line_break_or_space() {
        for input in [
            "example.com/a\r\nX-Evil: 1",
            "example.com/a\nb",
            "example.com/a b",
            "example.com:8080/\tx",
        ] {
            assert!(
                matches!(HostSpec::parse(input, false), Err(NetError::InvalidUrl(_))),
                "{input:?}"
            );
        }
    }

    #[test]
    fn test_bad_port() {
        for input in ["example.com:http", "example.com:99999", "example.com:", "[::1]x"] {
            assert!(
                matches!(HostSpec::parse(input, false), Err(NetError::InvalidUrl(_))),
                "{input}"
            );
        }
    }
}
