//! TLS configuration with BoringSSL.
//!
//! A [`TlsContext`] is created once by the application and handed to every
//! connect. It replaces process-wide SSL library state with an explicit value.

use crate::base::neterror::NetError;
use boring::ssl::{SslConnector, SslMethod, SslVerifyMode, SslVersion};

/// TLS settings shared by every connection of a client.
///
/// Peer certificate verification is **off** by default: the client trusts
/// any certificate the server presents. Turn it on with
/// [`TlsContext::verify_peer`] when talking to hosts with a valid chain.
#[derive(Debug, Clone)]
pub struct TlsContext {
    pub verify_peer: bool,
    pub min_version: Option<SslVersion>,
    pub max_version: Option<SslVersion>,
    pub cipher_list: Option<String>,
    /// Send SNI for host names. Never sent for IP literals.
    pub sni: bool,
}

impl Default for TlsContext {
    fn default() -> Self {
        Self {
            verify_peer: false,
            min_version: Some(SslVersion::TLS1_2),
            max_version: Some(SslVersion::TLS1_3),
            cipher_list: None,
            sni: true,
        }
    }
}

impl TlsContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable peer certificate (and host name) verification.
    pub fn verify_peer(mut self, verify: bool) -> Self {
        self.verify_peer = verify;
        self
    }

    pub fn min_version(mut self, version: SslVersion) -> Self {
        self.min_version = Some(version);
        self
    }

    pub fn max_version(mut self, version: SslVersion) -> Self {
        self.max_version = Some(version);
        self
    }

    pub fn cipher_list(mut self, ciphers: impl Into<String>) -> Self {
        self.cipher_list = Some(ciphers.into());
        self
    }

    pub fn sni(mut self, enabled: bool) -> Self {
        self.sni = enabled;
        self
    }

    /// Build a connector carrying these settings.
    pub fn connector(&self) -> Result<SslConnector, NetError> {
        let mut builder = SslConnector::builder(SslMethod::tls())
            .map_err(|e| NetError::SslProtocolError(e.to_string()))?;

        if let Some(min) = self.min_version {
            builder
                .set_min_proto_version(Some(min))
                .map_err(|e| NetError::SslProtocolError(e.to_string()))?;
        }
        if let Some(max) = self.max_version {
            builder
                .set_max_proto_version(Some(max))
                .map_err(|e| NetError::SslProtocolError(e.to_string()))?;
        }
        if let Some(ciphers) = &self.cipher_list {
            builder
                .set_cipher_list(ciphers)
                .map_err(|e| NetError::SslProtocolError(e.to_string()))?;
        }

        // Only HTTP/1.1 is spoken on the wire.
        builder
            .set_alpn_protos(b"\x08http/1.1")
            .map_err(|e| NetError::SslProtocolError(e.to_string()))?;

        if self.verify_peer {
            builder.set_verify(SslVerifyMode::PEER);
        } else {
            builder.set_verify(SslVerifyMode::NONE);
        }

        Ok(builder.build())
    }

    /// Check if SNI should be set for this host.
    /// Per RFC 6066, SNI MUST NOT be set for raw IP addresses.
    pub fn should_set_sni(&self, host: &str) -> bool {
        self.sni && host.parse::<std::net::IpAddr>().is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_does_not_verify() {
        let ctx = TlsContext::default();
        assert!(!ctx.verify_peer);
        assert!(ctx.sni);
        assert_eq!(ctx.min_version, Some(SslVersion::TLS1_2));
    }

    #[test]
    fn test_connector_builds() {
        assert!(TlsContext::default().connector().is_ok());
        assert!(TlsContext::default().verify_peer(true).connector().is_ok());
    }

    #[test]
    fn test_bad_cipher_list_is_rejected() {
        let ctx = TlsContext::default().cipher_list("NOT-A-CIPHER");
        assert!(matches!(ctx.connector(), Err(NetError::SslProtocolError(_))));
    }

    #[test]
    fn test_sni_skipped_for_ip_literals() {
        let ctx = TlsContext::default();
        assert!(ctx.should_set_sni("example.com"));
        assert!(!ctx.should_set_sni("127.0.0.1"));
        assert!(!ctx.should_set_sni("::1"));
        assert!(!ctx.clone().sni(false).should_set_sni("example.com"));
    }
}
