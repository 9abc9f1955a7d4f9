//! Requester identity for rate limiting.
//!
//! The identity is the peer IP address, except when the peer is a trusted
//! reverse proxy: then the client address is taken from a forwarded header.
//! The header is ignored for every other peer, since anyone can send it.

use std::net::{IpAddr, SocketAddr};

use axum::http::{HeaderMap, HeaderName};
use tracing::warn;

/// Resolves an opaque identity string from connection details.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    trusted_proxies: Vec<IpAddr>,
    header: HeaderName,
}

impl IdentityResolver {
    /// Fails if `header` is not a valid HTTP header name.
    pub fn new(trusted_proxies: Vec<IpAddr>, header: &str) -> anyhow::Result<Self> {
        let header = HeaderName::from_bytes(header.as_bytes())
            .map_err(|e| anyhow::anyhow!("Invalid forwarded header {:?}: {}", header, e))?;
        Ok(Self {
            trusted_proxies,
            header,
        })
    }

    pub fn is_trusted(&self, ip: IpAddr) -> bool {
        self.trusted_proxies.contains(&ip)
    }

    pub fn resolve(&self, peer: SocketAddr, headers: &HeaderMap) -> String {
        let peer_ip = peer.ip();
        if !self.is_trusted(peer_ip) {
            return peer_ip.to_string();
        }

        // First entry wins for list-style headers such as X-Forwarded-For
        let forwarded = headers
            .get(&self.header)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        match forwarded {
            Some(client) => client.to_string(),
            None => {
                warn!(peer = %peer_ip, header = %self.header, "Trusted proxy sent no client address");
                peer_ip.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::net::Ipv4Addr;

    fn resolver() -> IdentityResolver {
        IdentityResolver::new(vec![IpAddr::V4(Ipv4Addr::LOCALHOST)], "Cf-Connecting-Ip").unwrap()
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("cf-connecting-ip", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_untrusted_peer_uses_address() {
        let peer: SocketAddr = "203.0.113.7:5555".parse().unwrap();
        assert_eq!(resolver().resolve(peer, &headers("198.51.100.1")), "203.0.113.7");
    }

    #[test]
    fn test_trusted_proxy_uses_header() {
        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        assert_eq!(resolver().resolve(peer, &headers("198.51.100.1")), "198.51.100.1");
    }

    #[test]
    fn test_trusted_proxy_takes_first_forwarded_entry() {
        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        assert_eq!(
            resolver().resolve(peer, &headers(" 198.51.100.1 , 10.0.0.1")),
            "198.51.100.1"
        );
    }

    #[test]
    fn test_trusted_proxy_without_header_falls_back() {
        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        assert_eq!(resolver().resolve(peer, &HeaderMap::new()), "127.0.0.1");
    }

    #[test]
    fn test_ipv6_peer() {
        let peer: SocketAddr = "[2001:db8::1]:443".parse().unwrap();
        assert_eq!(resolver().resolve(peer, &HeaderMap::new()), "2001:db8::1");
    }

    #[test]
    fn test_invalid_header_name() {
        assert!(IdentityResolver::new(vec![], "bad header").is_err());
    }
}
