//! services/client/src/adapters/reachability.rs
//!
//! Implementations of the `ReachabilityProbe` port.

use async_trait::async_trait;
use recipe_finder_core::ports::{PortError, PortResult, ReachabilityProbe};
use reqwest::Url;
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

/// Treats the network as reachable when a TCP connection to `host:port` opens
/// within `timeout`.
///
/// Built with [`Self::for_url`], it probes the backend itself. Detection then
/// hits that same host, so an unreachable probe usually means detection fails
/// too and the offline dataset is rarely reached. Pointing the probe at a
/// separate address (`REACHABILITY_ADDR`) checks general connectivity instead,
/// which lets offline matching run while the backend is still answering
/// detection on a local network.
#[derive(Debug, Clone)]
pub struct TcpReachability {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpReachability {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Probes the host and port `url` points at (scheme default when no port is given).
    pub fn for_url(url: &Url, timeout: Duration) -> PortResult<Self> {
        let host = url
            .host_str()
            .ok_or_else(|| PortError::Unexpected(format!("{} has no host", url)))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| PortError::Unexpected(format!("{} has no port", url)))?;
        Ok(Self::new(host, port, timeout))
    }
}

#[async_trait]
impl ReachabilityProbe for TcpReachability {
    async fn is_reachable(&self) -> bool {
        let connect = TcpStream::connect((self.host.as_str(), self.port));
        let reachable = matches!(tokio::time::timeout(self.timeout, connect).await, Ok(Ok(_)));
        debug!(host = %self.host, port = self.port, reachable, "reachability probed");
        reachable
    }
}

/// A probe with a fixed answer, e.g. to force the offline path.
#[derive(Debug, Clone, Copy)]
pub struct FixedReachability(pub bool);

#[async_trait]
impl ReachabilityProbe for FixedReachability {
    async fn is_reachable(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn open_port_is_reachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let probe = TcpReachability::new("127.0.0.1", port, Duration::from_secs(1));
        assert!(probe.is_reachable().await);
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let probe = TcpReachability::new("127.0.0.1", port, Duration::from_secs(1));
        assert!(!probe.is_reachable().await);
    }

    #[tokio::test]
    async fn separate_address_is_probed_instead_of_backend() {
        let backend = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let backend_url = Url::parse(&format!("http://{}", backend.local_addr().unwrap())).unwrap();
        drop(backend);
        let gateway = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let gateway_port = gateway.local_addr().unwrap().port();

        let via_backend = TcpReachability::for_url(&backend_url, Duration::from_secs(1)).unwrap();
        let via_gateway = TcpReachability::new("127.0.0.1", gateway_port, Duration::from_secs(1));

        assert!(!via_backend.is_reachable().await);
        assert!(via_gateway.is_reachable().await);
    }

    #[test]
    fn url_without_port_uses_scheme_default() {
        let url = Url::parse("https://recipes.example.com/api").unwrap();
        let probe = TcpReachability::for_url(&url, Duration::from_millis(10)).unwrap();
        assert_eq!(probe.port, 443);
        assert_eq!(probe.host, "recipes.example.com");
    }

    #[tokio::test]
    async fn fixed_probe_answers_as_configured() {
        assert!(FixedReachability(true).is_reachable().await);
        assert!(!FixedReachability(false).is_reachable().await);
    }
}
