use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use osprobe_common::config::ScanConfig;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Cheap yes/no check run before committing to a full session.
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// Every failure (refused, timed out, no route) collapses to `false`.
    async fn is_reachable(&self, addr: Ipv4Addr) -> bool;
}

/// Plain TCP connect against the session port.
#[derive(Debug, Clone, Copy)]
pub struct TcpReachability {
    port: u16,
    probe_timeout: Duration,
}

impl TcpReachability {
    pub fn new(port: u16, probe_timeout: Duration) -> Self {
        Self { port, probe_timeout }
    }

    pub fn from_config(cfg: &ScanConfig) -> Self {
        Self::new(cfg.credentials.port, cfg.reachability_timeout)
    }
}

#[async_trait]
impl ReachabilityProbe for TcpReachability {
    async fn is_reachable(&self, addr: Ipv4Addr) -> bool {
        let socket_addr: SocketAddr = SocketAddr::new(IpAddr::V4(addr), self.port);

        match timeout(self.probe_timeout, TcpStream::connect(socket_addr)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                true
            }
            Ok(Err(_)) | Err(_) => false,
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
