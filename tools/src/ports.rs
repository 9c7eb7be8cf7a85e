use std::net::{Ipv4Addr, SocketAddr};
use std::ops::RangeInclusive;
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream;
use tokio::net::TcpStream;
use tokio::time;

use crate::{PortProbe, ProbeFut};

const MAX_IN_FLIGHT: usize = 64;

/// Connect-scan of `127.0.0.1`. A port counts as open when a TCP connection
/// completes within the per-port timeout.
#[derive(Debug, Clone)]
pub struct TcpPortProbe {
    per_port_timeout: Duration,
}

impl TcpPortProbe {
    #[must_use]
    pub fn new(per_port_timeout: Duration) -> Self {
        Self { per_port_timeout }
    }

    async fn scan(&self, ports: RangeInclusive<u16>) -> Vec<u16> {
        let timeout = self.per_port_timeout;
        let mut open: Vec<u16> = stream::iter(ports)
            .map(|port| async move { is_open(port, timeout).await.then_some(port) })
            .buffer_unordered(MAX_IN_FLIGHT)
            .filter_map(|port| async move { port })
            .collect()
            .await;
        open.sort_unstable();
        tracing::debug!(count = open.len(), "Port scan finished");
        open
    }
}

impl PortProbe for TcpPortProbe {
    fn open_ports(&self, ports: RangeInclusive<u16>) -> ProbeFut<'_> {
        Box::pin(self.scan(ports))
    }
}

async fn is_open(port: u16, timeout: Duration) -> bool {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    matches!(
        time::timeout(timeout, TcpStream::connect(addr)).await,
        Ok(Ok(_))
    )
}
