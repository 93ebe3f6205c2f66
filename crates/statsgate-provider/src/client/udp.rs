use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use statsgate_core::config::StatsdSettings;
use statsgate_core::error::{Result, StatsGateError};

use super::line::{pack, LineClient, Sink};

pub type UdpStatsClient = LineClient<UdpSink>;

/// Connectionless sink; the target address is resolved once at construction.
pub struct UdpSink {
    socket: UdpSocket,
    target: SocketAddr,
    max_datagram: usize,
}

impl UdpSink {
    pub fn connect(settings: &StatsdSettings) -> Result<Self> {
        let target = resolve(&settings.host, settings.port, settings.ipv6)?;
        let bind: SocketAddr = if target.is_ipv6() {
            SocketAddr::from(([0u16; 8], 0))
        } else {
            SocketAddr::from(([0u8; 4], 0))
        };
        let socket = UdpSocket::bind(bind)
            .map_err(|e| StatsGateError::ClientConstruction(format!("udp bind failed: {e}")))?;
        Ok(Self {
            socket,
            target,
            max_datagram: settings.maxudpsize,
        })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl Sink for UdpSink {
    fn send(&self, payload: &str) {
        for datagram in pack(payload, self.max_datagram) {
            if let Err(e) = self.socket.send_to(datagram.as_bytes(), self.target) {
                tracing::debug!(target_addr = %self.target, error = %e, "statsd datagram dropped");
            }
        }
    }
}

impl UdpStatsClient {
    pub fn connect(settings: &StatsdSettings) -> Result<Self> {
        Ok(LineClient::new(settings.prefix.clone(), UdpSink::connect(settings)?))
    }
}

pub(crate) fn resolve(host: &str, port: u16, ipv6: bool) -> Result<SocketAddr> {
    let addrs = (host, port)
        .to_socket_addrs()
        .map_err(|e| StatsGateError::ClientConstruction(format!("resolve {host}:{port} failed: {e}")))?;
    addrs
        .into_iter()
        .find(|a| a.is_ipv6() == ipv6)
        .ok_or_else(|| {
            let family = if ipv6 { "ipv6" } else { "ipv4" };
            StatsGateError::ClientConstruction(format!("no {family} address for {host}:{port}"))
        })
}
