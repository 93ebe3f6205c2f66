use std::io::Write;
use std::net::TcpStream;
use std::sync::Mutex;
use std::time::Duration;

use statsgate_core::config::StatsdSettings;

use super::line::{LineClient, Sink};
use super::udp::resolve;

pub type TcpStatsClient = LineClient<TcpSink>;

/// Stream sink. Connects on first send and again after any write failure.
pub struct TcpSink {
    host: String,
    port: u16,
    ipv6: bool,
    timeout: Option<Duration>,
    stream: Mutex<Option<TcpStream>>,
}

impl TcpSink {
    pub fn new(settings: &StatsdSettings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
            ipv6: settings.ipv6,
            timeout: settings.timeout_duration(),
            stream: Mutex::new(None),
        }
    }

    fn open(&self) -> Option<TcpStream> {
        let addr = match resolve(&self.host, self.port, self.ipv6) {
            Ok(a) => a,
            Err(e) => {
                tracing::debug!(error = %e, "statsd tcp resolve failed");
                return None;
            }
        };
        let stream = match self.timeout {
            Some(t) => TcpStream::connect_timeout(&addr, t),
            None => TcpStream::connect(addr),
        };
        match stream {
            Ok(s) => {
                if let Err(e) = s.set_write_timeout(self.timeout) {
                    tracing::debug!(error = %e, "statsd tcp write timeout not applied");
                }
                Some(s)
            }
            Err(e) => {
                tracing::debug!(%addr, error = %e, "statsd tcp connect failed");
                None
            }
        }
    }
}

impl Sink for TcpSink {
    fn send(&self, payload: &str) {
        let mut guard = match self.stream.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.is_none() {
            *guard = self.open();
        }
        let Some(stream) = guard.as_mut() else {
            return;
        };

        let mut data = String::with_capacity(payload.len() + 1);
        data.push_str(payload);
        data.push('\n');
        if let Err(e) = stream.write_all(data.as_bytes()) {
            tracing::debug!(error = %e, "statsd tcp write failed, reconnecting on next send");
            *guard = None;
        }
    }
}

impl TcpStatsClient {
    /// Never fails; the connection is opened on first send.
    pub fn connect(settings: &StatsdSettings) -> Self {
        LineClient::new(settings.prefix.clone(), TcpSink::new(settings))
    }
}
