pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use ferrous_lookup_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;

/// Result of a raw DNS transport operation
#[derive(Debug)]
pub struct TransportResponse {
    /// Raw DNS response bytes (wire format)
    pub bytes: Vec<u8>,
    /// Which protocol was used
    pub protocol_used: &'static str,
}

/// Trait for sending raw DNS messages over the wire
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;
}

/// Enum-dispatched transport, one per upstream server and protocol.
pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
}

impl Transport {
    pub fn udp(addr: SocketAddr) -> Self {
        Self::Udp(udp::UdpTransport::new(addr))
    }

    pub fn tcp(addr: SocketAddr) -> Self {
        Self::Tcp(tcp::TcpTransport::new(addr))
    }

    pub async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tcp(t) => DnsTransport::send(t, message_bytes, timeout).await,
        }
    }

    /// Protocol name for logging.
    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(t) => t.protocol_name(),
            Self::Tcp(t) => t.protocol_name(),
        }
    }
}

fn timeout_error(action: &str, protocol: &str, server: SocketAddr) -> DomainError {
    DomainError::QueryTimeout(format!("Timeout {} {} {}", action, protocol, server))
}

fn io_error(action: &str, protocol: &str, server: SocketAddr, e: std::io::Error) -> DomainError {
    DomainError::Transport(format!("Failed to {} {} {}: {}", action, protocol, server, e))
}
