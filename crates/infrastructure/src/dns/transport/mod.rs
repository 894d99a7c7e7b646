pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use compactdenial_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,

    pub protocol_used: &'static str,
}

#[async_trait]
pub trait DnsTransport: Send + Sync {
    /// Send one query and wait at most `timeout` for its response.
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Udp,
    Tcp,
}

pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
}

impl Transport {
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
}

pub fn create_transport(kind: TransportKind, server: SocketAddr) -> Transport {
    match kind {
        TransportKind::Udp => Transport::Udp(udp::UdpTransport::new(server)),
        TransportKind::Tcp => Transport::Tcp(tcp::TcpTransport::new(server)),
    }
}

/// Id of a wire-format message, `None` when the header is cut short.
pub(crate) fn message_id(bytes: &[u8]) -> Option<u16> {
    match bytes {
        [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
        _ => None,
    }
}

pub(crate) fn io_error(server: SocketAddr, action: &str, e: std::io::Error) -> DomainError {
    if e.kind() == std::io::ErrorKind::ConnectionRefused {
        DomainError::TransportConnectionRefused {
            server: server.to_string(),
        }
    } else {
        DomainError::IoError(format!("Failed to {} {}: {}", action, server, e))
    }
}

pub(crate) fn timeout_error(server: SocketAddr) -> DomainError {
    DomainError::TransportTimeout {
        server: server.to_string(),
    }
}
