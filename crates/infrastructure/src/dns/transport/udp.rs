//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is (no framing). A response with the TC bit set is
//! handed back unchanged; the caller decides whether to retry over TCP.

use super::{io_error, message_id, timeout_error, DnsTransport, TransportResponse};
use async_trait::async_trait;
use compactdenial_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

/// Largest datagram we accept; the advertised EDNS payload may be anything up to this.
const MAX_UDP_RESPONSE_SIZE: usize = 65535;

pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn bind_addr(&self) -> SocketAddr {
        if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let expected_id = message_id(message_bytes).ok_or_else(|| {
            DomainError::InvalidDnsResponse("Query shorter than a DNS header".to_string())
        })?;
        let deadline = Instant::now() + timeout;

        let socket = UdpSocket::bind(self.bind_addr())
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind UDP socket: {}", e)))?;

        let bytes_sent = timeout_at(deadline, socket.send_to(message_bytes, self.server_addr))
            .await
            .map_err(|_| timeout_error(self.server_addr))?
            .map_err(|e| io_error(self.server_addr, "send UDP query to", e))?;

        debug!(
            server = %self.server_addr,
            bytes_sent = bytes_sent,
            "UDP query sent"
        );

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

        // Stray datagrams are dropped and the wait continues until the deadline.
        loop {
            let (bytes_received, from_addr) =
                timeout_at(deadline, socket.recv_from(&mut recv_buf))
                    .await
                    .map_err(|_| timeout_error(self.server_addr))?
                    .map_err(|e| io_error(self.server_addr, "receive UDP response from", e))?;

            if from_addr != self.server_addr {
                warn!(
                    expected = %self.server_addr,
                    received_from = %from_addr,
                    "UDP response from unexpected source, ignoring"
                );
                continue;
            }

            if message_id(&recv_buf[..bytes_received]) != Some(expected_id) {
                warn!(
                    server = %self.server_addr,
                    expected_id = expected_id,
                    "UDP response with mismatched id, ignoring"
                );
                continue;
            }

            recv_buf.truncate(bytes_received);

            debug!(
                server = %self.server_addr,
                bytes_received = bytes_received,
                "UDP response received"
            );

            return Ok(TransportResponse {
                bytes: recv_buf,
                protocol_used: "UDP",
            });
        }
    }
}
