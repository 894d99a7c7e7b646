use super::{io_error, message_id, timeout_error, DnsTransport, TransportResponse};
use async_trait::async_trait;
use compactdenial_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout_at, Instant};
use tracing::debug;

const MAX_TCP_MESSAGE_SIZE: usize = 65535;

/// DNS over TCP (RFC 1035 §4.2.2), one connection per query.
pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    async fn connect(&self, deadline: Instant) -> Result<TcpStream, DomainError> {
        let stream = timeout_at(deadline, TcpStream::connect(self.server_addr))
            .await
            .map_err(|_| timeout_error(self.server_addr))?
            .map_err(|e| io_error(self.server_addr, "connect to TCP server", e))?;

        stream
            .set_nodelay(true)
            .map_err(|e| io_error(self.server_addr, "set TCP_NODELAY on", e))?;

        Ok(stream)
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let deadline = Instant::now() + timeout;
        let mut stream = self.connect(deadline).await?;

        timeout_at(deadline, send_with_length_prefix(&mut stream, message_bytes))
            .await
            .map_err(|_| timeout_error(self.server_addr))??;

        debug!(
            server = %self.server_addr,
            message_len = message_bytes.len(),
            "TCP query sent"
        );

        let response_bytes = timeout_at(deadline, read_with_length_prefix(&mut stream))
            .await
            .map_err(|_| timeout_error(self.server_addr))??;

        if message_id(&response_bytes) != message_id(message_bytes) {
            return Err(DomainError::InvalidDnsResponse(format!(
                "TCP response from {} does not match the query id",
                self.server_addr
            )));
        }

        debug!(
            server = %self.server_addr,
            response_len = response_bytes.len(),
            "TCP response received"
        );

        Ok(TransportResponse {
            bytes: response_bytes,
            protocol_used: "TCP",
        })
    }
}

pub(crate) async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
) -> Result<(), DomainError>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len()).map_err(|_| {
        DomainError::IoError(format!(
            "DNS message of {} bytes does not fit a TCP length prefix",
            message_bytes.len()
        ))
    })?;

    stream
        .write_all(&length.to_be_bytes())
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to write length prefix: {}", e)))?;
    stream
        .write_all(message_bytes)
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to write DNS message: {}", e)))?;
    stream
        .flush()
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to flush stream: {}", e)))?;

    Ok(())
}

pub(crate) async fn read_with_length_prefix<S>(stream: &mut S) -> Result<Vec<u8>, DomainError>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream
        .read_exact(&mut len_buf)
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to read response length: {}", e)))?;

    let response_len = u16::from_be_bytes(len_buf) as usize;

    if response_len > MAX_TCP_MESSAGE_SIZE {
        return Err(DomainError::IoError(format!(
            "Response too large: {} bytes (max {})",
            response_len, MAX_TCP_MESSAGE_SIZE
        )));
    }

    let mut response = vec![0u8; response_len];
    stream
        .read_exact(&mut response)
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to read response body: {}", e)))?;

    Ok(response)
}
