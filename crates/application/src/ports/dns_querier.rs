use async_trait::async_trait;
use compactdenial_domain::{DnsQuery, DnsResponseMessage, DomainError, QueryConfig};
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct QueryResponse {
    pub message: DnsResponseMessage,
    /// Response exactly as received, for full-message output.
    pub wire: Arc<[u8]>,
    pub server: SocketAddr,
    pub protocol_used: &'static str,
}

/// Query layer: sends one question and hands back the parsed response.
///
/// Implementations may report non-existence either as a message with
/// NXDOMAIN or as `DomainError::NxDomain`; callers treat both alike.
#[async_trait]
pub trait DnsQuerier: Send + Sync {
    /// Ask the configured recursive resolvers (RD=1, AD=1, DO=1).
    async fn resolve_via_recursive(
        &self,
        query: &DnsQuery,
        config: &QueryConfig,
    ) -> Result<QueryResponse, DomainError>;

    /// Ask `server` directly (RD=0, DO=1), UDP with TCP fallback on truncation.
    async fn resolve_via_server(
        &self,
        query: &DnsQuery,
        server: SocketAddr,
        config: &QueryConfig,
    ) -> Result<QueryResponse, DomainError>;
}
