use super::forwarding::{MessageBuilder, QueryFlags, ResponseParser};
use super::transport::{create_transport, TransportKind};
use async_trait::async_trait;
use compactdenial_application::ports::{DnsQuerier, QueryResponse};
use compactdenial_domain::{DnsQuery, DomainError, QueryConfig};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

/// Upper bound for a single resolver before the next one is tried.
const RESOLVER_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(2);

/// `DnsQuerier` speaking the DNS wire protocol over UDP, with TCP when the
/// UDP answer comes back truncated.
#[derive(Debug, Default)]
pub struct WireDnsQuerier;

impl WireDnsQuerier {
    pub fn new() -> Self {
        Self
    }

    /// One query against one server: UDP first, TCP if TC=1.
    async fn exchange(
        &self,
        query: &DnsQuery,
        server: SocketAddr,
        flags: &QueryFlags,
        deadline: Instant,
    ) -> Result<QueryResponse, DomainError> {
        let (id, bytes) = MessageBuilder::build_query(query, flags)?;

        debug!(
            name = %query.name,
            record_type = %query.record_type,
            server = %server,
            id = id,
            recursion_desired = flags.recursion_desired,
            compact_ok = flags.compact_ok,
            "Sending query"
        );

        let udp = create_transport(TransportKind::Udp, server);
        let response = udp.send(&bytes, remaining(deadline)).await?;
        let message = ResponseParser::parse(&response.bytes)?;

        if !message.truncated {
            return Ok(QueryResponse {
                message,
                wire: response.bytes.into(),
                server,
                protocol_used: response.protocol_used,
            });
        }

        debug!(server = %server, "Truncated UDP response, retrying over TCP");

        let tcp = create_transport(TransportKind::Tcp, server);
        let response = tcp.send(&bytes, remaining(deadline)).await?;
        let message = ResponseParser::parse(&response.bytes)?;

        Ok(QueryResponse {
            message,
            wire: response.bytes.into(),
            server,
            protocol_used: response.protocol_used,
        })
    }

    /// Rounds over the resolvers until one answers or the deadline passes.
    /// Resolvers that time out stay in the rotation; ones that fail outright
    /// are dropped.
    async fn try_resolvers(
        &self,
        query: &DnsQuery,
        servers: &[SocketAddr],
        flags: &QueryFlags,
        deadline: Instant,
    ) -> Result<QueryResponse, DomainError> {
        let mut pending = servers.to_vec();
        let mut failures = Vec::with_capacity(servers.len());

        while !pending.is_empty() {
            let mut still_pending = Vec::with_capacity(pending.len());

            for server in pending {
                if Instant::now() >= deadline {
                    return Err(DomainError::QueryTimeout);
                }
                let attempt_deadline = deadline.min(Instant::now() + RESOLVER_ATTEMPT_TIMEOUT);

                match self.exchange(query, server, flags, attempt_deadline).await {
                    Ok(response) if response.message.rcode.is_server_error() => {
                        warn!(
                            server = %server,
                            rcode = %response.message.rcode,
                            "Resolver failed, dropping it"
                        );
                        failures.push(format!("{} answered {}", server, response.message.rcode));
                    }
                    Ok(response) => return Ok(response),
                    Err(e @ DomainError::TransportTimeout { .. }) => {
                        debug!(server = %server, error = %e, "Resolver timed out, will retry");
                        still_pending.push(server);
                    }
                    Err(e) if e.is_transport_error() => {
                        warn!(server = %server, error = %e, "Resolver unreachable, dropping it");
                        failures.push(format!("{}: {}", server, e));
                    }
                    Err(e) => return Err(e),
                }
            }

            pending = still_pending;
        }

        Err(DomainError::NoNameservers(failures.join("; ")))
    }
}

#[async_trait]
impl DnsQuerier for WireDnsQuerier {
    async fn resolve_via_recursive(
        &self,
        query: &DnsQuery,
        config: &QueryConfig,
    ) -> Result<QueryResponse, DomainError> {
        let servers = config.resolver_addrs().map_err(DomainError::ConfigError)?;
        let flags = QueryFlags::recursive(config);
        let deadline = deadline_after(config.timeout())?;

        timeout_at(deadline, self.try_resolvers(query, &servers, &flags, deadline))
            .await
            .map_err(|_| DomainError::QueryTimeout)?
    }

    async fn resolve_via_server(
        &self,
        query: &DnsQuery,
        server: SocketAddr,
        config: &QueryConfig,
    ) -> Result<QueryResponse, DomainError> {
        let flags = QueryFlags::direct(config);
        let deadline = deadline_after(config.timeout())?;

        let result = timeout_at(deadline, self.exchange(query, server, &flags, deadline))
            .await
            .map_err(|_| DomainError::QueryTimeout)?;

        match result {
            Err(DomainError::TransportTimeout { .. }) => Err(DomainError::QueryTimeout),
            other => other,
        }
    }
}

fn deadline_after(timeout: Duration) -> Result<Instant, DomainError> {
    Instant::now().checked_add(timeout).ok_or_else(|| {
        DomainError::ConfigError(format!("Query timeout {:?} is out of range", timeout))
    })
}

fn remaining(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now())
}
