use crate::ports::{DnsQuerier, QueryResponse};
use compactdenial_domain::{classify, DnsQuery, DomainError, QueryConfig, ResponseCode};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTarget {
    /// The configured recursive resolvers.
    Recursive,
    /// One server queried directly, without recursion.
    Server(SocketAddr),
}

#[derive(Debug, Clone)]
pub struct RcodeOutcome {
    /// Effective code after compact denial detection.
    pub rcode: ResponseCode,
    /// `None` when the query layer reported NXDOMAIN as an error.
    pub response: Option<QueryResponse>,
}

impl RcodeOutcome {
    pub fn original_rcode(&self) -> ResponseCode {
        self.response
            .as_ref()
            .map(|response| response.message.rcode)
            .unwrap_or(self.rcode)
    }

    /// True when a NOERROR response was reclassified as NXDOMAIN.
    pub fn is_compact_denial(&self) -> bool {
        self.rcode != self.original_rcode()
    }
}

/// Resolve a name and report its effective response code.
pub struct ResolveRcodeUseCase {
    querier: Arc<dyn DnsQuerier>,
    config: QueryConfig,
}

impl ResolveRcodeUseCase {
    pub fn new(querier: Arc<dyn DnsQuerier>, config: QueryConfig) -> Self {
        if !config.require_authenticated {
            warn!(
                "Compact denial accepted without AD=1; unauthenticated responses can be forged"
            );
        }
        Self { querier, config }
    }

    pub async fn execute(
        &self,
        query: &DnsQuery,
        target: QueryTarget,
    ) -> Result<RcodeOutcome, DomainError> {
        let start = Instant::now();

        let result = match target {
            QueryTarget::Recursive => {
                self.querier
                    .resolve_via_recursive(query, &self.config)
                    .await
            }
            QueryTarget::Server(server) => {
                self.querier
                    .resolve_via_server(query, server, &self.config)
                    .await
            }
        };

        let response = match result {
            Ok(response) => response,
            Err(DomainError::NxDomain) => {
                debug!(
                    name = %query.name,
                    record_type = %query.record_type,
                    "Query layer signalled NXDOMAIN without a message"
                );
                return Ok(RcodeOutcome {
                    rcode: ResponseCode::NXDomain,
                    response: None,
                });
            }
            Err(e) => {
                warn!(
                    name = %query.name,
                    record_type = %query.record_type,
                    error = %e,
                    "Query failed"
                );
                return Err(e);
            }
        };

        let rcode = classify(
            &response.message,
            &query.name,
            self.config.require_authenticated,
        );

        if rcode != response.message.rcode {
            info!(
                name = %query.name,
                server = %response.server,
                "Compact denial NOERROR reclassified as NXDOMAIN"
            );
        }

        debug!(
            name = %query.name,
            record_type = %query.record_type,
            server = %response.server,
            protocol = response.protocol_used,
            original = %response.message.rcode,
            effective = %rcode,
            authenticated = response.message.authenticated,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Response classified"
        );

        Ok(RcodeOutcome {
            rcode,
            response: Some(response),
        })
    }
}
