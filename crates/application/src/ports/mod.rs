mod dns_querier;

pub use dns_querier::{DnsQuerier, QueryResponse};

// Re-export for convenience
pub use compactdenial_domain::{DnsQuery, QueryConfig};
