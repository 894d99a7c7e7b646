use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid record type: {0}")]
    InvalidRecordType(String),

    #[error("Invalid NSEC type bitmap: {0}")]
    InvalidBitmap(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("I/O error: {0}")]
    IoError(String),

    /// Non-existence reported as an error instead of a message carrying NXDOMAIN.
    #[error("Domain not found (NXDOMAIN)")]
    NxDomain,

    #[error("Query timeout")]
    QueryTimeout,

    #[error("No nameservers answered: {0}")]
    NoNameservers(String),

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// Failures after which the next configured resolver is worth trying.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            DomainError::IoError(_)
                | DomainError::InvalidDnsResponse(_)
                | DomainError::TransportTimeout { .. }
                | DomainError::TransportConnectionRefused { .. }
        )
    }
}
