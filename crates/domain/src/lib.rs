//! compactdenial Domain Layer
pub mod compact_denial;
pub mod config;
pub mod dns_name;
pub mod dns_query;
pub mod dns_record;
pub mod dns_response;
pub mod errors;
pub mod rcode;
pub mod type_bitmap;

pub use compact_denial::{classify, is_authenticated, EDNS_FLAG_CO, NXNAME_TYPE};
pub use config::{CliOverrides, Config, ConfigError, LoggingConfig, QueryConfig};
pub use dns_name::DomainName;
pub use dns_query::DnsQuery;
pub use dns_record::RecordType;
pub use dns_response::{DnsResponseMessage, NsecData, RecordData, RecordSet};
pub use errors::DomainError;
pub use rcode::ResponseCode;
pub use type_bitmap::{
    decode_type_bitmap, window_diagnostics, TypeBitmapWindow, TypeSet, WindowDiagnostic,
};
