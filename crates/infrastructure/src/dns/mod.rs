pub mod forwarding;
pub mod querier;
pub mod transport;

pub use forwarding::{MessageBuilder, QueryFlags, RecordTypeMapper, ResponseParser};
pub use querier::WireDnsQuerier;
pub use transport::{create_transport, DnsTransport, Transport, TransportKind, TransportResponse};
