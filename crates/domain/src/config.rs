pub mod errors;
pub mod logging;
pub mod query;
pub mod root;

pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use query::{parse_server_addr, QueryConfig, DEFAULT_DNS_PORT, MAX_TIMEOUT_SECS};
pub use root::{CliOverrides, Config};
