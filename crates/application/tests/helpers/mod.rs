mod mock_querier;

pub use mock_querier::*;
