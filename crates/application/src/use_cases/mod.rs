pub mod dns;

// Re-export use cases
pub use dns::{
    InspectNsecBitmapsUseCase, NsecInspection, QueryTarget, RcodeOutcome, ResolveRcodeUseCase,
};
