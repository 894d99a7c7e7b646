mod inspect_bitmaps;
mod resolve_rcode;

pub use inspect_bitmaps::{InspectNsecBitmapsUseCase, NsecInspection};
pub use resolve_rcode::{QueryTarget, RcodeOutcome, ResolveRcodeUseCase};
