use compactdenial_application::use_cases::{InspectNsecBitmapsUseCase, ResolveRcodeUseCase};
use compactdenial_domain::Config;
use compactdenial_infrastructure::dns::WireDnsQuerier;
use std::sync::Arc;

pub struct UseCases {
    pub resolve_rcode: Arc<ResolveRcodeUseCase>,
    pub inspect_bitmaps: Arc<InspectNsecBitmapsUseCase>,
}

impl UseCases {
    pub fn new(config: &Config) -> Self {
        let querier = Arc::new(WireDnsQuerier::new());

        Self {
            resolve_rcode: Arc::new(ResolveRcodeUseCase::new(querier, config.query.clone())),
            inspect_bitmaps: Arc::new(InspectNsecBitmapsUseCase::new()),
        }
    }
}
