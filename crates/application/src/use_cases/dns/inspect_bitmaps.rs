use compactdenial_domain::{
    decode_type_bitmap, window_diagnostics, DnsResponseMessage, DomainError, DomainName, TypeSet,
    WindowDiagnostic,
};

/// Decoded view of one NSEC record found in the authority section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsecInspection {
    pub owner: DomainName,
    pub next_domain: DomainName,
    pub windows: Vec<WindowDiagnostic>,
    pub types: TypeSet,
}

/// Lists the NSEC type bitmaps of a response for human inspection.
#[derive(Debug, Default)]
pub struct InspectNsecBitmapsUseCase;

impl InspectNsecBitmapsUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(
        &self,
        message: &DnsResponseMessage,
    ) -> Result<Vec<NsecInspection>, DomainError> {
        message
            .authority_nsec()
            .map(|(owner, nsec)| {
                Ok(NsecInspection {
                    owner: owner.clone(),
                    next_domain: nsec.next_domain.clone(),
                    windows: window_diagnostics(&nsec.windows)?,
                    types: decode_type_bitmap(&nsec.windows)?,
                })
            })
            .collect()
    }
}
