#![allow(dead_code)]
use compactdenial_domain::{
    DnsResponseMessage, DomainName, NsecData, RecordData, RecordSet, RecordType, ResponseCode,
    TypeBitmapWindow, NXNAME_TYPE,
};

pub const NSEC: u16 = 47;
pub const RRSIG: u16 = 46;

pub fn name(s: &str) -> DomainName {
    DomainName::parse(s).unwrap()
}

/// NSEC set as a compact-denial signer would synthesize it: next name is
/// `\000.<owner>`.
pub fn nsec_set(owner: &str, types: &[u16]) -> RecordSet {
    RecordSet::new(name(owner), RecordType::NSEC).with_record(nsec_record(owner, types))
}

pub fn nsec_record(owner: &str, types: &[u16]) -> RecordData {
    RecordData::Nsec(NsecData::new(
        name(&format!("\\000.{}", owner)),
        TypeBitmapWindow::from_types(types.iter().copied()),
    ))
}

pub struct ResponseBuilder {
    message: DnsResponseMessage,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self {
            message: DnsResponseMessage::new(ResponseCode::NoError),
        }
    }

    pub fn rcode(mut self, rcode: ResponseCode) -> Self {
        self.message.rcode = rcode;
        self
    }

    pub fn authenticated(mut self) -> Self {
        self.message.authenticated = true;
        self
    }

    pub fn answers(mut self, count: usize) -> Self {
        self.message.answer_count = count;
        self
    }

    pub fn soa(mut self, zone: &str) -> Self {
        self.message
            .authority
            .push(RecordSet::new(name(zone), RecordType::SOA).with_record(RecordData::Opaque));
        self
    }

    pub fn nsec(mut self, owner: &str, types: &[u16]) -> Self {
        self.message.authority.push(nsec_set(owner, types));
        self
    }

    pub fn compact_nxdomain(self, owner: &str) -> Self {
        self.nsec(owner, &[RRSIG, NSEC, NXNAME_TYPE])
    }

    pub fn build(self) -> DnsResponseMessage {
        self.message
    }
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
