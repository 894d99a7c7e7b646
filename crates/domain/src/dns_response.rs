use crate::type_bitmap::TypeBitmapWindow;
use crate::{DomainName, RecordType, ResponseCode};

/// Body of a record in the authority section. Only NSEC is decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    Nsec(NsecData),
    Opaque,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsecData {
    pub next_domain: DomainName,
    pub windows: Vec<TypeBitmapWindow>,
}

impl NsecData {
    pub fn new(next_domain: DomainName, windows: Vec<TypeBitmapWindow>) -> Self {
        Self {
            next_domain,
            windows,
        }
    }
}

/// Records sharing owner and type, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    pub owner: DomainName,
    pub record_type: RecordType,
    pub records: Vec<RecordData>,
}

impl RecordSet {
    pub fn new(owner: DomainName, record_type: RecordType) -> Self {
        Self {
            owner,
            record_type,
            records: vec![],
        }
    }

    pub fn with_record(mut self, record: RecordData) -> Self {
        self.records.push(record);
        self
    }

    pub fn nsec_records(&self) -> impl Iterator<Item = &NsecData> {
        self.records.iter().filter_map(|record| match record {
            RecordData::Nsec(nsec) => Some(nsec),
            RecordData::Opaque => None,
        })
    }

    /// Group individual records into sets keyed by (owner, type).
    pub fn group(records: impl IntoIterator<Item = (DomainName, RecordType, RecordData)>) -> Vec<Self> {
        let mut sets: Vec<RecordSet> = Vec::new();
        for (owner, record_type, data) in records {
            match sets
                .iter_mut()
                .find(|set| set.owner == owner && set.record_type == record_type)
            {
                Some(set) => set.records.push(data),
                None => sets.push(RecordSet::new(owner, record_type).with_record(data)),
            }
        }
        sets
    }
}

/// The parts of a DNS response that denial classification reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsResponseMessage {
    pub id: u16,
    pub rcode: ResponseCode,
    /// AD header bit, set by a validating resolver.
    pub authenticated: bool,
    pub truncated: bool,
    pub answer_count: usize,
    pub authority: Vec<RecordSet>,
}

impl DnsResponseMessage {
    pub fn new(rcode: ResponseCode) -> Self {
        Self {
            id: 0,
            rcode,
            authenticated: false,
            truncated: false,
            answer_count: 0,
            authority: vec![],
        }
    }

    pub fn authenticated(mut self, authenticated: bool) -> Self {
        self.authenticated = authenticated;
        self
    }

    pub fn with_answers(mut self, answer_count: usize) -> Self {
        self.answer_count = answer_count;
        self
    }

    pub fn with_authority(mut self, set: RecordSet) -> Self {
        self.authority.push(set);
        self
    }

    pub fn has_answers(&self) -> bool {
        self.answer_count > 0
    }

    pub fn is_nodata(&self) -> bool {
        self.rcode == ResponseCode::NoError && !self.has_answers()
    }

    /// Every NSEC record in the authority section with its owner name.
    pub fn authority_nsec(&self) -> impl Iterator<Item = (&DomainName, &NsecData)> {
        self.authority
            .iter()
            .filter(|set| set.record_type == RecordType::NSEC)
            .flat_map(|set| set.nsec_records().map(move |nsec| (&set.owner, nsec)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> DomainName {
        DomainName::parse(s).unwrap()
    }

    #[test]
    fn test_group_merges_same_owner_and_type() {
        let sets = RecordSet::group(vec![
            (name("a.test"), RecordType::NSEC, RecordData::Opaque),
            (name("test"), RecordType::SOA, RecordData::Opaque),
            (name("A.test."), RecordType::NSEC, RecordData::Opaque),
        ]);

        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].owner, name("a.test"));
        assert_eq!(sets[0].records.len(), 2);
        assert_eq!(sets[1].record_type, RecordType::SOA);
    }

    #[test]
    fn test_is_nodata() {
        assert!(DnsResponseMessage::new(ResponseCode::NoError).is_nodata());
        assert!(!DnsResponseMessage::new(ResponseCode::NoError)
            .with_answers(1)
            .is_nodata());
        assert!(!DnsResponseMessage::new(ResponseCode::NXDomain).is_nodata());
    }
}
