use super::{DomainError, DomainName, RecordType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub name: DomainName,
    pub record_type: RecordType,
}

impl DnsQuery {
    pub fn new(name: DomainName, record_type: RecordType) -> Self {
        Self { name, record_type }
    }

    /// Build a query from presentation-format name and type mnemonic.
    pub fn parse(name: &str, record_type: &str) -> Result<Self, DomainError> {
        let name = DomainName::parse(name)?;
        let record_type = record_type
            .parse::<RecordType>()
            .map_err(DomainError::InvalidRecordType)?;
        Ok(Self::new(name, record_type))
    }
}
