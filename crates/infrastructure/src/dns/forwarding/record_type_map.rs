use compactdenial_domain::RecordType;
use hickory_proto::rr::RecordType as HickoryRecordType;

/// Converts between our `RecordType` and hickory's by numeric code, so
/// private and provisional types such as NXNAME survive the round trip.
pub struct RecordTypeMapper;

impl RecordTypeMapper {
    pub fn to_hickory(record_type: &RecordType) -> HickoryRecordType {
        HickoryRecordType::from(record_type.to_u16())
    }

    pub fn from_hickory(record_type: HickoryRecordType) -> RecordType {
        RecordType::from_u16(u16::from(record_type))
    }
}
