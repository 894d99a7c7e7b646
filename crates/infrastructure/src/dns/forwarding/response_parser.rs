use super::record_type_map::RecordTypeMapper;
use compactdenial_domain::{
    DnsResponseMessage, DomainError, DomainName, NsecData, RecordData, RecordSet, RecordType,
    ResponseCode, TypeBitmapWindow,
};
use hickory_proto::op::Message;
use hickory_proto::rr::{Name, Record};
use hickory_proto::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};
use tracing::debug;

const HEADER_LEN: usize = 12;
const FLAG_AD: u8 = 0x20;

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<DnsResponseMessage, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        let rcode = ResponseCode::from_u16(u16::from(message.response_code()));
        let truncated = message.truncated();
        let authenticated = Self::authentic_data(response_bytes);

        let authority = RecordSet::group(
            message
                .name_servers()
                .iter()
                .filter_map(Self::authority_record),
        );

        debug!(
            id = message.id(),
            rcode = %rcode,
            authenticated = authenticated,
            truncated = truncated,
            answers = message.answers().len(),
            authority = authority.len(),
            "DNS response parsed"
        );

        let mut parsed = DnsResponseMessage::new(rcode)
            .authenticated(authenticated)
            .with_answers(message.answers().len());
        parsed.id = message.id();
        parsed.truncated = truncated;
        parsed.authority = authority;
        Ok(parsed)
    }

    /// Full message in hickory's presentation form.
    pub fn render(response_bytes: &[u8]) -> Result<String, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;
        Ok(message.to_string())
    }

    // AD is read from the raw header; from_vec has already checked its length.
    fn authentic_data(response_bytes: &[u8]) -> bool {
        response_bytes.len() >= HEADER_LEN && response_bytes[3] & FLAG_AD != 0
    }

    /// Records whose owner cannot be represented are left out; an NSEC body
    /// that cannot be decoded is kept as opaque data.
    fn authority_record(record: &Record) -> Option<(DomainName, RecordType, RecordData)> {
        let owner = match Self::domain_name(record.name()) {
            Ok(owner) => owner,
            Err(e) => {
                debug!(error = %e, "Skipping authority record with unusable owner");
                return None;
            }
        };
        let record_type = RecordTypeMapper::from_hickory(record.record_type());

        let data = if record_type == RecordType::NSEC {
            match Self::nsec_data(record) {
                Ok(nsec) => RecordData::Nsec(nsec),
                Err(e) => {
                    debug!(owner = %owner, error = %e, "Undecodable NSEC record");
                    RecordData::Opaque
                }
            }
        } else {
            RecordData::Opaque
        };

        Some((owner, record_type, data))
    }

    /// Re-encode the NSEC rdata, skip the next-domain name and hand the
    /// remaining type bitmap block to the window parser.
    fn nsec_data(record: &Record) -> Result<NsecData, DomainError> {
        let mut rdata = Vec::with_capacity(64);
        let mut encoder = BinEncoder::new(&mut rdata);
        record.data().emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to re-encode NSEC rdata: {}", e))
        })?;

        let mut decoder = BinDecoder::new(&rdata);
        let next = Name::read(&mut decoder).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Invalid NSEC next domain name: {}", e))
        })?;
        let bitmap_start = decoder.index();

        // An unparsable bitmap is kept as an empty one and signals no types.
        let windows = TypeBitmapWindow::parse_wire(&rdata[bitmap_start..]).unwrap_or_else(|e| {
            debug!(owner = %record.name(), error = %e, "Malformed NSEC type bitmap");
            Vec::new()
        });

        Ok(NsecData::new(Self::domain_name(&next)?, windows))
    }

    fn domain_name(name: &Name) -> Result<DomainName, DomainError> {
        DomainName::from_wire_labels(name.iter())
    }
}
