//! Compact Denial of Existence detection
//!
//! A validating resolver may answer a name that does not exist with
//! NOERROR, an empty answer section and a synthesized NSEC record owned by
//! the query name whose type bitmap carries the NXNAME sentinel type
//! (draft-ietf-dnsop-compact-denial-of-existence). This module turns such a
//! response back into NXDOMAIN.

use crate::type_bitmap::decode_type_bitmap;
use crate::{DnsResponseMessage, DomainName, RecordType, ResponseCode};

/// NXNAME pseudo type code point. Provisional until IANA assigns the final
/// value; everything else refers to this constant.
pub const NXNAME_TYPE: u16 = 65283;

/// Compact Answers OK flag in the EDNS extended flags field.
pub const EDNS_FLAG_CO: u16 = 0x4000;

/// Does the response carry the Authenticated Data (AD) flag?
pub fn is_authenticated(response: &DnsResponseMessage) -> bool {
    response.authenticated
}

/// Effective response code for `response` to a query for `query_name`.
///
/// Returns NXDOMAIN when the response is a compact denial in disguise and
/// the response's own code otherwise. Only the presence of NXNAME is
/// checked; NSEC and RRSIG are expected alongside it but not verified.
///
/// With `require_authenticated` the AD flag must be set before a synthesized
/// NSEC is believed. Passing `false` trusts responses an on-path attacker
/// could have forged and is only kept for comparison with resolvers that
/// strip AD.
pub fn classify(
    response: &DnsResponseMessage,
    query_name: &DomainName,
    require_authenticated: bool,
) -> ResponseCode {
    if require_authenticated && !is_authenticated(response) {
        return response.rcode;
    }
    if response.rcode != ResponseCode::NoError || response.has_answers() {
        return response.rcode;
    }

    for set in &response.authority {
        if &set.owner != query_name {
            continue;
        }
        if set.record_type != RecordType::NSEC {
            continue;
        }

        // A set normally holds one NSEC; the first body decides either way.
        if let Some(nsec) = set.nsec_records().next() {
            let has_nxname = decode_type_bitmap(&nsec.windows)
                .map(|types| types.contains(NXNAME_TYPE))
                .unwrap_or(false);
            if has_nxname {
                return ResponseCode::NXDomain;
            }
            return response.rcode;
        }
    }

    response.rcode
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns_response::{NsecData, RecordData, RecordSet};
    use crate::type_bitmap::TypeBitmapWindow;

    fn name(s: &str) -> DomainName {
        DomainName::parse(s).unwrap()
    }

    fn nsec_set(owner: &str, types: &[u16]) -> RecordSet {
        let next = name(&format!("\\000.{}", owner));
        RecordSet::new(name(owner), RecordType::NSEC).with_record(RecordData::Nsec(NsecData::new(
            next,
            TypeBitmapWindow::from_types(types.iter().copied()),
        )))
    }

    #[test]
    fn test_nxname_constant_maps_to_record_type() {
        assert_eq!(RecordType::NXNAME.to_u16(), NXNAME_TYPE);
        assert_eq!(RecordType::from_u16(NXNAME_TYPE), RecordType::NXNAME);
    }

    #[test]
    fn test_undecodable_bitmap_is_treated_as_nodata() {
        let qname = name("broken.example.test");
        let bad = RecordSet::new(qname.clone(), RecordType::NSEC).with_record(RecordData::Nsec(
            NsecData {
                next_domain: qname.clone(),
                windows: vec![TypeBitmapWindow {
                    window: 255,
                    bitmap: vec![0x10; 40],
                }],
            },
        ));
        let response = DnsResponseMessage::new(ResponseCode::NoError)
            .authenticated(true)
            .with_authority(bad);

        assert_eq!(classify(&response, &qname, true), ResponseCode::NoError);
    }

    #[test]
    fn test_opaque_nsec_body_is_skipped() {
        let qname = name("odd.example.test");
        let opaque = RecordSet::new(qname.clone(), RecordType::NSEC).with_record(RecordData::Opaque);
        let response = DnsResponseMessage::new(ResponseCode::NoError)
            .authenticated(true)
            .with_authority(opaque)
            .with_authority(nsec_set("odd.example.test", &[46, 47, NXNAME_TYPE]));

        assert_eq!(classify(&response, &qname, true), ResponseCode::NXDomain);
    }
}
