mod helpers;

use compactdenial_application::use_cases::InspectNsecBitmapsUseCase;
use compactdenial_domain::{
    DnsResponseMessage, DomainError, DomainName, NsecData, RecordData, RecordSet, RecordType,
    ResponseCode, TypeBitmapWindow, NXNAME_TYPE,
};
use helpers::{compact_nxdomain, nsec_message};

#[test]
fn test_inspects_compact_denial_nsec() {
    let message = compact_nxdomain("nxdomain.example.test");

    let inspections = InspectNsecBitmapsUseCase::new().execute(&message).unwrap();

    assert_eq!(inspections.len(), 1);
    let nsec = &inspections[0];
    assert_eq!(nsec.owner.as_str(), "nxdomain.example.test");
    assert_eq!(nsec.next_domain.as_str(), "\\000.nxdomain.example.test");
    assert_eq!(nsec.windows.len(), 2);
    assert_eq!(nsec.windows[0].window, 0);
    assert_eq!(nsec.windows[0].bit_positions, vec![46, 47]);
    assert_eq!(nsec.windows[1].window, 255);
    assert_eq!(nsec.windows[1].bit_positions, vec![3]);
    assert!(nsec.types.contains(NXNAME_TYPE));
}

#[test]
fn test_ignores_non_nsec_records() {
    let message = nsec_message("a.example.test", &[1, 46, 47], true).with_authority(
        RecordSet::new(DomainName::parse("example.test").unwrap(), RecordType::SOA)
            .with_record(RecordData::Opaque),
    );

    let inspections = InspectNsecBitmapsUseCase::new().execute(&message).unwrap();

    assert_eq!(inspections.len(), 1);
    assert_eq!(inspections[0].types.len(), 3);
}

#[test]
fn test_no_authority_yields_nothing() {
    let message = DnsResponseMessage::new(ResponseCode::NXDomain);
    assert!(InspectNsecBitmapsUseCase::new()
        .execute(&message)
        .unwrap()
        .is_empty());
}

#[test]
fn test_oversized_window_reported() {
    let owner = DomainName::parse("bad.example.test").unwrap();
    let message = DnsResponseMessage::new(ResponseCode::NoError).with_authority(
        RecordSet::new(owner.clone(), RecordType::NSEC).with_record(RecordData::Nsec(
            NsecData::new(
                owner,
                vec![TypeBitmapWindow {
                    window: 0,
                    bitmap: vec![0; 40],
                }],
            ),
        )),
    );

    assert!(matches!(
        InspectNsecBitmapsUseCase::new().execute(&message),
        Err(DomainError::InvalidBitmap(_))
    ));
}
