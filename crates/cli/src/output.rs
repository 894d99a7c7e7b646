use compactdenial_application::use_cases::NsecInspection;
use compactdenial_domain::{RecordType, ResponseCode};

/// Exit status used when no response code could be determined.
pub const EXIT_FAILURE: u8 = 255;

/// Process exit status for a classified code. Codes that do not fit below
/// the failure status are reported as a failure.
pub fn exit_status(rcode: ResponseCode) -> u8 {
    u8::try_from(rcode.to_u16())
        .ok()
        .filter(|&status| status < EXIT_FAILURE)
        .unwrap_or(EXIT_FAILURE)
}

/// One block per NSEC record:
///
/// ```text
/// nxdomain.example.test. NSEC \000.nxdomain.example.test.
///   window 0 bitmap 000000000003 bits [46, 47] types [RRSIG, NSEC]
///   window 255 bitmap 10 bits [3] types [NXNAME]
/// ```
pub fn format_bitmaps(inspections: &[NsecInspection]) -> String {
    let mut out = String::new();

    for nsec in inspections {
        out.push_str(&format!("{} NSEC {}\n", nsec.owner, nsec.next_domain));

        for window in &nsec.windows {
            let bits = window
                .bit_positions
                .iter()
                .map(u16::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            let types = window
                .type_codes()
                .map(|code| RecordType::from_u16(code).to_string())
                .collect::<Vec<_>>()
                .join(", ");

            out.push_str(&format!(
                "  window {} bitmap {} bits [{}] types [{}]\n",
                window.window,
                hex(&window.bitmap),
                bits,
                types
            ));
        }
    }

    out
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
