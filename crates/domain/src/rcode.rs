use std::fmt;
use std::str::FromStr;

/// DNS response code, including the EDNS extended BADVERS value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    NoError,
    FormErr,
    ServFail,
    NXDomain,
    NotImp,
    Refused,
    YXDomain,
    YXRRSet,
    NXRRSet,
    NotAuth,
    NotZone,
    BADVERS,
    Unknown(u16),
}

impl ResponseCode {
    pub fn to_u16(&self) -> u16 {
        match self {
            ResponseCode::NoError => 0,
            ResponseCode::FormErr => 1,
            ResponseCode::ServFail => 2,
            ResponseCode::NXDomain => 3,
            ResponseCode::NotImp => 4,
            ResponseCode::Refused => 5,
            ResponseCode::YXDomain => 6,
            ResponseCode::YXRRSet => 7,
            ResponseCode::NXRRSet => 8,
            ResponseCode::NotAuth => 9,
            ResponseCode::NotZone => 10,
            ResponseCode::BADVERS => 16,
            ResponseCode::Unknown(code) => *code,
        }
    }

    pub fn from_u16(code: u16) -> Self {
        match code {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormErr,
            2 => ResponseCode::ServFail,
            3 => ResponseCode::NXDomain,
            4 => ResponseCode::NotImp,
            5 => ResponseCode::Refused,
            6 => ResponseCode::YXDomain,
            7 => ResponseCode::YXRRSet,
            8 => ResponseCode::NXRRSet,
            9 => ResponseCode::NotAuth,
            10 => ResponseCode::NotZone,
            16 => ResponseCode::BADVERS,
            other => ResponseCode::Unknown(other),
        }
    }

    /// Mnemonic text form, e.g. `NOERROR`, `NXDOMAIN`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::FormErr => "FORMERR",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::YXDomain => "YXDOMAIN",
            ResponseCode::YXRRSet => "YXRRSET",
            ResponseCode::NXRRSet => "NXRRSET",
            ResponseCode::NotAuth => "NOTAUTH",
            ResponseCode::NotZone => "NOTZONE",
            ResponseCode::BADVERS => "BADVERS",
            ResponseCode::Unknown(_) => "UNKNOWN",
        }
    }

    /// Codes after which a stub resolver moves on to the next nameserver.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            ResponseCode::ServFail
                | ResponseCode::Refused
                | ResponseCode::NotImp
                | ResponseCode::FormErr
        )
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseCode::Unknown(code) => write!(f, "{}", code),
            known => f.write_str(known.as_str()),
        }
    }
}

impl FromStr for ResponseCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NOERROR" => Ok(ResponseCode::NoError),
            "FORMERR" => Ok(ResponseCode::FormErr),
            "SERVFAIL" => Ok(ResponseCode::ServFail),
            "NXDOMAIN" => Ok(ResponseCode::NXDomain),
            "NOTIMP" => Ok(ResponseCode::NotImp),
            "REFUSED" => Ok(ResponseCode::Refused),
            "YXDOMAIN" => Ok(ResponseCode::YXDomain),
            "YXRRSET" => Ok(ResponseCode::YXRRSet),
            "NXRRSET" => Ok(ResponseCode::NXRRSet),
            "NOTAUTH" => Ok(ResponseCode::NotAuth),
            "NOTZONE" => Ok(ResponseCode::NotZone),
            "BADVERS" => Ok(ResponseCode::BADVERS),
            other => other
                .parse::<u16>()
                .map(ResponseCode::from_u16)
                .map_err(|_| format!("Unknown response code: {}", s)),
        }
    }
}
