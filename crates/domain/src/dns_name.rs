use crate::DomainError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_LEN: usize = 253;
const MAX_WIRE_LEN: usize = 255;

/// A domain name in canonical form: ASCII lower-case, no trailing dot.
///
/// Two names are equal only when they spell the same name; there is no
/// wildcard or ancestor matching. The root is stored as `"."`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainName(Arc<str>);

impl DomainName {
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidDomainName("empty name".to_string()));
        }
        if trimmed == "." {
            return Ok(Self::root());
        }

        let without_dot = trimmed.strip_suffix('.').unwrap_or(trimmed);
        if without_dot.len() > MAX_NAME_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "'{}' exceeds {} characters",
                name, MAX_NAME_LEN
            )));
        }

        for label in without_dot.split('.') {
            if label.is_empty() {
                return Err(DomainError::InvalidDomainName(format!(
                    "'{}' contains an empty label",
                    name
                )));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(DomainError::InvalidDomainName(format!(
                    "label '{}' exceeds {} octets",
                    label, MAX_LABEL_LEN
                )));
            }
        }

        Ok(Self(without_dot.to_ascii_lowercase().into()))
    }

    /// Build a name from uncompressed wire labels, root label excluded.
    ///
    /// Limits are measured in octets. Octets outside printable ASCII are
    /// written as `\DDD`, and `.` or `\\` inside a label are backslash-escaped.
    pub fn from_wire_labels<'a, I>(labels: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut text = String::new();
        let mut wire_len = 1;

        for label in labels {
            if label.is_empty() {
                return Err(DomainError::InvalidDomainName(
                    "empty label inside a wire name".to_string(),
                ));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(DomainError::InvalidDomainName(format!(
                    "wire label of {} octets exceeds {}",
                    label.len(),
                    MAX_LABEL_LEN
                )));
            }
            wire_len += label.len() + 1;
            if wire_len > MAX_WIRE_LEN {
                return Err(DomainError::InvalidDomainName(format!(
                    "wire name exceeds {} octets",
                    MAX_WIRE_LEN
                )));
            }

            if !text.is_empty() {
                text.push('.');
            }
            for &octet in label {
                match octet.to_ascii_lowercase() {
                    b'.' | b'\\' => {
                        text.push('\\');
                        text.push(char::from(octet));
                    }
                    printable if printable.is_ascii_graphic() => text.push(char::from(printable)),
                    other => text.push_str(&format!("\\{:03}", other)),
                }
            }
        }

        if text.is_empty() {
            return Ok(Self::root());
        }
        Ok(Self(text.into()))
    }

    pub fn root() -> Self {
        Self(".".into())
    }

    pub fn is_root(&self) -> bool {
        &*self.0 == "."
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fully qualified presentation form, always ending in a dot.
    pub fn to_fqdn(&self) -> String {
        if self.is_root() {
            ".".to_string()
        } else {
            format!("{}.", self.0)
        }
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fqdn())
    }
}

impl FromStr for DomainName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
