//! NSEC type bitmap decoding (RFC 4034 §4.1.2)
//!
//! A type bitmap is a sequence of windows. Window `w` covers the 256 type
//! codes starting at `w * 256`; bit `j` (most significant first) of bitmap
//! byte `i` stands for type `w * 256 + i * 8 + j`.

use crate::{DomainError, RecordType};
use std::collections::BTreeSet;

/// Longest bitmap a single window may carry (256 types / 8).
pub const MAX_WINDOW_BITMAP_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBitmapWindow {
    pub window: u8,
    pub bitmap: Vec<u8>,
}

impl TypeBitmapWindow {
    pub fn new(window: u8, bitmap: Vec<u8>) -> Result<Self, DomainError> {
        let parsed = Self { window, bitmap };
        parsed.validate()?;
        Ok(parsed)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.bitmap.len() > MAX_WINDOW_BITMAP_LEN {
            return Err(DomainError::InvalidBitmap(format!(
                "window {} carries {} bitmap bytes (max {})",
                self.window,
                self.bitmap.len(),
                MAX_WINDOW_BITMAP_LEN
            )));
        }
        Ok(())
    }

    /// Parse the wire form: repeated `window | length | bitmap[length]`.
    pub fn parse_wire(bytes: &[u8]) -> Result<Vec<Self>, DomainError> {
        let mut windows = Vec::new();
        let mut rest = bytes;

        while !rest.is_empty() {
            let [window, len, tail @ ..] = rest else {
                return Err(DomainError::InvalidBitmap(
                    "truncated window header".to_string(),
                ));
            };
            let len = *len as usize;

            if len == 0 || len > MAX_WINDOW_BITMAP_LEN {
                return Err(DomainError::InvalidBitmap(format!(
                    "window {} declares bitmap length {}",
                    window, len
                )));
            }
            if tail.len() < len {
                return Err(DomainError::InvalidBitmap(format!(
                    "window {} declares {} bytes but only {} remain",
                    window,
                    len,
                    tail.len()
                )));
            }

            windows.push(Self {
                window: *window,
                bitmap: tail[..len].to_vec(),
            });
            rest = &tail[len..];
        }

        Ok(windows)
    }

    /// Build the minimal window list covering the given type codes.
    pub fn from_types(types: impl IntoIterator<Item = u16>) -> Vec<Self> {
        let mut windows: Vec<Self> = Vec::new();
        let sorted: BTreeSet<u16> = types.into_iter().collect();

        for code in sorted {
            let window = (code >> 8) as u8;
            let offset = (code & 0xff) as usize;
            let byte = offset / 8;
            let bit = offset % 8;

            if windows.last().map(|w| w.window) != Some(window) {
                windows.push(Self {
                    window,
                    bitmap: Vec::new(),
                });
            }
            if let Some(current) = windows.last_mut() {
                if current.bitmap.len() <= byte {
                    current.bitmap.resize(byte + 1, 0);
                }
                current.bitmap[byte] |= 0x80 >> bit;
            }
        }

        windows
    }

    fn base(&self) -> u16 {
        u16::from(self.window) * 256
    }
}

/// Positions of the set bits in `bitmap`, most significant bit of byte 0 first.
fn set_bit_positions(bitmap: &[u8]) -> impl Iterator<Item = u16> + '_ {
    bitmap.iter().enumerate().flat_map(|(i, byte)| {
        (0..8u16)
            .filter(move |&j| byte & (0x80u8 >> j) != 0)
            .map(move |j| i as u16 * 8 + j)
    })
}

/// RR type codes signalled by one NSEC record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSet(BTreeSet<u16>);

impl TypeSet {
    pub fn contains(&self, code: u16) -> bool {
        self.0.contains(&code)
    }

    pub fn contains_type(&self, record_type: RecordType) -> bool {
        self.contains(record_type.to_u16())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<u16> for TypeSet {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Decode every window of an NSEC record into the set of types it signals.
pub fn decode_type_bitmap(windows: &[TypeBitmapWindow]) -> Result<TypeSet, DomainError> {
    let mut types = BTreeSet::new();
    for window in windows {
        window.validate()?;
        let base = window.base();
        types.extend(set_bit_positions(&window.bitmap).map(|bit| base + bit));
    }
    Ok(TypeSet(types))
}

/// Per-window view used by inspection output; never by classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDiagnostic {
    pub window: u8,
    pub bitmap: Vec<u8>,
    /// Set bit numbers inside this window, ascending.
    pub bit_positions: Vec<u16>,
}

impl WindowDiagnostic {
    pub fn type_codes(&self) -> impl Iterator<Item = u16> + '_ {
        let base = u16::from(self.window) * 256;
        self.bit_positions.iter().map(move |bit| base + bit)
    }
}

pub fn window_diagnostics(
    windows: &[TypeBitmapWindow],
) -> Result<Vec<WindowDiagnostic>, DomainError> {
    windows
        .iter()
        .map(|window| {
            window.validate()?;
            Ok(WindowDiagnostic {
                window: window.window,
                bitmap: window.bitmap.clone(),
                bit_positions: set_bit_positions(&window.bitmap).collect(),
            })
        })
        .collect()
}
