//! Host field types and decoded field values.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RecordError;

/// The host data type of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Fixed-length character field, blank-padded.
    Char(usize),
    /// Big-endian signed 2-byte binary.
    Bin2,
    /// Big-endian signed 4-byte binary.
    Bin4,
    /// Big-endian signed 8-byte binary.
    Bin8,
    /// Big-endian unsigned 2-byte binary.
    UBin2,
    /// Big-endian unsigned 4-byte binary.
    UBin4,
    /// Packed decimal: two digits per byte, sign in the last nibble.
    Packed { digits: u32, frac: u32 },
    /// Zoned decimal: one digit per byte, sign in the last zone nibble.
    Zoned { digits: u32, frac: u32 },
    /// Raw bytes, no conversion.
    Hex(usize),
}

impl FieldKind {
    /// Storage size of the field in bytes.
    pub fn byte_len(&self) -> usize {
        match *self {
            FieldKind::Char(len) | FieldKind::Hex(len) => len,
            FieldKind::Bin2 | FieldKind::UBin2 => 2,
            FieldKind::Bin4 | FieldKind::UBin4 => 4,
            FieldKind::Bin8 => 8,
            // One sign nibble, then round up to whole bytes.
            FieldKind::Packed { digits, .. } => (digits as usize + 2) / 2,
            FieldKind::Zoned { digits, .. } => digits as usize,
        }
    }

    /// Returns `true` for the two decimal kinds.
    pub fn is_decimal(&self) -> bool {
        matches!(self, FieldKind::Packed { .. } | FieldKind::Zoned { .. })
    }

    /// Fraction digits for decimal kinds, 0 otherwise.
    pub fn frac(&self) -> u32 {
        match *self {
            FieldKind::Packed { frac, .. } | FieldKind::Zoned { frac, .. } => frac,
            _ => 0,
        }
    }
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Character data, trailing blanks trimmed.
    Text(String),
    /// Binary or whole-number decimal data.
    Int(i64),
    /// Decimal data with fraction digits.
    Decimal(Decimal),
    /// Raw bytes.
    Bytes(Vec<u8>),
}

impl FieldValue {
    /// The text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The integer, widening whole decimals.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            FieldValue::Decimal(d) if d.is_integer() => d.to_i64(),
            _ => None,
        }
    }

    /// The decimal, widening integers.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Decimal(d) => Some(*d),
            FieldValue::Int(v) => Some(Decimal::from(*v)),
            _ => None,
        }
    }

    /// The raw bytes, if this is a bytes value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Name of the variant, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Int(_) => "int",
            FieldValue::Decimal(_) => "decimal",
            FieldValue::Bytes(_) => "bytes",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Decimal(d) => write!(f, "{d}"),
            FieldValue::Bytes(b) => {
                for byte in b {
                    write!(f, "{byte:02X}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v as i64)
    }
}

impl From<Decimal> for FieldValue {
    fn from(d: Decimal) -> Self {
        FieldValue::Decimal(d)
    }
}

/// Parse a single-character host field-type code (as found in file
/// description rows).
pub fn kind_from_type_code(
    code: char,
    length: u32,
    digits: u32,
    frac: u32,
) -> Result<FieldKind, RecordError> {
    match code {
        'A' => Ok(FieldKind::Char(length as usize)),
        'H' => Ok(FieldKind::Hex(length as usize)),
        'P' => Ok(FieldKind::Packed { digits, frac }),
        'S' => Ok(FieldKind::Zoned { digits, frac }),
        'B' => match length {
            2 => Ok(FieldKind::Bin2),
            8 => Ok(FieldKind::Bin8),
            _ => Ok(FieldKind::Bin4),
        },
        other => Err(RecordError::UnknownTypeCode(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn byte_lengths() {
        assert_eq!(FieldKind::Char(10).byte_len(), 10);
        assert_eq!(FieldKind::Bin2.byte_len(), 2);
        assert_eq!(FieldKind::Bin4.byte_len(), 4);
        assert_eq!(FieldKind::Bin8.byte_len(), 8);
        // 5 digits + sign nibble = 3 bytes; 6 digits + sign = 4 bytes
        assert_eq!(FieldKind::Packed { digits: 5, frac: 0 }.byte_len(), 3);
        assert_eq!(FieldKind::Packed { digits: 6, frac: 2 }.byte_len(), 4);
        assert_eq!(FieldKind::Zoned { digits: 7, frac: 2 }.byte_len(), 7);
    }

    #[test]
    fn value_accessors_widen() {
        assert_eq!(FieldValue::Int(42).as_decimal(), Some(Decimal::from(42)));
        let whole = FieldValue::Decimal(Decimal::from(9));
        assert_eq!(whole.as_int(), Some(9));
        let frac = FieldValue::Decimal(Decimal::from_str("9.5").unwrap());
        assert_eq!(frac.as_int(), None);
        assert_eq!(FieldValue::Text("X".into()).as_int(), None);
    }

    #[test]
    fn type_codes() {
        assert_eq!(
            kind_from_type_code('A', 10, 0, 0).unwrap(),
            FieldKind::Char(10)
        );
        assert_eq!(
            kind_from_type_code('P', 4, 7, 2).unwrap(),
            FieldKind::Packed { digits: 7, frac: 2 }
        );
        assert_eq!(kind_from_type_code('B', 2, 0, 0).unwrap(), FieldKind::Bin2);
        assert_eq!(kind_from_type_code('B', 4, 0, 0).unwrap(), FieldKind::Bin4);
        assert!(kind_from_type_code('Z', 4, 0, 0).is_err());
    }

    #[test]
    fn display_formats() {
        assert_eq!(FieldValue::Bytes(vec![0xAB, 0x01]).to_string(), "AB01");
        assert_eq!(FieldValue::Int(-3).to_string(), "-3");
    }
}
