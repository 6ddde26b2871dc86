//! Assembles a fixed-layout record buffer from named values.

use rust_decimal::Decimal;

use open_midrange_access::TextConverter;

use crate::decimal::{pack_decimal, zone_decimal};
use crate::error::RecordError;
use crate::field::{FieldKind, FieldValue};
use crate::layout::{FieldDef, RecordLayout};
use crate::Result;

/// Builds one record for a layout, zero-filled until fields are set.
///
/// Used for program-call request buffers (qualified names, format names,
/// change entries). Character fields are blank-padded through the session
/// converter when set.
pub struct RecordBuilder<'a> {
    layout: &'a RecordLayout,
    converter: &'a dyn TextConverter,
    buf: Vec<u8>,
}

impl<'a> RecordBuilder<'a> {
    /// Start a zero-filled record for `layout`.
    pub fn new(layout: &'a RecordLayout, converter: &'a dyn TextConverter) -> Self {
        Self {
            layout,
            converter,
            buf: vec![0; layout.length()],
        }
    }

    /// Set a character field, blank-padded to its length.
    pub fn set_text(&mut self, name: &str, text: &str) -> Result<&mut Self> {
        let def = self.lookup(name)?;
        let (offset, kind) = (def.offset, def.kind);
        match kind {
            FieldKind::Char(len) => {
                let encoded = self.converter.encode(text, len)?;
                self.buf[offset..offset + len].copy_from_slice(&encoded);
                Ok(self)
            }
            kind => Err(RecordError::TypeMismatch {
                field: name.to_string(),
                kind,
                requested: "text",
            }),
        }
    }

    /// Set a binary field, or a whole-number decimal field.
    pub fn set_int(&mut self, name: &str, value: i64) -> Result<&mut Self> {
        let def = self.lookup(name)?;
        let (offset, kind) = (def.offset, def.kind);
        let out_of_range = || RecordError::IntOutOfRange {
            field: name.to_string(),
            value,
        };
        match kind {
            FieldKind::Bin2 => {
                let v = i16::try_from(value).map_err(|_| out_of_range())?;
                self.buf[offset..offset + 2].copy_from_slice(&v.to_be_bytes());
            }
            FieldKind::UBin2 => {
                let v = u16::try_from(value).map_err(|_| out_of_range())?;
                self.buf[offset..offset + 2].copy_from_slice(&v.to_be_bytes());
            }
            FieldKind::Bin4 => {
                let v = i32::try_from(value).map_err(|_| out_of_range())?;
                self.buf[offset..offset + 4].copy_from_slice(&v.to_be_bytes());
            }
            FieldKind::UBin4 => {
                let v = u32::try_from(value).map_err(|_| out_of_range())?;
                self.buf[offset..offset + 4].copy_from_slice(&v.to_be_bytes());
            }
            FieldKind::Bin8 => {
                self.buf[offset..offset + 8].copy_from_slice(&value.to_be_bytes());
            }
            FieldKind::Packed { .. } | FieldKind::Zoned { .. } => {
                return self.set_decimal(name, Decimal::from(value));
            }
            kind => {
                return Err(RecordError::TypeMismatch {
                    field: name.to_string(),
                    kind,
                    requested: "int",
                })
            }
        }
        Ok(self)
    }

    /// Set a packed or zoned decimal field.
    pub fn set_decimal(&mut self, name: &str, value: Decimal) -> Result<&mut Self> {
        let def = self.lookup(name)?;
        let (offset, kind) = (def.offset, def.kind);
        let encoded = match kind {
            FieldKind::Packed { digits, frac } => pack_decimal(&value, digits, frac)?,
            FieldKind::Zoned { digits, frac } => zone_decimal(&value, digits, frac)?,
            kind => {
                return Err(RecordError::TypeMismatch {
                    field: name.to_string(),
                    kind,
                    requested: "decimal",
                })
            }
        };
        self.buf[offset..offset + encoded.len()].copy_from_slice(&encoded);
        Ok(self)
    }

    /// Set a hex field; the byte count must match exactly.
    pub fn set_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<&mut Self> {
        let def = self.lookup(name)?;
        let (offset, kind) = (def.offset, def.kind);
        match kind {
            FieldKind::Hex(len) => {
                if bytes.len() != len {
                    return Err(RecordError::LengthMismatch {
                        field: name.to_string(),
                        expected: len,
                        actual: bytes.len(),
                    });
                }
                self.buf[offset..offset + len].copy_from_slice(bytes);
                Ok(self)
            }
            kind => Err(RecordError::TypeMismatch {
                field: name.to_string(),
                kind,
                requested: "bytes",
            }),
        }
    }

    /// Set a field from a dynamic value, dispatching on the variant.
    pub fn set_value(&mut self, name: &str, value: &FieldValue) -> Result<&mut Self> {
        match value {
            FieldValue::Text(s) => self.set_text(name, s),
            FieldValue::Int(v) => self.set_int(name, *v),
            FieldValue::Decimal(d) => self.set_decimal(name, *d),
            FieldValue::Bytes(b) => self.set_bytes(name, b),
        }
    }

    /// Finish, yielding the record bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    fn lookup(&self, name: &str) -> Result<FieldDef> {
        self.layout
            .field(name)
            .cloned()
            .ok_or_else(|| RecordError::UnknownField {
                layout: self.layout.name().to_string(),
                field: name.to_string(),
            })
    }
}
