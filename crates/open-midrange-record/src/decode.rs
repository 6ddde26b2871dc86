//! Walks a byte buffer using a record layout.

use rust_decimal::Decimal;

use open_midrange_access::TextConverter;

use crate::decimal::{unpack_decimal, unzone_decimal};
use crate::error::RecordError;
use crate::field::{FieldKind, FieldValue};
use crate::layout::{FieldDef, RecordLayout};
use crate::Result;

/// Reads named fields out of one fixed-layout record buffer.
///
/// Every access is bounds-checked against the buffer; host replies shorter
/// than the layout surface as [`RecordError::Truncated`] on the first field
/// the buffer cannot cover.
pub struct RecordDecoder<'a> {
    layout: &'a RecordLayout,
    data: &'a [u8],
    converter: &'a dyn TextConverter,
}

impl<'a> RecordDecoder<'a> {
    /// Decode `data` using `layout`.
    pub fn new(layout: &'a RecordLayout, data: &'a [u8], converter: &'a dyn TextConverter) -> Self {
        Self {
            layout,
            data,
            converter,
        }
    }

    /// The layout being decoded.
    pub fn layout(&self) -> &RecordLayout {
        self.layout
    }

    /// Character field, trailing blanks trimmed.
    pub fn text(&self, name: &str) -> Result<String> {
        let (def, bytes) = self.slice(name)?;
        match def.kind {
            FieldKind::Char(_) => {
                let decoded = self.converter.decode(bytes)?;
                Ok(decoded.trim_end().to_string())
            }
            kind => Err(RecordError::TypeMismatch {
                field: name.to_string(),
                kind,
                requested: "text",
            }),
        }
    }

    /// Binary field, or a whole-number decimal field.
    pub fn int(&self, name: &str) -> Result<i64> {
        let (def, bytes) = self.slice(name)?;
        match def.kind {
            FieldKind::Bin2 => Ok(i16::from_be_bytes([bytes[0], bytes[1]]) as i64),
            FieldKind::UBin2 => Ok(u16::from_be_bytes([bytes[0], bytes[1]]) as i64),
            FieldKind::Bin4 => Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64),
            FieldKind::UBin4 => Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64),
            FieldKind::Bin8 => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(bytes);
                Ok(i64::from_be_bytes(raw))
            }
            FieldKind::Packed { .. } | FieldKind::Zoned { .. } => {
                let value = self.decimal(name)?;
                FieldValue::Decimal(value)
                    .as_int()
                    .ok_or(RecordError::TypeMismatch {
                        field: name.to_string(),
                        kind: def.kind,
                        requested: "int",
                    })
            }
            kind => Err(RecordError::TypeMismatch {
                field: name.to_string(),
                kind,
                requested: "int",
            }),
        }
    }

    /// Packed or zoned decimal field, or a widened binary field.
    pub fn decimal(&self, name: &str) -> Result<Decimal> {
        let (def, bytes) = self.slice(name)?;
        match def.kind {
            FieldKind::Packed { frac, .. } => Ok(unpack_decimal(bytes, frac)?.0),
            FieldKind::Zoned { frac, .. } => Ok(unzone_decimal(bytes, frac)?.0),
            FieldKind::Bin2 | FieldKind::Bin4 | FieldKind::Bin8 | FieldKind::UBin2 | FieldKind::UBin4 => {
                Ok(Decimal::from(self.int(name)?))
            }
            kind => Err(RecordError::TypeMismatch {
                field: name.to_string(),
                kind,
                requested: "decimal",
            }),
        }
    }

    /// Raw bytes of any field.
    pub fn bytes(&self, name: &str) -> Result<Vec<u8>> {
        let (_, bytes) = self.slice(name)?;
        Ok(bytes.to_vec())
    }

    /// Decode a field into the value its kind implies. Whole-number
    /// decimals come back as [`FieldValue::Int`].
    pub fn value(&self, name: &str) -> Result<FieldValue> {
        let (def, _) = self.slice(name)?;
        match def.kind {
            FieldKind::Char(_) => Ok(FieldValue::Text(self.text(name)?)),
            FieldKind::Bin2
            | FieldKind::Bin4
            | FieldKind::Bin8
            | FieldKind::UBin2
            | FieldKind::UBin4 => Ok(FieldValue::Int(self.int(name)?)),
            FieldKind::Packed { frac, .. } | FieldKind::Zoned { frac, .. } => {
                if frac == 0 {
                    Ok(FieldValue::Int(self.int(name)?))
                } else {
                    Ok(FieldValue::Decimal(self.decimal(name)?))
                }
            }
            FieldKind::Hex(_) => Ok(FieldValue::Bytes(self.bytes(name)?)),
        }
    }

    /// Bytes of a field, bounds-checked.
    fn slice(&self, name: &str) -> Result<(&FieldDef, &[u8])> {
        let def = self
            .layout
            .field(name)
            .ok_or_else(|| RecordError::UnknownField {
                layout: self.layout.name().to_string(),
                field: name.to_string(),
            })?;
        let end = def.end();
        if self.data.len() < end {
            return Err(RecordError::Truncated {
                layout: self.layout.name().to_string(),
                field: name.to_string(),
                needed: end,
                actual: self.data.len(),
            });
        }
        Ok((def, &self.data[def.offset..end]))
    }
}
