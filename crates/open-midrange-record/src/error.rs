//! Record parsing and serialization errors.

use thiserror::Error;

use crate::field::FieldKind;

/// Errors from fixed-layout record operations.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The buffer ends before the field does.
    #[error("record '{layout}' truncated at field {field}: need {needed} bytes, have {actual}")]
    Truncated {
        layout: String,
        field: String,
        needed: usize,
        actual: usize,
    },

    /// The field name is not in the layout.
    #[error("layout '{layout}' has no field named {field}")]
    UnknownField { layout: String, field: String },

    /// The field's host type does not support the requested access.
    #[error("field {field} is {kind:?}, not usable as {requested}")]
    TypeMismatch {
        field: String,
        kind: FieldKind,
        requested: &'static str,
    },

    /// A decimal nibble outside 0-9.
    #[error("invalid decimal digit nibble 0x{0:X}")]
    BadDigit(u8),

    /// A sign nibble that is neither positive, negative, nor unsigned.
    #[error("invalid decimal sign nibble 0x{0:X}")]
    BadSign(u8),

    /// An integer outside the binary field's range.
    #[error("value {value} does not fit field {field}")]
    IntOutOfRange { field: String, value: i64 },

    /// A decimal value with more digits than the field's precision.
    #[error("value {value} does not fit in {digits} digits")]
    DecimalOverflow { value: String, digits: u32 },

    /// A value with more fraction digits than the field carries.
    #[error("value {value} has more than {frac} fraction digits")]
    FractionTooWide { value: String, frac: u32 },

    /// Wrong byte count for a fixed hex field.
    #[error("field {field} takes exactly {expected} bytes, got {actual}")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// A field-type code this library does not know.
    #[error("unknown field type code '{0}'")]
    UnknownTypeCode(char),

    /// Empty decimal field data.
    #[error("empty decimal field data")]
    EmptyDecimal,

    /// Session text conversion failed.
    #[error(transparent)]
    Access(#[from] open_midrange_access::AccessError),
}
