//! Staged attribute changes and their wire form.
//!
//! Writes never go to the host one by one. They accumulate here and are
//! flushed in a single change-job call as a counted list of keyed
//! variable-length entries, one per staged attribute.

use std::collections::BTreeMap;

use open_midrange_access::TextConverter;
use open_midrange_record::{FieldKind, FieldValue, RecordBuilder, RecordLayout};

use crate::attribute::JobAttribute;
use crate::error::JobError;
use crate::Result;

/// Fixed bytes of one change entry before its data.
const ENTRY_PREFIX_LEN: usize = 16;

/// Staged attribute values, keyed and flushed in code order.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    staged: BTreeMap<JobAttribute, FieldValue>,
}

impl ChangeSet {
    /// An empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a value for `attribute`, replacing any earlier staged value.
    ///
    /// Fails immediately when the attribute is read-only or the value's
    /// shape does not match its wire type; nothing reaches the host until
    /// the set is flushed.
    pub fn stage(&mut self, attribute: JobAttribute, value: FieldValue) -> Result<()> {
        if !attribute.is_settable() {
            return Err(JobError::NotSettable(attribute));
        }
        let kind = attribute
            .field_kind()
            .ok_or(JobError::NotSettable(attribute))?;
        match (kind, &value) {
            (FieldKind::Char(_), FieldValue::Text(_)) => {}
            (
                FieldKind::Bin2
                | FieldKind::Bin4
                | FieldKind::Bin8
                | FieldKind::UBin2
                | FieldKind::UBin4,
                FieldValue::Int(_),
            ) => {}
            (FieldKind::Char(_), _) => {
                return Err(JobError::ValueType {
                    attribute,
                    expected: "text",
                })
            }
            _ => {
                return Err(JobError::ValueType {
                    attribute,
                    expected: "integer",
                })
            }
        }
        self.staged.insert(attribute, value);
        Ok(())
    }

    /// The staged value for `attribute`, if any.
    pub fn get(&self, attribute: JobAttribute) -> Option<&FieldValue> {
        self.staged.get(&attribute)
    }

    /// Staged entries in code order.
    pub fn iter(&self) -> impl Iterator<Item = (JobAttribute, &FieldValue)> {
        self.staged.iter().map(|(a, v)| (*a, v))
    }

    /// Number of staged attributes.
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    /// Returns `true` when nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Discard everything staged.
    pub fn clear(&mut self) {
        self.staged.clear();
    }

    /// Remove `attribute` only while its staged value still equals
    /// `value`. Returns `false` when the entry is gone or was restaged
    /// with a different value in the meantime.
    pub fn unstage(&mut self, attribute: JobAttribute, value: &FieldValue) -> bool {
        match self.staged.get(&attribute) {
            Some(current) if current == value => {
                self.staged.remove(&attribute);
                true
            }
            _ => false,
        }
    }

    /// Serialize the set as a change-job request: a 4-byte entry count
    /// followed by one keyed entry per staged attribute.
    pub fn to_request(&self, converter: &dyn TextConverter) -> Result<Vec<u8>> {
        let mut request = Vec::new();
        request.extend_from_slice(&(self.staged.len() as i32).to_be_bytes());
        for (attribute, value) in self.iter() {
            request.extend_from_slice(&encode_entry(attribute, value, converter)?);
        }
        Ok(request)
    }
}

/// One keyed entry: total length, key, type tag, data length, data.
fn encode_entry(
    attribute: JobAttribute,
    value: &FieldValue,
    converter: &dyn TextConverter,
) -> Result<Vec<u8>> {
    let kind = attribute
        .field_kind()
        .ok_or(JobError::NotSettable(attribute))?;
    let data_len = kind.byte_len();
    let type_tag = match kind {
        FieldKind::Char(_) => "C",
        _ => "B",
    };
    let layout = RecordLayout::builder("JOBC0100")
        .field("ENTRY_LENGTH", FieldKind::Bin4)
        .field("KEY", FieldKind::Bin4)
        .field("TYPE", FieldKind::Char(1))
        .field("RESERVED", FieldKind::Hex(3))
        .field("DATA_LENGTH", FieldKind::Bin4)
        .field("DATA", kind)
        .build();
    let mut entry = RecordBuilder::new(&layout, converter);
    entry.set_int("ENTRY_LENGTH", (ENTRY_PREFIX_LEN + data_len) as i64)?;
    entry.set_int("KEY", attribute.code() as i64)?;
    entry.set_text("TYPE", type_tag)?;
    entry.set_int("DATA_LENGTH", data_len as i64)?;
    entry.set_value("DATA", value)?;
    Ok(entry.into_bytes())
}
