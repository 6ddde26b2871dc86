//! In-memory schema objects for remote file record formats.

use serde::{Deserialize, Serialize};

use open_midrange_access::QualifiedName;
use open_midrange_record::{FieldKind, RecordLayout};

/// One field of a record format, as described by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescription {
    /// Field name (up to 10 characters).
    pub name: String,
    /// Host data type, with length/precision.
    pub kind: FieldKind,
    /// Column heading / description text.
    pub text: String,
    /// Position of the field's start within the record buffer.
    pub buffer_offset: usize,
    /// 1-based position in the file's key, if the field is a key field.
    pub key_sequence: Option<u32>,
}

/// One record format of a remote file.
///
/// Physical files have exactly one; multi-format logical files have one per
/// member format, in the order the host lists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFormat {
    /// Format name (up to 10 characters).
    pub name: String,
    /// The file this format was retrieved from.
    pub file: QualifiedName,
    /// Format description text.
    pub text: String,
    /// Total record buffer length.
    pub record_length: usize,
    /// Fields in buffer order.
    pub fields: Vec<FieldDescription>,
}

impl RecordFormat {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescription> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Key fields ordered by key sequence.
    pub fn key_fields(&self) -> Vec<&FieldDescription> {
        let mut keys: Vec<&FieldDescription> =
            self.fields.iter().filter(|f| f.key_sequence.is_some()).collect();
        keys.sort_by_key(|f| f.key_sequence);
        keys
    }

    /// Lower this schema to a [`RecordLayout`] usable with the record
    /// decoder/builder.
    pub fn to_layout(&self) -> RecordLayout {
        let mut builder = RecordLayout::builder(&self.name);
        for field in &self.fields {
            builder = builder.field_at(&field.name, field.buffer_offset, field.kind);
        }
        builder.build_with_length(self.record_length)
    }
}
