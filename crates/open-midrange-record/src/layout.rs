//! Record layout tables.
//!
//! A layout maps symbolic field names to `(offset, length, type)` within a
//! fixed host output format. Well-known host formats are declared once as
//! `LazyLock<RecordLayout>` statics; file-description retrieval builds
//! layouts dynamically from the host's own schema rows.

use serde::{Deserialize, Serialize};

use crate::field::FieldKind;

/// One named field at a fixed offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Symbolic field name, unique within the layout.
    pub name: String,
    /// Byte offset from the start of the record.
    pub offset: usize,
    /// Host data type (carries the length).
    pub kind: FieldKind,
}

impl FieldDef {
    /// Offset one past the field's last byte.
    pub fn end(&self) -> usize {
        self.offset + self.kind.byte_len()
    }
}

/// A fixed record layout: named fields at fixed offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordLayout {
    name: String,
    length: usize,
    fields: Vec<FieldDef>,
}

impl RecordLayout {
    /// Start building a layout. Fields are appended at the running offset.
    pub fn builder(name: &str) -> LayoutBuilder {
        LayoutBuilder {
            name: name.to_string(),
            offset: 0,
            fields: Vec::new(),
        }
    }

    /// Layout name (usually the host format name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total record length in bytes.
    pub fn length(&self) -> usize {
        self.length
    }

    /// All fields, in offset order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Builds a [`RecordLayout`] by appending fields at the running offset.
#[derive(Debug)]
pub struct LayoutBuilder {
    name: String,
    offset: usize,
    fields: Vec<FieldDef>,
}

impl LayoutBuilder {
    /// Append a field at the current offset.
    pub fn field(mut self, name: &str, kind: FieldKind) -> Self {
        let def = FieldDef {
            name: name.to_string(),
            offset: self.offset,
            kind,
        };
        self.offset = def.end();
        self.fields.push(def);
        self
    }

    /// Append a field at an explicit offset (for sparse host formats).
    /// The running offset continues after this field.
    pub fn field_at(mut self, name: &str, offset: usize, kind: FieldKind) -> Self {
        let def = FieldDef {
            name: name.to_string(),
            offset,
            kind,
        };
        self.offset = self.offset.max(def.end());
        self.fields.push(def);
        self
    }

    /// Skip reserved bytes.
    pub fn skip(mut self, bytes: usize) -> Self {
        self.offset += bytes;
        self
    }

    /// Finish, with the record length set to the running offset.
    pub fn build(self) -> RecordLayout {
        RecordLayout {
            name: self.name,
            length: self.offset,
            fields: self.fields,
        }
    }

    /// Finish with an explicit record length (host formats often reserve
    /// trailing space beyond the last declared field).
    pub fn build_with_length(self, length: usize) -> RecordLayout {
        RecordLayout {
            name: self.name,
            length: length.max(self.offset),
            fields: self.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_offsets() {
        let layout = RecordLayout::builder("FMT")
            .field("A", FieldKind::Char(10))
            .skip(2)
            .field("B", FieldKind::Bin4)
            .field("C", FieldKind::Packed { digits: 5, frac: 0 })
            .build();

        assert_eq!(layout.field("A").unwrap().offset, 0);
        assert_eq!(layout.field("B").unwrap().offset, 12);
        assert_eq!(layout.field("C").unwrap().offset, 16);
        assert_eq!(layout.length(), 19);
        assert!(layout.field("D").is_none());
    }

    #[test]
    fn explicit_offsets_and_length() {
        let layout = RecordLayout::builder("FMT")
            .field_at("LATE", 20, FieldKind::Bin2)
            .field("NEXT", FieldKind::Char(1))
            .build_with_length(64);

        assert_eq!(layout.field("LATE").unwrap().offset, 20);
        assert_eq!(layout.field("NEXT").unwrap().offset, 22);
        assert_eq!(layout.length(), 64);
    }
}
