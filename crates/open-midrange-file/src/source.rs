//! Rust source emission for retrieved formats.
//!
//! The other half of the translator: instead of holding the schema in
//! memory, freeze it into a generated module so a program can decode the
//! file without a description round-trip at startup.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use open_midrange_record::FieldKind;

use crate::format::RecordFormat;
use crate::Result;

/// Render a format as a Rust module declaring its layout table.
pub fn emit_source(format: &RecordFormat) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "//! Record format {} of {}.", format.name, format.file);
    if !format.text.is_empty() {
        let _ = writeln!(out, "//!");
        let _ = writeln!(out, "//! {}", format.text);
    }
    let _ = writeln!(out, "//!");
    let _ = writeln!(out, "//! Generated from the host file description; do not edit.");
    let _ = writeln!(out);
    let _ = writeln!(out, "use std::sync::LazyLock;");
    let _ = writeln!(out);
    let _ = writeln!(out, "use open_midrange_record::{{FieldKind, RecordLayout}};");
    let _ = writeln!(out);

    let key_names: Vec<String> = format
        .key_fields()
        .iter()
        .map(|f| format!("\"{}\"", f.name))
        .collect();
    let _ = writeln!(out, "/// Key fields, in key sequence order.");
    let _ = writeln!(
        out,
        "pub const KEY_FIELDS: &[&str] = &[{}];",
        key_names.join(", ")
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "/// Layout of one {} record.", format.name);
    let _ = writeln!(
        out,
        "pub static {}: LazyLock<RecordLayout> = LazyLock::new(|| {{",
        format.name
    );
    let _ = writeln!(out, "    RecordLayout::builder(\"{}\")", format.name);
    for field in &format.fields {
        let _ = writeln!(
            out,
            "        .field_at(\"{}\", {}, {})",
            field.name,
            field.buffer_offset,
            render_kind(&field.kind)
        );
    }
    let _ = writeln!(out, "        .build_with_length({})", format.record_length);
    let _ = writeln!(out, "}});");
    out
}

/// Emit the format's source into `dir`, named after the format.
///
/// Returns the path written.
pub fn write_source(format: &RecordFormat, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("{}.rs", format.name.to_ascii_lowercase()));
    std::fs::write(&path, emit_source(format))?;
    Ok(path)
}

fn render_kind(kind: &FieldKind) -> String {
    match *kind {
        FieldKind::Char(len) => format!("FieldKind::Char({len})"),
        FieldKind::Hex(len) => format!("FieldKind::Hex({len})"),
        FieldKind::Bin2 => "FieldKind::Bin2".to_string(),
        FieldKind::Bin4 => "FieldKind::Bin4".to_string(),
        FieldKind::Bin8 => "FieldKind::Bin8".to_string(),
        FieldKind::UBin2 => "FieldKind::UBin2".to_string(),
        FieldKind::UBin4 => "FieldKind::UBin4".to_string(),
        FieldKind::Packed { digits, frac } => {
            format!("FieldKind::Packed {{ digits: {digits}, frac: {frac} }}")
        }
        FieldKind::Zoned { digits, frac } => {
            format!("FieldKind::Zoned {{ digits: {digits}, frac: {frac} }}")
        }
    }
}
