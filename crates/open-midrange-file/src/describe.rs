//! Retrieves file descriptions through the host list programs.
//!
//! The host materializes list output into a user space — a shared scratch
//! object. The flow is:
//!
//! 1. take the scratch lock (one list at a time per process),
//! 2. delete and recreate the scratch space,
//! 3. `QUSLRCD` — list the file's record formats into the space,
//! 4. `QUSRTVUS` — pull the generic list header, then the entries,
//! 5. `QUSLFLD` per format — list its fields the same way,
//! 6. translate the rows into [`RecordFormat`] schema objects.

use std::sync::LazyLock;
use tracing::{debug, trace};

use open_midrange_access::{HostSystem, Parameter, QualifiedName};
use open_midrange_record::{kind_from_type_code, FieldKind, RecordDecoder, RecordLayout};

use crate::error::FileError;
use crate::format::{FieldDescription, RecordFormat};
use crate::Result;

/// Scratch user space (in the host's job-temporary library) and the process
/// lock name serializing its use.
const SCRATCH_SPACE: &str = "QOMFDLIST";
const SCRATCH_LIBRARY: &str = "QTEMP";

/// List API format names.
const FORMAT_LIST_FORMAT: &str = "RCDL0100";
const FIELD_LIST_FORMAT: &str = "FLDL0100";

/// Generic user-space list header. Only the list-data section matters here.
static LIST_HEADER: LazyLock<RecordLayout> = LazyLock::new(|| {
    RecordLayout::builder("USHDR")
        .field_at("LIST_OFFSET", 124, FieldKind::Bin4)
        .field_at("LIST_SIZE", 128, FieldKind::Bin4)
        .field_at("ENTRY_COUNT", 132, FieldKind::Bin4)
        .field_at("ENTRY_SIZE", 136, FieldKind::Bin4)
        .build_with_length(140)
});

/// One record-format list entry (`RCDL0100`).
static FORMAT_ENTRY: LazyLock<RecordLayout> = LazyLock::new(|| {
    RecordLayout::builder(FORMAT_LIST_FORMAT)
        .field("FORMAT_NAME", FieldKind::Char(10))
        .skip(2)
        .field("RECORD_LENGTH", FieldKind::Bin4)
        .field("FIELD_COUNT", FieldKind::Bin4)
        .field("TEXT", FieldKind::Char(50))
        .build_with_length(72)
});

/// One field list entry (`FLDL0100`).
static FIELD_ENTRY: LazyLock<RecordLayout> = LazyLock::new(|| {
    RecordLayout::builder(FIELD_LIST_FORMAT)
        .field("FIELD_NAME", FieldKind::Char(10))
        .field("TYPE_CODE", FieldKind::Char(1))
        .field("USE_CODE", FieldKind::Char(1))
        .field("BUFFER_OFFSET", FieldKind::Bin4)
        .field("BUFFER_LENGTH", FieldKind::Bin4)
        .field("DIGITS", FieldKind::Bin4)
        .field("DECIMALS", FieldKind::Bin4)
        .field("KEY_SEQUENCE", FieldKind::Bin4)
        .field("TEXT", FieldKind::Char(50))
        .build_with_length(84)
});

/// Entry point for file-description retrieval.
pub struct FileDescription;

impl FileDescription {
    /// Retrieve every record format of `file`, in host list order.
    pub fn retrieve(system: &HostSystem, file: &QualifiedName) -> Result<Vec<RecordFormat>> {
        let _guard = system.locks().acquire(SCRATCH_SPACE);
        debug!(file = %file, "retrieving file description");

        prepare_scratch_space(system)?;
        list_record_formats(system, file)?;
        let (data, count, entry_size) = read_list(system, FORMAT_LIST_FORMAT)?;
        if count == 0 {
            return Err(FileError::NoFormats {
                file: file.to_string(),
            });
        }

        let converter = system.converter().clone();
        let mut headers = Vec::with_capacity(count);
        for i in 0..count {
            let entry = &data[i * entry_size..(i + 1) * entry_size];
            let decoder = RecordDecoder::new(&FORMAT_ENTRY, entry, converter.as_ref());
            headers.push((
                decoder.text("FORMAT_NAME")?,
                decoder.int("RECORD_LENGTH")? as usize,
                decoder.text("TEXT")?,
            ));
        }

        let mut formats = Vec::with_capacity(headers.len());
        for (name, record_length, text) in headers {
            let fields = retrieve_fields(system, file, &name)?;
            trace!(format = name.as_str(), fields = fields.len(), "format translated");
            formats.push(RecordFormat {
                name,
                file: file.clone(),
                text,
                record_length,
                fields,
            });
        }
        Ok(formats)
    }

    /// Retrieve one named format of `file`.
    pub fn retrieve_format(
        system: &HostSystem,
        file: &QualifiedName,
        format: &str,
    ) -> Result<RecordFormat> {
        let formats = Self::retrieve(system, file)?;
        formats
            .into_iter()
            .find(|f| f.name == format)
            .ok_or_else(|| FileError::UnknownFormat {
                file: file.to_string(),
                format: format.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
//  Host call plumbing
// ---------------------------------------------------------------------------

fn qsys(program: &str) -> Result<QualifiedName> {
    Ok(QualifiedName::new("QSYS", program)?)
}

/// The 20-byte qualified-object parameter: object then library.
fn qualified_param(system: &HostSystem, object: &str, library: &str) -> Result<Vec<u8>> {
    let converter = system.converter();
    let mut out = converter.encode(object, 10)?;
    out.extend(converter.encode(library, 10)?);
    Ok(out)
}

/// Delete any stale scratch space and create a fresh one.
fn prepare_scratch_space(system: &HostSystem) -> Result<()> {
    let delete = format!("DLTUSRSPC USRSPC({SCRATCH_LIBRARY}/{SCRATCH_SPACE})");
    match system.run_command(&delete) {
        Ok(_) => {}
        Err(open_midrange_access::AccessError::CommandFailed { messages, .. })
            if messages.first().is_some_and(|m| m.id == "CPF2105") =>
        {
            // Nothing to delete on first use.
            trace!("scratch space did not exist");
        }
        Err(err) => return Err(err.into()),
    }

    let converter = system.converter();
    let mut params = vec![
        Parameter::input(qualified_param(system, SCRATCH_SPACE, SCRATCH_LIBRARY)?),
        Parameter::input(converter.encode("LSTOUT", 10)?),
        Parameter::input(65536i32.to_be_bytes().to_vec()),
        Parameter::input(vec![0x00]),
        Parameter::input(converter.encode("*ALL", 10)?),
        Parameter::input(converter.encode("File description list", 50)?),
    ];
    system.run_program(&qsys("QUSCRTUS")?, &mut params)?;
    Ok(())
}

/// List the file's record formats into the scratch space.
fn list_record_formats(system: &HostSystem, file: &QualifiedName) -> Result<()> {
    let converter = system.converter();
    let mut params = vec![
        Parameter::input(qualified_param(system, SCRATCH_SPACE, SCRATCH_LIBRARY)?),
        Parameter::input(converter.encode(FORMAT_LIST_FORMAT, 8)?),
        Parameter::input(qualified_param(system, file.object(), file.library())?),
        Parameter::input(converter.encode("0", 1)?),
    ];
    system.run_program(&qsys("QUSLRCD")?, &mut params)?;
    Ok(())
}

/// List one format's fields into the scratch space and translate the rows.
fn retrieve_fields(
    system: &HostSystem,
    file: &QualifiedName,
    format: &str,
) -> Result<Vec<FieldDescription>> {
    let converter = system.converter();
    let mut params = vec![
        Parameter::input(qualified_param(system, SCRATCH_SPACE, SCRATCH_LIBRARY)?),
        Parameter::input(converter.encode(FIELD_LIST_FORMAT, 8)?),
        Parameter::input(qualified_param(system, file.object(), file.library())?),
        Parameter::input(converter.encode(format, 10)?),
        Parameter::input(converter.encode("0", 1)?),
    ];
    system.run_program(&qsys("QUSLFLD")?, &mut params)?;

    let (data, count, entry_size) = read_list(system, FIELD_LIST_FORMAT)?;
    let mut fields = Vec::with_capacity(count);
    for i in 0..count {
        let entry = &data[i * entry_size..(i + 1) * entry_size];
        let decoder = RecordDecoder::new(&FIELD_ENTRY, entry, converter.as_ref());

        let type_code = decoder.text("TYPE_CODE")?.chars().next().unwrap_or(' ');
        let kind = kind_from_type_code(
            type_code,
            decoder.int("BUFFER_LENGTH")? as u32,
            decoder.int("DIGITS")? as u32,
            decoder.int("DECIMALS")? as u32,
        )?;
        let key_sequence = match decoder.int("KEY_SEQUENCE")? {
            0 => None,
            n => Some(n as u32),
        };
        fields.push(FieldDescription {
            name: decoder.text("FIELD_NAME")?,
            kind,
            text: decoder.text("TEXT")?,
            buffer_offset: decoder.int("BUFFER_OFFSET")? as usize,
            key_sequence,
        });
    }
    Ok(fields)
}

/// Pull the generic list header, validate it, then pull the entries.
fn read_list(system: &HostSystem, list: &str) -> Result<(Vec<u8>, usize, usize)> {
    let header = retrieve_space(system, 0, LIST_HEADER.length())?;
    let converter = system.converter();
    let decoder = RecordDecoder::new(&LIST_HEADER, &header, converter.as_ref());

    let list_offset = decoder.int("LIST_OFFSET")? as usize;
    let list_size = decoder.int("LIST_SIZE")? as usize;
    let entry_count = decoder.int("ENTRY_COUNT")? as usize;
    let entry_size = decoder.int("ENTRY_SIZE")? as usize;

    if entry_count
        .checked_mul(entry_size)
        .is_none_or(|needed| needed > list_size)
    {
        return Err(FileError::ListTruncated {
            list: list.to_string(),
            expected: entry_count,
            entry_size,
            actual: list_size,
        });
    }

    let data = retrieve_space(system, list_offset, entry_count * entry_size)?;
    trace!(list, entries = entry_count, entry_size, "list retrieved");
    Ok((data, entry_count, entry_size))
}

/// `QUSRTVUS` — retrieve `length` bytes of the scratch space starting at
/// the 0-based `offset` (the wire position is 1-based).
fn retrieve_space(system: &HostSystem, offset: usize, length: usize) -> Result<Vec<u8>> {
    let mut params = vec![
        Parameter::input(qualified_param(system, SCRATCH_SPACE, SCRATCH_LIBRARY)?),
        Parameter::input((offset as i32 + 1).to_be_bytes().to_vec()),
        Parameter::input((length as i32).to_be_bytes().to_vec()),
        Parameter::output(length),
    ];
    system.run_program(&qsys("QUSRTVUS")?, &mut params)?;
    Ok(params[3].output_data().to_vec())
}
