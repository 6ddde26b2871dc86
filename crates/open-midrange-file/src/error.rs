//! File-description error types.

use thiserror::Error;

use open_midrange_access::AccessError;
use open_midrange_record::RecordError;

/// Errors produced while retrieving or translating file descriptions.
#[derive(Debug, Error)]
pub enum FileError {
    /// The host returned no record formats for the file.
    #[error("file {file} has no record formats")]
    NoFormats { file: String },

    /// A list reply claimed more entries than its buffer holds.
    #[error("list output for {list} truncated: {expected} entries of {entry_size} bytes, {actual} bytes of data")]
    ListTruncated {
        list: String,
        expected: usize,
        entry_size: usize,
        actual: usize,
    },

    /// The named format does not exist in the file.
    #[error("file {file} has no format named {format}")]
    UnknownFormat { file: String, format: String },

    /// Host access failed.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// A list entry could not be parsed.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Writing generated source failed.
    #[error("writing generated source: {0}")]
    Io(#[from] std::io::Error),
}
