//! # Remote File Descriptions
//!
//! The record-format translator: asks the host to list a file's record
//! formats and fields, parses the fixed-layout list output, and builds
//! [`RecordFormat`] schema objects a program can use to decode that file's
//! data — or emits Rust source declaring the same layout.
//!
//! Retrieval goes through a shared scratch user space on the host, so the
//! flow serializes on a named lock, clears and recreates the space, drives
//! the list programs, and pulls the list contents back in fixed-layout
//! entries.
//!
//! - [`FileDescription::retrieve`] — fetch every format of a file
//! - [`RecordFormat::to_layout`] — lower a schema to a decodable layout
//! - [`emit_source`] — generate Rust source for a format
//! - [`DescriptionCache`] — flat memo of retrieved descriptions

pub mod cache;
pub mod describe;
pub mod error;
pub mod format;
pub mod source;

pub use cache::DescriptionCache;
pub use describe::FileDescription;
pub use error::FileError;
pub use format::{FieldDescription, RecordFormat};
pub use source::{emit_source, write_source};

/// Convenience result type for file-description operations.
pub type Result<T> = std::result::Result<T, FileError>;
