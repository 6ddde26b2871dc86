//! # Fixed-Layout Host Records
//!
//! The private host protocol answers most inquiries with fixed-layout
//! binary records: every field lives at a known offset with a known length
//! and host data type. This crate provides the pieces the rest of the
//! library builds on:
//!
//! - **Layouts** — [`RecordLayout`] tables mapping symbolic field names to
//!   `(offset, length, type)`
//! - **Field types** — [`FieldKind`]: character, big-endian binary, packed
//!   decimal, zoned decimal, and hex fields
//! - **Decoding** — [`RecordDecoder`] walks a byte buffer field-by-field
//! - **Encoding** — [`RecordBuilder`] assembles a request buffer from named
//!   values
//!
//! ## Example
//!
//! ```rust
//! use open_midrange_access::PassthroughConverter;
//! use open_midrange_record::{FieldKind, RecordDecoder, RecordLayout};
//!
//! let layout = RecordLayout::builder("HDR")
//!     .field("NAME", FieldKind::Char(6))
//!     .field("COUNT", FieldKind::Bin4)
//!     .build();
//!
//! let data = [b'J', b'O', b'B', b' ', b' ', b' ', 0, 0, 0, 7];
//! let converter = PassthroughConverter;
//! let decoder = RecordDecoder::new(&layout, &data, &converter);
//! assert_eq!(decoder.text("NAME").unwrap(), "JOB");
//! assert_eq!(decoder.int("COUNT").unwrap(), 7);
//! ```

pub mod build;
pub mod decimal;
pub mod decode;
pub mod error;
pub mod field;
pub mod layout;

pub use build::RecordBuilder;
pub use decimal::{pack_decimal, unpack_decimal, unzone_decimal, zone_decimal, Sign};
pub use decode::RecordDecoder;
pub use error::RecordError;
pub use field::{kind_from_type_code, FieldKind, FieldValue};
pub use layout::{FieldDef, LayoutBuilder, RecordLayout};

/// Convenience result type for record operations.
pub type Result<T> = std::result::Result<T, RecordError>;
