//! Job proxy error types.

use thiserror::Error;

use open_midrange_access::AccessError;
use open_midrange_record::RecordError;

use crate::attribute::JobAttribute;

/// Errors produced by job operations.
#[derive(Debug, Error)]
pub enum JobError {
    /// The host does not accept change requests for this attribute.
    #[error("attribute {0:?} is read-only")]
    NotSettable(JobAttribute),

    /// The staged value's shape does not match the attribute's wire type.
    #[error("attribute {attribute:?} takes {expected} values")]
    ValueType {
        attribute: JobAttribute,
        expected: &'static str,
    },

    /// The retrieve reply did not carry an attribute it should have.
    #[error("attribute {0:?} missing from the host reply")]
    AttributeUnavailable(JobAttribute),

    /// A job name component failed validation.
    #[error("invalid job {what} '{value}'")]
    InvalidComponent { what: &'static str, value: String },

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Record(#[from] RecordError),
}
