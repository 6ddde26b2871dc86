//! How a job is addressed on retrieve and change calls.

use serde::{Deserialize, Serialize};
use std::fmt;

use open_midrange_access::TextConverter;

use crate::error::JobError;
use crate::Result;

/// Length of the qualified job name parameter (name, user, number).
pub const QUALIFIED_LEN: usize = 26;

/// Length of the internal job identifier parameter.
pub const INTERNAL_ID_LEN: usize = 16;

/// The three ways the host addresses a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobIdentity {
    /// `number/user/name`, the form commands accept.
    Qualified {
        name: String,
        user: String,
        number: String,
    },
    /// The opaque 16-byte identifier a retrieve reply carries. Faster to
    /// resolve host-side than the qualified form.
    Internal([u8; INTERNAL_ID_LEN]),
    /// The job this session itself runs in.
    Current,
}

impl JobIdentity {
    /// A validated qualified identity. Parts are stored uppercased; the
    /// number must be exactly six digits.
    pub fn qualified(name: &str, user: &str, number: &str) -> Result<Self> {
        let name = component("name", name)?;
        let user = component("user", user)?;
        let number = number.trim().to_string();
        if number.len() != 6 || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(JobError::InvalidComponent {
                what: "number",
                value: number,
            });
        }
        Ok(JobIdentity::Qualified { name, user, number })
    }

    /// Address a job by its internal identifier.
    pub fn internal(id: [u8; INTERNAL_ID_LEN]) -> Self {
        JobIdentity::Internal(id)
    }

    /// The qualified and internal-identifier call parameters for this
    /// identity. Whichever form is unused is sent as the special value the
    /// host expects (`*INT` name, blank identifier).
    pub fn to_parameters(&self, converter: &dyn TextConverter) -> Result<(Vec<u8>, Vec<u8>)> {
        let mut qualified = Vec::with_capacity(QUALIFIED_LEN);
        let internal;
        match self {
            JobIdentity::Qualified { name, user, number } => {
                qualified.extend_from_slice(&converter.encode(name, 10)?);
                qualified.extend_from_slice(&converter.encode(user, 10)?);
                qualified.extend_from_slice(&converter.encode(number, 6)?);
                internal = vec![converter.blank(); INTERNAL_ID_LEN];
            }
            JobIdentity::Internal(id) => {
                qualified.extend_from_slice(&converter.encode("*INT", 10)?);
                qualified.extend_from_slice(&converter.encode("", 10)?);
                qualified.extend_from_slice(&converter.encode("", 6)?);
                internal = id.to_vec();
            }
            JobIdentity::Current => {
                qualified.extend_from_slice(&converter.encode("*", 10)?);
                qualified.extend_from_slice(&converter.encode("", 10)?);
                qualified.extend_from_slice(&converter.encode("", 6)?);
                internal = vec![converter.blank(); INTERNAL_ID_LEN];
            }
        }
        Ok((qualified, internal))
    }
}

impl fmt::Display for JobIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobIdentity::Qualified { name, user, number } => {
                write!(f, "{number}/{user}/{name}")
            }
            JobIdentity::Internal(id) => {
                write!(f, "*INT:")?;
                for byte in id {
                    write!(f, "{byte:02X}")?;
                }
                Ok(())
            }
            JobIdentity::Current => write!(f, "*"),
        }
    }
}

fn component(what: &'static str, value: &str) -> Result<String> {
    let value = value.trim().to_ascii_uppercase();
    if value.is_empty() || value.len() > 10 || value.contains(' ') {
        return Err(JobError::InvalidComponent { what, value });
    }
    Ok(value)
}
