//! Qualified object names (`LIBRARY/OBJECT`).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AccessError;

/// A library-qualified host object name.
///
/// Both parts are 1-10 characters, stored uppercased. Special values
/// beginning with `*` (e.g. `*LIBL`, `*CURLIB`) are accepted for the
/// library part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    library: String,
    object: String,
}

impl QualifiedName {
    /// Create and validate a qualified name.
    pub fn new(library: &str, object: &str) -> Result<Self, AccessError> {
        let library = library.trim().to_ascii_uppercase();
        let object = object.trim().to_ascii_uppercase();
        validate_part(&library, true)?;
        validate_part(&object, false)?;
        Ok(Self { library, object })
    }

    /// The library part.
    pub fn library(&self) -> &str {
        &self.library
    }

    /// The object part.
    pub fn object(&self) -> &str {
        &self.object
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.library, self.object)
    }
}

fn validate_part(part: &str, allow_special: bool) -> Result<(), AccessError> {
    if part.is_empty() || part.len() > 10 {
        return Err(AccessError::InvalidName {
            name: part.to_string(),
            reason: format!("must be 1-10 characters, got {}", part.len()),
        });
    }
    if part.starts_with('*') {
        if allow_special {
            return Ok(());
        }
        return Err(AccessError::InvalidName {
            name: part.to_string(),
            reason: "special values are not valid here".to_string(),
        });
    }
    let mut chars = part.chars();
    let first = chars.next().unwrap_or(' ');
    if !(first.is_ascii_uppercase() || first == '$' || first == '#' || first == '@') {
        return Err(AccessError::InvalidName {
            name: part.to_string(),
            reason: format!("invalid leading character '{first}'"),
        });
    }
    for c in chars {
        if !(c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '$' | '#' | '@' | '_' | '.')) {
            return Err(AccessError::InvalidName {
                name: part.to_string(),
                reason: format!("invalid character '{c}'"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_uppercases() {
        let name = QualifiedName::new("qgpl", "payroll").unwrap();
        assert_eq!(name.library(), "QGPL");
        assert_eq!(name.object(), "PAYROLL");
        assert_eq!(name.to_string(), "QGPL/PAYROLL");
    }

    #[test]
    fn special_library_values() {
        assert!(QualifiedName::new("*LIBL", "PAYROLL").is_ok());
        assert!(QualifiedName::new("*CURLIB", "PAYROLL").is_ok());
        assert!(QualifiedName::new("QGPL", "*ALL").is_err());
    }

    #[test]
    fn rejects_bad_lengths() {
        assert!(QualifiedName::new("", "PAYROLL").is_err());
        assert!(QualifiedName::new("TOOLONGLIBR", "PAYROLL").is_err());
    }

    #[test]
    fn rejects_bad_characters() {
        assert!(QualifiedName::new("QGPL", "PAY ROLL").is_err());
        assert!(QualifiedName::new("1GPL", "PAYROLL").is_err());
        assert!(QualifiedName::new("$GPL", "PAY#01").is_ok());
    }
}
