//! Session text conversion — the opaque code-page collaborator.
//!
//! Real sessions carry code-page tables (CCSID conversion) supplied by the
//! transport layer. The library only needs two operations: decode a host
//! text field, and encode into a blank-padded fixed-length field.

use crate::error::AccessError;

/// Converts between host text fields and strings.
pub trait TextConverter: Send + Sync {
    /// Decode a host text field. Callers trim trailing blanks themselves
    /// when the field is fixed-length.
    fn decode(&self, bytes: &[u8]) -> Result<String, AccessError>;

    /// Encode into a fixed-length field, padding with the host blank.
    ///
    /// Fails with [`AccessError::TextTooLong`] when the encoded text does
    /// not fit.
    fn encode(&self, text: &str, length: usize) -> Result<Vec<u8>, AccessError>;

    /// The session's blank (pad) byte.
    fn blank(&self) -> u8;
}

/// Single-byte identity converter.
///
/// Used by tests and by sessions whose transport already converts to a
/// single-byte ASCII-compatible code page. Production sessions install a
/// converter backed by real code-page tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughConverter;

impl TextConverter for PassthroughConverter {
    fn decode(&self, bytes: &[u8]) -> Result<String, AccessError> {
        Ok(bytes.iter().map(|&b| b as char).collect())
    }

    fn encode(&self, text: &str, length: usize) -> Result<Vec<u8>, AccessError> {
        if !text.is_ascii() {
            return Err(AccessError::UnconvertibleText(text.to_string()));
        }
        if text.len() > length {
            return Err(AccessError::TextTooLong {
                text: text.to_string(),
                length,
            });
        }
        let mut out = Vec::with_capacity(length);
        out.extend_from_slice(text.as_bytes());
        out.resize(length, self.blank());
        Ok(out)
    }

    fn blank(&self) -> u8 {
        b' '
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_pads_to_length() {
        let conv = PassthroughConverter;
        assert_eq!(conv.encode("AB", 4).unwrap(), b"AB  ".to_vec());
        assert_eq!(conv.encode("", 3).unwrap(), b"   ".to_vec());
    }

    #[test]
    fn encode_rejects_overflow() {
        let conv = PassthroughConverter;
        assert!(matches!(
            conv.encode("TOOLONG", 3),
            Err(AccessError::TextTooLong { length: 3, .. })
        ));
    }

    #[test]
    fn encode_rejects_non_ascii() {
        let conv = PassthroughConverter;
        assert!(conv.encode("héllo", 10).is_err());
    }

    #[test]
    fn decode_round_trip() {
        let conv = PassthroughConverter;
        assert_eq!(conv.decode(b"PAYROLL   ").unwrap(), "PAYROLL   ");
    }
}
