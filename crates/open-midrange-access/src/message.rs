//! Host messages returned by program and command calls.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message severity, collapsed from the host's 0-99 severity codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Informational / completion message.
    Info,
    /// Diagnostic message; the operation may still have completed.
    Warning,
    /// Escape message; the operation did not complete.
    Error,
}

impl Severity {
    /// Collapse a host severity code (0-99) into a level.
    pub fn from_code(code: u8) -> Self {
        match code {
            0..=9 => Severity::Info,
            10..=29 => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// One message produced by a host call (e.g. `CPF3C21`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostMessage {
    /// Seven-character message identifier.
    pub id: String,
    /// First-level message text.
    pub text: String,
    /// Collapsed severity.
    pub severity: Severity,
}

impl HostMessage {
    /// Create a message.
    pub fn new(id: &str, text: &str, severity: Severity) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            severity,
        }
    }

    /// Returns `true` for escape-level messages.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for HostMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_collapses_host_codes() {
        assert_eq!(Severity::from_code(0), Severity::Info);
        assert_eq!(Severity::from_code(10), Severity::Warning);
        assert_eq!(Severity::from_code(29), Severity::Warning);
        assert_eq!(Severity::from_code(30), Severity::Error);
        assert_eq!(Severity::from_code(99), Severity::Error);
    }

    #[test]
    fn message_display() {
        let msg = HostMessage::new("CPF1070", "Job not found", Severity::Error);
        assert_eq!(msg.to_string(), "CPF1070: Job not found");
        assert!(msg.is_error());
    }
}
