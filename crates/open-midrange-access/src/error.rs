//! Host-access error types.

use thiserror::Error;

use crate::message::HostMessage;

/// Errors produced by host-access operations.
#[derive(Debug, Error)]
pub enum AccessError {
    /// A host program call ended with escape messages.
    #[error("program {program} failed: {}", first_message(messages))]
    ProgramFailed {
        program: String,
        messages: Vec<HostMessage>,
    },

    /// A host command ended with escape messages.
    #[error("command '{command}' failed: {}", first_message(messages))]
    CommandFailed {
        command: String,
        messages: Vec<HostMessage>,
    },

    /// An object name failed validation.
    #[error("invalid object name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Text could not be converted for the session's code page.
    #[error("unconvertible text: {0}")]
    UnconvertibleText(String),

    /// Text does not fit the target fixed-length field.
    #[error("text '{text}' exceeds field length {length}")]
    TextTooLong { text: String, length: usize },

    /// The transport connection is gone.
    #[error("connection lost: {0}")]
    ConnectionLost(String),
}

fn first_message(messages: &[HostMessage]) -> String {
    messages
        .first()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "no messages returned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Severity;

    #[test]
    fn program_error_shows_first_message() {
        let err = AccessError::ProgramFailed {
            program: "QSYS/QUSRJOBI".to_string(),
            messages: vec![HostMessage::new("CPF3C21", "Format name not valid", Severity::Error)],
        };
        let text = err.to_string();
        assert!(text.contains("QUSRJOBI"));
        assert!(text.contains("CPF3C21"));
    }

    #[test]
    fn program_error_without_messages() {
        let err = AccessError::ProgramFailed {
            program: "QSYS/QWTCHGJB".to_string(),
            messages: vec![],
        };
        assert!(err.to_string().contains("no messages returned"));
    }
}
