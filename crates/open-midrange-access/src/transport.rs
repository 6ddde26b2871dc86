//! Transport trait — the opaque RPC collaborator.
//!
//! The wire framing, authentication, and session lifecycle are implemented
//! outside this workspace. Everything here programs against
//! [`HostTransport`]: a program call with positional byte parameters, and a
//! command call returning host messages.

use crate::error::AccessError;
use crate::message::HostMessage;
use crate::name::QualifiedName;

/// One positional parameter of a host program call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    /// Bytes sent to the program.
    Input(Vec<u8>),
    /// Buffer the program fills. `data` is empty until the call returns,
    /// after which it holds exactly `capacity` bytes.
    Output { capacity: usize, data: Vec<u8> },
    /// Bytes sent and overwritten in place by the program.
    InOut(Vec<u8>),
}

impl Parameter {
    /// An input parameter.
    pub fn input(data: impl Into<Vec<u8>>) -> Self {
        Parameter::Input(data.into())
    }

    /// An output parameter with the given capacity.
    pub fn output(capacity: usize) -> Self {
        Parameter::Output {
            capacity,
            data: Vec::new(),
        }
    }

    /// Bytes returned by the program for this parameter.
    ///
    /// Empty for input parameters and for output parameters the transport
    /// has not yet filled.
    pub fn output_data(&self) -> &[u8] {
        match self {
            Parameter::Input(_) => &[],
            Parameter::Output { data, .. } => data,
            Parameter::InOut(data) => data,
        }
    }
}

/// The opaque host RPC service.
///
/// A transport represents one connected session. Implementations fill every
/// `Output` parameter to its declared capacity on success, and surface the
/// host's escape messages through [`AccessError::ProgramFailed`] /
/// [`AccessError::CommandFailed`] on failure.
pub trait HostTransport: Send {
    /// Call a host program with positional parameters.
    fn run_program(
        &mut self,
        program: &QualifiedName,
        parameters: &mut [Parameter],
    ) -> Result<(), AccessError>;

    /// Run a host CL command, returning the messages it produced.
    fn run_command(&mut self, text: &str) -> Result<Vec<HostMessage>, AccessError>;
}
