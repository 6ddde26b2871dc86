//! One connected host system.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

use crate::error::AccessError;
use crate::lock::LockRegistry;
use crate::message::HostMessage;
use crate::name::QualifiedName;
use crate::text::TextConverter;
use crate::transport::{HostTransport, Parameter};

/// Bundles the transport, the session text converter, and the scratch-lock
/// registry for one connected host. Resource proxies share it via `Arc`.
///
/// Calls through the transport are serialized; the private protocol allows
/// one in-flight request per session.
pub struct HostSystem {
    transport: Mutex<Box<dyn HostTransport>>,
    converter: Arc<dyn TextConverter>,
    locks: LockRegistry,
}

impl HostSystem {
    /// Bundle a transport and converter into a shared system handle.
    pub fn new(
        transport: Box<dyn HostTransport>,
        converter: Arc<dyn TextConverter>,
    ) -> Arc<Self> {
        Arc::new(Self {
            transport: Mutex::new(transport),
            converter,
            locks: LockRegistry::new(),
        })
    }

    /// Call a host program.
    pub fn run_program(
        &self,
        program: &QualifiedName,
        parameters: &mut [Parameter],
    ) -> Result<(), AccessError> {
        debug!(program = %program, parameters = parameters.len(), "program call");
        self.transport.lock().run_program(program, parameters)
    }

    /// Run a host CL command.
    pub fn run_command(&self, text: &str) -> Result<Vec<HostMessage>, AccessError> {
        debug!(command = text, "command call");
        self.transport.lock().run_command(text)
    }

    /// The session text converter.
    pub fn converter(&self) -> &Arc<dyn TextConverter> {
        &self.converter
    }

    /// The scratch-resource lock registry.
    pub fn locks(&self) -> &LockRegistry {
        &self.locks
    }
}

impl std::fmt::Debug for HostSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostSystem").finish_non_exhaustive()
    }
}
