//! # Host Access Seam
//!
//! Collaborator traits and shared plumbing for the OpenMidrange client
//! library. The actual RPC framing, session management, and code-page
//! tables live outside this workspace; this crate defines the surface the
//! rest of the library programs against:
//!
//! - **Transport** — [`HostTransport`]: `run_program` / `run_command`
//! - **Text** — [`TextConverter`]: fixed-length host text fields
//! - **Names** — [`QualifiedName`]: validated `LIBRARY/OBJECT` pairs
//! - **Locks** — [`LockRegistry`]: named exclusive locks serializing use of
//!   shared scratch files on the host
//! - **Bundle** — [`HostSystem`]: one connected host, `Arc`-shared by
//!   resource proxies
//!
//! ## Example
//!
//! ```rust
//! use open_midrange_access::QualifiedName;
//!
//! let name = QualifiedName::new("QGPL", "PAYROLL").unwrap();
//! assert_eq!(name.to_string(), "QGPL/PAYROLL");
//! ```

pub mod error;
pub mod lock;
pub mod message;
pub mod name;
pub mod system;
pub mod text;
pub mod transport;

pub use error::AccessError;
pub use lock::{LockGuard, LockRegistry};
pub use message::{HostMessage, Severity};
pub use name::QualifiedName;
pub use system::HostSystem;
pub use text::{PassthroughConverter, TextConverter};
pub use transport::{HostTransport, Parameter};

/// Convenience result type for host-access operations.
pub type Result<T> = std::result::Result<T, AccessError>;
