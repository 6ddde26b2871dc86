//! # Remote Job Proxies
//!
//! The job-attribute proxy: fronts one job on a connected host, reading
//! attributes through the retrieve-job-information formats and writing
//! them through batched change-job requests.
//!
//! Reads are lazy and grouped — touching one attribute fetches its whole
//! format group and memoizes everything the reply carries. Writes stage
//! locally in a [`ChangeSet`] and flush in a single host call.
//!
//! - [`Job`] — the proxy: lazy reads, staged writes, hold/release/end
//! - [`JobAttribute`] — the attribute catalog and format dispatcher
//! - [`JobIdentity`] — qualified, internal, or current-job addressing
//! - [`FormatGroup`] — the retrieve formats and their reply layouts
//!
//! ```no_run
//! use std::sync::Arc;
//! use open_midrange_access::HostSystem;
//! use open_midrange_job::{Job, JobAttribute, JobIdentity};
//!
//! fn tune(system: Arc<HostSystem>) -> open_midrange_job::Result<()> {
//!     let job = Job::new(system, JobIdentity::qualified("BATCH01", "QPGMR", "123456")?);
//!     println!("{} runs at priority {}", job.name()?, job.run_priority()?);
//!     job.set_int(JobAttribute::RunPriority, 50)?;
//!     job.set_int(JobAttribute::TimeSlice, 1000)?;
//!     job.commit()?;
//!     Ok(())
//! }
//! ```

pub mod attribute;
pub mod change;
pub mod error;
pub mod format;
pub mod identity;
pub mod job;

pub use attribute::JobAttribute;
pub use change::ChangeSet;
pub use error::JobError;
pub use format::{reply_capacity, FormatGroup};
pub use identity::JobIdentity;
pub use job::{EndMode, Job};

/// Convenience result type for job operations.
pub type Result<T> = std::result::Result<T, JobError>;
