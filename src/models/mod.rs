//! Value objects returned by the panel core.
//!
//! Every entity is built per request and serialized with camelCase field
//! names for the binding layer.
//! - `status`: FileStatus, StatusCode
//! - `branch`: BranchInfo
//! - `commit`: CommitInfo, CommitFilter
//! - `diff`: FileDiff, DiffStats
//! - `revision`: Revision (working tree / index / HEAD)

pub mod branch;
pub mod commit;
pub mod diff;
pub mod revision;
pub mod status;

pub use branch::*;
pub use commit::*;
pub use diff::*;
pub use revision::*;
pub use status::*;
