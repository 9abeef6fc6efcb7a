//! Technology file cache
//!
//! Tarball-backed technologies are extracted into a per-technology cache
//! directory on first use and reused afterwards.
//!
//! # Layout
//!
//! | Path | Contents |
//! |------|----------|
//! | `<cache>/extracted/<tarball>` | Extracted archive |
//! | `<cache>/extracted/.<tarball>.partial-<pid>` | Extraction in progress |
//! | `<cache>/markers/<tarball>.complete` | Written once extraction finished |
//!
//! # Extraction States
//!
//! | State | Target dir | Marker | Next use |
//! |-------|------------|--------|----------|
//! | Missing | no | - | extract to staging, rename into place |
//! | Incomplete | yes | no | write marker, reuse |
//! | Complete | yes | yes | reuse |

pub mod archive;
pub mod tools;

pub use archive::{ArchiveCache, ExtractionState};
pub use tools::{ArchiveTool, SystemArchiveTool};
