//! Revision-graph traversal and per-commit diff statistics
//!
//! The crate walks a content-addressed commit graph through a narrow store
//! interface: `walk` produces ordered, filtered, lazy commit sequences,
//! `stats` computes added/deleted line counts per commit in parallel, and
//! `walk::cross_repo` enumerates the history one repository holds that
//! another does not.

pub mod diff;
pub mod errors;
pub mod merge;
pub mod objects;
pub mod stats;
pub mod store;
pub mod walk;

pub use errors::RevGraphError;
pub use objects::object_id::ObjectId;
pub use stats::{CommitStats, compute_stats};
pub use store::ObjectStore;
pub use walk::{Frontier, RevisionWalker, SortMode, missing_commits};
