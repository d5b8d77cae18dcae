//! Ordered, filtered traversal of the commit graph
//!
//! `Frontier` carries the show/hide roots and the sorting, simplification
//! and pagination configuration for one walk. `RevisionWalker` turns a
//! frontier into a lazy sequence of commit ids. `cross_repo` builds the
//! frontier that enumerates one repository's history missing from another.

pub mod cross_repo;
pub mod frontier;
pub mod walker;

pub use cross_repo::missing_commits;
pub use frontier::{Frontier, SortMode};
pub use walker::RevisionWalker;
