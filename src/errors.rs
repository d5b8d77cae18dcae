//! Error kinds surfaced by the traversal and stats engines
//!
//! All fallible APIs in this crate return `anyhow::Result`; the variants here
//! are attached as the root cause so callers can match on a specific failure
//! with `err.downcast_ref::<RevGraphError>()` while intermediate layers keep
//! adding context freely.

use crate::objects::object_id::ObjectId;

#[derive(Debug, thiserror::Error)]
pub enum RevGraphError {
    /// A revision spec could not be resolved to a commit id.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// A `"A..B"` range expression was malformed.
    #[error("invalid range spec: {0}")]
    InvalidRangeSpec(String),

    /// A parent link pointed at an id the store cannot produce. Fatal to the
    /// walk that hit it; already-emitted ids remain valid.
    #[error("broken parent link: commit {0} is unreachable in the store")]
    GraphTraversal(ObjectId),

    /// A store or diff failure inside the stats stage. Fatal to the whole
    /// batch; no partial results are returned.
    #[error("diff computation failed for commit {oid}: {message}")]
    DiffComputation { oid: ObjectId, message: String },

    /// A worker thread could not be started.
    #[error("failed to start stats worker")]
    PoolScheduling(#[source] std::io::Error),
}
