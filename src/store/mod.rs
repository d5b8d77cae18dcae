//! Object store interface and reference backends
//!
//! The traversal and stats engines never own commit data; they consume an
//! `ObjectStore` through this narrow interface. Two backends ship with the
//! crate:
//!
//! - `memory`: in-memory store, the fixture backend for algorithm tests and
//!   a collaborator for embedders that already hold their history in memory
//! - `loose`: read-only on-disk store over zlib-compressed loose records

pub mod loose;
pub mod memory;

use crate::errors::RevGraphError;
use crate::objects::commit::CommitRecord;
use crate::objects::object_id::ObjectId;
use crate::objects::record::ObjectRecord;
use crate::objects::tree::TreeRecord;

/// Upper bound on tag-to-tag indirection when peeling to a commit.
const MAX_TAG_DEPTH: usize = 16;

/// Narrow interface over a content-addressed object store
///
/// Implementations own the backing data; callers receive owned records per
/// lookup and never retain store internals across operations.
pub trait ObjectStore {
    /// Look up a record by id. `Ok(None)` means the id is absent, which the
    /// walker treats as a broken parent link when reached through a parent
    /// edge.
    fn lookup(&self, oid: &ObjectId) -> anyhow::Result<Option<ObjectRecord>>;

    /// Cross-store existence probe. Answers presence only, not ancestry.
    fn contains(&self, oid: &ObjectId) -> bool;

    /// Resolve a symbolic revision spec (ref name, abbreviated id) to a full
    /// commit id. Fails with `RevGraphError::InvalidReference` when nothing
    /// matches.
    fn resolve(&self, spec: &str) -> anyhow::Result<ObjectId>;

    /// Look up a commit, peeling annotated tags down to their commit target.
    fn lookup_commit(&self, oid: &ObjectId) -> anyhow::Result<Option<CommitRecord>> {
        let mut current = oid.clone();

        for _ in 0..MAX_TAG_DEPTH {
            match self.lookup(&current)? {
                Some(ObjectRecord::Commit(commit)) => return Ok(Some(commit)),
                Some(ObjectRecord::Tag(tag)) => current = tag.target().clone(),
                Some(_) => return Ok(None),
                None => return Ok(None),
            }
        }

        Err(anyhow::anyhow!(
            "tag chain starting at {} exceeds {} levels",
            oid,
            MAX_TAG_DEPTH
        ))
    }

    /// Look up a tree, accepting a commit id and peeling to its snapshot.
    fn lookup_tree(&self, oid: &ObjectId) -> anyhow::Result<Option<TreeRecord>> {
        match self.lookup(oid)? {
            Some(ObjectRecord::Tree(tree)) => Ok(Some(tree)),
            Some(ObjectRecord::Commit(commit)) => {
                let tree_oid = commit.tree_oid().clone();
                self.lookup_tree(&tree_oid)
            }
            Some(ObjectRecord::Tag(tag)) => {
                let target = tag.target().clone();
                self.lookup_tree(&target)
            }
            _ => Ok(None),
        }
    }

    /// Look up a commit that a parent edge claims exists
    ///
    /// Converts absence into `RevGraphError::GraphTraversal`, the fatal
    /// mid-walk failure mode.
    fn require_commit(&self, oid: &ObjectId) -> anyhow::Result<CommitRecord> {
        self.lookup_commit(oid)?
            .ok_or_else(|| RevGraphError::GraphTraversal(oid.clone()).into())
    }
}
