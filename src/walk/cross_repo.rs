//! History difference between two independently-addressed repositories
//!
//! Answers "which commits reachable from a tip in one repository are missing
//! from another" without a shared graph: content hashes are the only bridge
//! between the two stores.

use crate::merge::merge_base;
use crate::objects::object_id::ObjectId;
use crate::store::ObjectStore;
use crate::walk::frontier::SortMode;
use crate::walk::walker::RevisionWalker;

/// Commits reachable from `remote_tip` in `remote` that are not covered by
/// `local_tip`'s lineage, newest first
///
/// The first-parent chain of `local_tip` (the tip itself included) is probed
/// against the remote store until an id is found to exist there. Existence
/// is a weaker test than ancestry, a hash can be present through an
/// unrelated branch, so the found point is refined to the merge base with
/// `remote_tip` inside the remote graph and that base anchors the hide.
/// When the chain exhausts without a hit, or no merge base exists, there is
/// no common history and every ancestor of `remote_tip` is returned.
pub fn missing_commits<L: ObjectStore, R: ObjectStore>(
    local: &L,
    local_tip: &ObjectId,
    remote: &R,
    remote_tip: &ObjectId,
) -> anyhow::Result<Vec<ObjectId>> {
    let mut probe = Some(local_tip.clone());
    let mut shared = None;

    while let Some(oid) = probe {
        if remote.contains(&oid) {
            shared = Some(oid);
            break;
        }
        let commit = local.require_commit(&oid)?;
        probe = commit.first_parent().cloned();
    }

    let base = match shared {
        Some(shared) => merge_base(remote, &shared, remote_tip)?,
        None => None,
    };

    let mut walker = RevisionWalker::new(remote);
    walker.sorting(SortMode::TIME);
    walker.push_id(remote_tip.clone());
    if let Some(base) = base {
        walker.hide_id(base);
    }

    walker.collect()
}
