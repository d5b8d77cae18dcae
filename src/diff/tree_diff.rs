//! Recursive comparison of two tree snapshots
//!
//! Produces a change set keyed by path. Subtrees are inflated through the
//! store on demand; an absent side compares as an empty tree, which is how a
//! root commit diffs against its missing parent.

use crate::diff::line_diff::{EditTotals, LineDiff};
use crate::errors::RevGraphError;
use crate::objects::object_id::ObjectId;
use crate::objects::tree::TreeEntry;
use crate::store::ObjectStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobChange {
    Added(ObjectId),
    Deleted(ObjectId),
    Modified { old: ObjectId, new: ObjectId },
}

impl BlobChange {
    fn from_entries(old: Option<&TreeEntry>, new: Option<&TreeEntry>) -> Option<Self> {
        match (old, new) {
            (None, Some(new)) => Some(BlobChange::Added(new.oid.clone())),
            (Some(old), None) => Some(BlobChange::Deleted(old.oid.clone())),
            (Some(old), Some(new)) if old.oid != new.oid => Some(BlobChange::Modified {
                old: old.oid.clone(),
                new: new.oid.clone(),
            }),
            _ => None,
        }
    }

    pub fn status_char(&self) -> char {
        match self {
            BlobChange::Added(_) => 'A',
            BlobChange::Deleted(_) => 'D',
            BlobChange::Modified { .. } => 'M',
        }
    }

    pub fn old_oid(&self) -> Option<&ObjectId> {
        match self {
            BlobChange::Deleted(oid) => Some(oid),
            BlobChange::Modified { old, .. } => Some(old),
            BlobChange::Added(_) => None,
        }
    }

    pub fn new_oid(&self) -> Option<&ObjectId> {
        match self {
            BlobChange::Added(oid) => Some(oid),
            BlobChange::Modified { new, .. } => Some(new),
            BlobChange::Deleted(_) => None,
        }
    }
}

pub type ChangeSet = BTreeMap<PathBuf, BlobChange>;
pub type TreeEntryMap = BTreeMap<String, TreeEntry>;

#[derive(Debug)]
pub struct TreeDiff<'s, S: ObjectStore> {
    store: &'s S,
    change_set: ChangeSet,
}

impl<'s, S: ObjectStore> TreeDiff<'s, S> {
    pub fn new(store: &'s S) -> Self {
        TreeDiff {
            store,
            change_set: BTreeMap::new(),
        }
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.change_set
    }

    pub fn into_changes(self) -> ChangeSet {
        self.change_set
    }

    /// Compare two snapshots by id, recursing into mismatched subtrees
    ///
    /// `None` on either side stands for the empty tree.
    pub fn compare_oids(
        &mut self,
        old: Option<&ObjectId>,
        new: Option<&ObjectId>,
        prefix: &Path,
    ) -> anyhow::Result<()> {
        if old == new {
            return Ok(());
        }

        let old_entries = self.inflate_entries(old)?;
        let new_entries = self.inflate_entries(new)?;

        self.detect_deletions(&old_entries, &new_entries, prefix)?;
        self.detect_additions(&old_entries, &new_entries, prefix)?;

        Ok(())
    }

    fn inflate_entries(&self, oid: Option<&ObjectId>) -> anyhow::Result<TreeEntryMap> {
        match oid {
            None => Ok(BTreeMap::new()),
            Some(oid) => {
                let tree = self
                    .store
                    .lookup_tree(oid)?
                    .ok_or_else(|| RevGraphError::GraphTraversal(oid.clone()))?;
                Ok(tree.entries().clone())
            }
        }
    }

    fn detect_deletions(
        &mut self,
        old: &TreeEntryMap,
        new: &TreeEntryMap,
        prefix: &Path,
    ) -> anyhow::Result<()> {
        for (name, entry) in old {
            let path = prefix.join(name);
            let other = new.get(name);

            if let Some(other) = other
                && other == entry
            {
                continue;
            }

            let old_subtree = entry.is_tree().then_some(&entry.oid);
            let new_subtree = other.filter(|other| other.is_tree()).map(|other| &other.oid);

            self.compare_oids(old_subtree, new_subtree, &path)?;

            let old_blob = (!entry.is_tree()).then_some(entry);
            let new_blob = other.filter(|other| !other.is_tree());

            if let Some(change) = BlobChange::from_entries(old_blob, new_blob) {
                self.change_set.insert(path, change);
            }
        }

        Ok(())
    }

    fn detect_additions(
        &mut self,
        old: &TreeEntryMap,
        new: &TreeEntryMap,
        prefix: &Path,
    ) -> anyhow::Result<()> {
        for (name, entry) in new {
            let path = prefix.join(name);

            if old.contains_key(name) {
                continue;
            }

            if entry.is_tree() {
                self.compare_oids(None, Some(&entry.oid), &path)?;
            } else {
                self.change_set
                    .insert(path, BlobChange::Added(entry.oid.clone()));
            }
        }

        Ok(())
    }
}

/// Line totals over every changed blob between two snapshots
///
/// Added blobs count each line as an addition, deleted blobs as a deletion,
/// modified blobs contribute their shortest edit script counts.
pub fn snapshot_totals<S: ObjectStore>(
    store: &S,
    old: Option<&ObjectId>,
    new: Option<&ObjectId>,
) -> anyhow::Result<EditTotals> {
    let mut diff = TreeDiff::new(store);
    diff.compare_oids(old, new, Path::new(""))?;

    let mut totals = EditTotals::default();

    for change in diff.into_changes().into_values() {
        let old_lines = blob_lines(store, change.old_oid())?;
        let new_lines = blob_lines(store, change.new_oid())?;
        totals.accumulate(LineDiff::new(&old_lines, &new_lines).totals());
    }

    Ok(totals)
}

fn blob_lines<S: ObjectStore>(store: &S, oid: Option<&ObjectId>) -> anyhow::Result<Vec<String>> {
    match oid {
        None => Ok(Vec::new()),
        Some(oid) => {
            let record = store
                .lookup(oid)?
                .ok_or_else(|| RevGraphError::GraphTraversal(oid.clone()))?;
            let blob = record
                .as_blob()
                .ok_or_else(|| anyhow::anyhow!("Not a blob record: {oid}"))?;
            Ok(blob.lines())
        }
    }
}
