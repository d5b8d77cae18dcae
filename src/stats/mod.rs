//! Per-commit line statistics with bounded parallelism
//!
//! Each commit is diffed against its first parent's tree; a root commit
//! diffs against the empty tree so its whole content counts as additions.
//! Tree and signature resolution happens up front on the caller's thread,
//! workers only pull prepared items off a shared cursor and run the diff.
//! Results come back in input order and the batch is all-or-nothing: the
//! first error stops the cursor and discards partial results.

use crate::diff::tree_diff::snapshot_totals;
use crate::errors::RevGraphError;
use crate::objects::object_id::ObjectId;
use crate::objects::signature::Signature;
use crate::store::ObjectStore;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Line change counts for one commit, diffed against its first parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitStats {
    pub oid: ObjectId,
    pub author: Signature,
    pub committer: Signature,
    pub additions: usize,
    pub deletions: usize,
}

/// Prepared unit of work, index-aligned with the input list
#[derive(Debug)]
struct WorkItem {
    oid: ObjectId,
    tree: ObjectId,
    /// `None` for a root commit, diffed as an empty tree
    parent_tree: Option<ObjectId>,
    author: Signature,
    committer: Signature,
}

/// Compute `CommitStats` for every commit in the list, in input order
///
/// Worker count is `min(N, available_parallelism)`; a list of one is
/// computed inline without spawning.
pub fn compute_stats<S: ObjectStore + Sync>(
    store: &S,
    commits: &[ObjectId],
) -> anyhow::Result<Vec<CommitStats>> {
    let items = prepare_items(store, commits)?;

    if items.len() <= 1 {
        return items
            .iter()
            .map(|item| compute_item(store, item))
            .collect();
    }

    let parallelism = std::thread::available_parallelism()
        .map(|count| count.get())
        .unwrap_or(1);
    let workers = items.len().min(parallelism);

    let cursor = AtomicUsize::new(0);
    let stop = AtomicBool::new(false);

    let partials = std::thread::scope(|scope| -> anyhow::Result<Vec<Vec<(usize, CommitStats)>>> {
        let mut handles = Vec::with_capacity(workers);
        for worker in 0..workers {
            let handle = std::thread::Builder::new()
                .name(format!("diff-stats-{worker}"))
                .spawn_scoped(scope, || worker_loop(store, &items, &cursor, &stop))
                .map_err(|error| {
                    stop.store(true, Ordering::SeqCst);
                    RevGraphError::PoolScheduling(error)
                })?;
            handles.push(handle);
        }

        let mut partials = Vec::with_capacity(workers);
        let mut first_error = None;
        for handle in handles {
            match handle.join() {
                Ok(Ok(partial)) => partials.push(partial),
                Ok(Err(error)) => {
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                }
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(partials),
        }
    })?;

    let mut results: Vec<Option<CommitStats>> = vec![None; items.len()];
    for (index, stats) in partials.into_iter().flatten() {
        results[index] = Some(stats);
    }

    results
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| anyhow::anyhow!("no result recorded for commit at index {index}"))
        })
        .collect()
}

fn prepare_items<S: ObjectStore>(
    store: &S,
    commits: &[ObjectId],
) -> anyhow::Result<Vec<WorkItem>> {
    commits
        .iter()
        .map(|oid| {
            let commit = store.require_commit(oid)?;
            let parent_tree = match commit.first_parent() {
                Some(parent) => Some(store.require_commit(parent)?.tree_oid().clone()),
                None => None,
            };
            Ok(WorkItem {
                oid: commit.id().clone(),
                tree: commit.tree_oid().clone(),
                parent_tree,
                author: commit.author().clone(),
                committer: commit.committer().clone(),
            })
        })
        .collect()
}

/// Claim indices off the shared cursor until the list or the stop flag ends
/// the run; the claim is the only synchronized step, the diff itself runs
/// unshared
fn worker_loop<S: ObjectStore>(
    store: &S,
    items: &[WorkItem],
    cursor: &AtomicUsize,
    stop: &AtomicBool,
) -> anyhow::Result<Vec<(usize, CommitStats)>> {
    let mut completed = Vec::new();

    loop {
        if stop.load(Ordering::SeqCst) {
            break;
        }
        let index = cursor.fetch_add(1, Ordering::SeqCst);
        if index >= items.len() {
            break;
        }

        match compute_item(store, &items[index]) {
            Ok(stats) => completed.push((index, stats)),
            Err(error) => {
                stop.store(true, Ordering::SeqCst);
                return Err(error);
            }
        }
    }

    Ok(completed)
}

fn compute_item<S: ObjectStore>(store: &S, item: &WorkItem) -> anyhow::Result<CommitStats> {
    let totals = snapshot_totals(store, item.parent_tree.as_ref(), Some(&item.tree)).map_err(
        |error| RevGraphError::DiffComputation {
            oid: item.oid.clone(),
            message: error.to_string(),
        },
    )?;

    Ok(CommitStats {
        oid: item.oid.clone(),
        author: item.author.clone(),
        committer: item.committer.clone(),
        additions: totals.additions,
        deletions: totals.deletions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::blob::BlobRecord;
    use crate::objects::object_id::ObjectId;
    use crate::objects::tree::{EntryKind, TreeEntry, TreeRecord};
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use crate::store::memory::MemoryStore;

    fn oid(name: &str) -> ObjectId {
        let mut hex = name
            .bytes()
            .map(|byte| format!("{byte:02x}"))
            .collect::<String>();
        while hex.len() < 40 {
            hex.push('0');
        }
        hex.truncate(40);
        ObjectId::try_parse(hex).unwrap()
    }

    fn signature() -> Signature {
        Signature::try_from("Jane <jane@example.com> 1000 +0000").unwrap()
    }

    fn tree_of(entries: &[(&str, &str)]) -> TreeRecord {
        TreeRecord::new(
            entries
                .iter()
                .map(|(name, blob)| {
                    (name.to_string(), TreeEntry::new(EntryKind::Blob, oid(blob)))
                })
                .collect(),
        )
    }

    /// c1 (3 lines) <- c2 (+3/-0) <- c3 (+5/-1)
    #[fixture]
    fn history() -> MemoryStore {
        let mut store = MemoryStore::new();

        store.insert_blob(oid("blob1"), BlobRecord::from_text("a\nb\nc"));
        store.insert_blob(oid("blob2"), BlobRecord::from_text("a\nb\nc\nd\ne\nf"));
        store.insert_blob(
            oid("blob3"),
            BlobRecord::from_text("a\nb\nx\nd\ne\nf\n1\n2\n3\n4"),
        );

        store.insert_tree(oid("tree1"), tree_of(&[("file", "blob1")]));
        store.insert_tree(oid("tree2"), tree_of(&[("file", "blob2")]));
        store.insert_tree(oid("tree3"), tree_of(&[("file", "blob3")]));

        store.insert_commit(
            oid("c1"),
            vec![],
            oid("tree1"),
            signature(),
            signature(),
            "c1".into(),
        );
        store.insert_commit(
            oid("c2"),
            vec![oid("c1")],
            oid("tree2"),
            signature(),
            signature(),
            "c2".into(),
        );
        store.insert_commit(
            oid("c3"),
            vec![oid("c2")],
            oid("tree3"),
            signature(),
            signature(),
            "c3".into(),
        );

        store
    }

    #[rstest]
    fn empty_input_yields_empty_output(history: MemoryStore) {
        assert_eq!(compute_stats(&history, &[]).unwrap(), vec![]);
    }

    #[rstest]
    fn root_commit_counts_all_lines_as_additions(history: MemoryStore) {
        let stats = compute_stats(&history, &[oid("c1")]).unwrap();

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].oid, oid("c1"));
        assert_eq!(stats[0].additions, 3);
        assert_eq!(stats[0].deletions, 0);
    }

    #[rstest]
    fn results_are_input_ordered(history: MemoryStore) {
        let input = vec![oid("c3"), oid("c2"), oid("c1")];
        let stats = compute_stats(&history, &input).unwrap();

        let oids: Vec<ObjectId> = stats.iter().map(|entry| entry.oid.clone()).collect();
        assert_eq!(oids, input);

        assert_eq!((stats[0].additions, stats[0].deletions), (5, 1));
        assert_eq!((stats[1].additions, stats[1].deletions), (3, 0));
        assert_eq!((stats[2].additions, stats[2].deletions), (3, 0));
    }

    #[rstest]
    fn missing_commit_fails_the_whole_batch(history: MemoryStore) {
        let error = compute_stats(&history, &[oid("c1"), oid("ghost")]).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<RevGraphError>(),
            Some(RevGraphError::GraphTraversal(_))
        ));
    }

    #[rstest]
    fn broken_tree_surfaces_as_diff_error(history: MemoryStore) {
        let mut store = history;
        store.insert_commit(
            oid("c4"),
            vec![oid("c3")],
            oid("no-such-tree"),
            signature(),
            signature(),
            "c4".into(),
        );

        let error = compute_stats(&store, &[oid("c3"), oid("c4")]).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<RevGraphError>(),
            Some(RevGraphError::DiffComputation { .. })
        ));
    }

    #[rstest]
    fn wide_batches_keep_order_under_parallelism(history: MemoryStore) {
        // enough items to occupy several workers
        let input: Vec<ObjectId> = (0..32)
            .map(|i| if i % 2 == 0 { oid("c2") } else { oid("c3") })
            .collect();
        let stats = compute_stats(&history, &input).unwrap();

        assert_eq!(stats.len(), input.len());
        for (entry, expected) in stats.iter().zip(&input) {
            assert_eq!(&entry.oid, expected);
        }
    }
}
