//! Lazy ordered traversal over the commit graph
//!
//! The walker stays inert until the first item is requested, then resolves
//! the hide closure, discovers the reachable set and fixes the emission
//! order in one pass. Ordering with no flags is the discovery-seeded
//! child-before-parent order; `TIME` and `TOPOLOGICAL` refine it and
//! `REVERSE` inverts the final sequence. Emission-time filters (`no_merges`,
//! `offset`, `limit`) never affect which commits are discovered, only which
//! are handed out.

use crate::objects::commit::CommitRecord;
use crate::objects::object_id::ObjectId;
use crate::store::ObjectStore;
use crate::walk::frontier::{Frontier, SortMode};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

/// Per-commit traversal data gathered during discovery
#[derive(Debug)]
struct WalkNode {
    seq: usize,
    timestamp: i64,
    is_merge: bool,
    /// Followed parent edges into the walk set (hidden parents excluded)
    parents: Vec<ObjectId>,
    pending_children: usize,
}

/// Commits scheduled for emission, ready as soon as all their walked
/// children have been emitted
enum ReadyQueue {
    /// Discovery order, for unsorted and plain topological walks
    Fifo(VecDeque<ObjectId>),
    /// Newest commit first, discovery order breaking timestamp ties
    Newest(BinaryHeap<(i64, Reverse<usize>, ObjectId)>),
}

impl ReadyQueue {
    fn push(&mut self, oid: ObjectId, node: &WalkNode) {
        match self {
            ReadyQueue::Fifo(queue) => queue.push_back(oid),
            ReadyQueue::Newest(heap) => heap.push((node.timestamp, Reverse(node.seq), oid)),
        }
    }

    fn pop(&mut self) -> Option<ObjectId> {
        match self {
            ReadyQueue::Fifo(queue) => queue.pop_front(),
            ReadyQueue::Newest(heap) => heap.pop().map(|(_, _, oid)| oid),
        }
    }
}

pub struct RevisionWalker<'s, S: ObjectStore> {
    store: &'s S,
    frontier: Frontier,
    prepared: Option<VecDeque<(ObjectId, bool)>>,
    skipped: usize,
    emitted: usize,
    poisoned: bool,
}

impl<'s, S: ObjectStore> RevisionWalker<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self::with_frontier(store, Frontier::new())
    }

    pub fn with_frontier(store: &'s S, frontier: Frontier) -> Self {
        RevisionWalker {
            store,
            frontier,
            prepared: None,
            skipped: 0,
            emitted: 0,
            poisoned: false,
        }
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn frontier_mut(&mut self) -> &mut Frontier {
        &mut self.frontier
    }

    pub fn push(&mut self, spec: &str) -> anyhow::Result<()> {
        self.frontier.add(self.store, spec, false)
    }

    pub fn hide(&mut self, spec: &str) -> anyhow::Result<()> {
        self.frontier.add(self.store, spec, true)
    }

    pub fn push_id(&mut self, oid: ObjectId) {
        self.frontier.add_id(oid, false);
    }

    pub fn hide_id(&mut self, oid: ObjectId) {
        self.frontier.add_id(oid, true);
    }

    pub fn push_range(&mut self, range: &str) -> anyhow::Result<()> {
        self.frontier.add_range(self.store, range)
    }

    /// Change the ordering flags
    ///
    /// Reordering a walk in progress is undefined, so a walker that has
    /// already started is fully reset first and must be re-pushed.
    pub fn sorting(&mut self, sort_mode: SortMode) {
        if self.prepared.is_some() || self.poisoned {
            self.reset();
        }
        self.frontier.set_sort_mode(sort_mode);
    }

    /// Clear all roots and traversal progress, keeping the sort and
    /// pagination configuration
    pub fn reset(&mut self) {
        self.frontier.clear_roots();
        self.prepared = None;
        self.skipped = 0;
        self.emitted = 0;
        self.poisoned = false;
    }

    /// Adapt the id sequence into full commit records
    pub fn commits(self) -> impl Iterator<Item = anyhow::Result<CommitRecord>> {
        let store = self.store;
        self.map(move |item| item.and_then(|oid| store.require_commit(&oid)))
    }

    /// Ancestor closure of the hide roots, by peeled commit id
    fn hide_closure(&self) -> anyhow::Result<HashSet<ObjectId>> {
        let mut hidden = HashSet::new();
        let mut queue: VecDeque<ObjectId> = self.frontier.hide().iter().cloned().collect();

        while let Some(oid) = queue.pop_front() {
            if hidden.contains(&oid) {
                continue;
            }
            let commit = self.store.require_commit(&oid)?;
            // a hide root may be a tag id, record the peeled id as well
            let newly_hidden = hidden.insert(commit.id().clone());
            hidden.insert(oid);
            if !newly_hidden {
                continue;
            }
            for parent in commit.parents() {
                if !hidden.contains(parent) {
                    queue.push_back(parent.clone());
                }
            }
        }

        Ok(hidden)
    }

    /// Discover the reachable set and fix the emission order
    fn prepare(&self) -> anyhow::Result<VecDeque<(ObjectId, bool)>> {
        let hidden = self.hide_closure()?;
        let simplify = self.frontier.simplify_first_parent();

        // discovery: breadth-first from the show roots, skipping the hide
        // closure; a parent edge to a missing commit fails the whole walk
        let mut nodes = HashMap::<ObjectId, WalkNode>::new();
        let mut order = Vec::<ObjectId>::new();
        let mut queue: VecDeque<ObjectId> = self
            .frontier
            .show()
            .iter()
            .filter(|oid| !hidden.contains(*oid))
            .cloned()
            .collect();

        while let Some(oid) = queue.pop_front() {
            if nodes.contains_key(&oid) || hidden.contains(&oid) {
                continue;
            }
            let commit = self.store.require_commit(&oid)?;
            let id = commit.id().clone();
            if nodes.contains_key(&id) || hidden.contains(&id) {
                continue;
            }

            let followed: Vec<ObjectId> = if simplify {
                commit.first_parent().into_iter().cloned().collect()
            } else {
                commit.parents().to_vec()
            }
            .into_iter()
            .filter(|parent| !hidden.contains(parent))
            .collect();

            for parent in &followed {
                queue.push_back(parent.clone());
            }

            nodes.insert(
                id.clone(),
                WalkNode {
                    seq: order.len(),
                    timestamp: commit.commit_time().timestamp(),
                    is_merge: commit.is_merge(),
                    parents: followed,
                    pending_children: 0,
                },
            );
            order.push(id);
        }

        // count followed child edges per commit
        let mut edges = Vec::new();
        for oid in &order {
            if let Some(node) = nodes.get(oid) {
                edges.extend(node.parents.iter().cloned());
            }
        }
        for parent in edges {
            if let Some(node) = nodes.get_mut(&parent) {
                node.pending_children += 1;
            }
        }

        let sort_mode = self.frontier.sort_mode();
        let time_breaks_ties =
            sort_mode.contains(SortMode::TIME) && sort_mode.contains(SortMode::TOPOLOGICAL);

        // child-before-parent schedule: a commit becomes ready once every
        // walked child has been emitted
        let mut ready = if time_breaks_ties {
            ReadyQueue::Newest(BinaryHeap::new())
        } else {
            ReadyQueue::Fifo(VecDeque::new())
        };
        for oid in &order {
            if let Some(node) = nodes.get(oid)
                && node.pending_children == 0
            {
                ready.push(oid.clone(), node);
            }
        }

        let mut sequence = Vec::with_capacity(order.len());
        while let Some(oid) = ready.pop() {
            let parents = nodes
                .get(&oid)
                .map(|node| node.parents.clone())
                .unwrap_or_default();
            sequence.push(oid);

            for parent in parents {
                if let Some(node) = nodes.get_mut(&parent) {
                    node.pending_children -= 1;
                    if node.pending_children == 0 {
                        let ready_oid = parent.clone();
                        ready.push(ready_oid, node);
                    }
                }
            }
        }

        // plain time sort: reorder by non-increasing commit time, the stable
        // sort keeps the child-before-parent order among equal timestamps
        if sort_mode.contains(SortMode::TIME) && !sort_mode.contains(SortMode::TOPOLOGICAL) {
            sequence.sort_by_key(|oid| {
                Reverse(nodes.get(oid).map(|node| node.timestamp).unwrap_or(i64::MIN))
            });
        }

        if sort_mode.contains(SortMode::REVERSE) {
            sequence.reverse();
        }

        Ok(sequence
            .into_iter()
            .map(|oid| {
                let is_merge = nodes.get(&oid).map(|node| node.is_merge).unwrap_or(false);
                (oid, is_merge)
            })
            .collect())
    }
}

impl<S: ObjectStore> Iterator for RevisionWalker<'_, S> {
    type Item = anyhow::Result<ObjectId>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.poisoned || self.frontier.is_empty() {
            return None;
        }

        if self.prepared.is_none() {
            match self.prepare() {
                Ok(queue) => self.prepared = Some(queue),
                Err(error) => {
                    self.poisoned = true;
                    return Some(Err(error));
                }
            }
        }

        let queue = self.prepared.as_mut()?;
        while let Some((oid, is_merge)) = queue.pop_front() {
            if self.frontier.no_merges() && is_merge {
                continue;
            }
            if self.skipped < self.frontier.offset() {
                self.skipped += 1;
                continue;
            }
            if let Some(limit) = self.frontier.limit()
                && self.emitted >= limit
            {
                queue.clear();
                return None;
            }
            self.emitted += 1;
            return Some(Ok(oid));
        }

        None
    }
}
