//! Best common ancestor between two commits
//!
//! Two-phase algorithm over the commit graph:
//!
//! 1. A bidirectional traversal processes commits newest-first off a priority
//!    queue, marking each as visited from the source or target side. A commit
//!    seen from both sides is a common ancestor; its ancestors are marked
//!    stale to prune the search.
//! 2. A redundancy filter drops any common ancestor that is itself an
//!    ancestor of another common ancestor. One survivor is returned; in
//!    criss-cross histories several survive and any of them anchors a valid
//!    comparison.

use crate::objects::object_id::ObjectId;
use crate::store::ObjectStore;
use bitflags::bitflags;
use std::collections::{BinaryHeap, HashMap, HashSet};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b0000;
        const FROM_SOURCE = 0b0001;
        const FROM_TARGET = 0b0010;
        const FROM_BOTH = Self::FROM_SOURCE.bits() | Self::FROM_TARGET.bits();
        const STALE = 0b0100;
        const RESULT = 0b1000;
    }
}

/// Parents and ordering timestamp, all the traversal needs per commit
#[derive(Debug, Clone)]
struct SlimCommit {
    parents: Vec<ObjectId>,
    timestamp: i64,
}

struct MergeBaseFinder<'s, S: ObjectStore> {
    store: &'s S,
    cache: HashMap<ObjectId, SlimCommit>,
}

impl<'s, S: ObjectStore> MergeBaseFinder<'s, S> {
    fn new(store: &'s S) -> Self {
        MergeBaseFinder {
            store,
            cache: HashMap::new(),
        }
    }

    fn load(&mut self, oid: &ObjectId) -> anyhow::Result<SlimCommit> {
        if let Some(slim) = self.cache.get(oid) {
            return Ok(slim.clone());
        }

        let commit = self.store.require_commit(oid)?;
        let slim = SlimCommit {
            parents: commit.parents().to_vec(),
            timestamp: commit.commit_time().timestamp(),
        };
        self.cache.insert(oid.clone(), slim.clone());
        Ok(slim)
    }

    /// Phase 1: every common ancestor of `source` and the `targets`
    fn common_ancestors(
        &mut self,
        source: &ObjectId,
        targets: &HashSet<ObjectId>,
    ) -> anyhow::Result<HashMap<ObjectId, VisitState>> {
        if targets.contains(source) {
            return Ok(HashMap::from([(source.clone(), VisitState::RESULT)]));
        }

        let mut states = HashMap::<ObjectId, VisitState>::new();
        let mut queue = BinaryHeap::new();

        let slim = self.load(source)?;
        states.insert(source.clone(), VisitState::FROM_SOURCE);
        queue.push((slim.timestamp, source.clone()));

        for target in targets {
            states.insert(target.clone(), VisitState::FROM_TARGET);
            let slim = self.load(target)?;
            queue.push((slim.timestamp, target.clone()));
        }

        while let Some((_, oid)) = queue.pop() {
            let current_state = states.get(&oid).copied().unwrap_or(VisitState::NONE);

            if current_state.contains(VisitState::STALE) {
                continue;
            }

            let is_common = if current_state.contains(VisitState::FROM_BOTH) {
                states
                    .entry(oid.clone())
                    .and_modify(|state| *state |= VisitState::RESULT);
                true
            } else {
                false
            };

            let slim = self.load(&oid)?;
            for parent in &slim.parents {
                let parent_slim = self.load(parent)?;
                let parent_state = states.get(parent).copied().unwrap_or(VisitState::NONE);

                let mut next_state = parent_state | current_state;
                if is_common {
                    next_state |= VisitState::STALE;
                }

                if !parent_state.contains(current_state) {
                    states.insert(parent.clone(), next_state);
                    queue.push((parent_slim.timestamp, parent.clone()));
                }
            }
        }

        Ok(states
            .into_iter()
            .filter(|(_, state)| {
                !state.contains(VisitState::STALE) && state.contains(VisitState::RESULT)
            })
            .collect())
    }

    /// Phase 2: filter to ancestors not reachable from any other survivor
    fn best(&mut self, source: &ObjectId, target: &ObjectId) -> anyhow::Result<Option<ObjectId>> {
        let targets = HashSet::from([target.clone()]);
        let common = self
            .common_ancestors(source, &targets)?
            .into_keys()
            .collect::<HashSet<_>>();

        if common.is_empty() {
            return Ok(None);
        }

        let mut redundant = HashSet::<ObjectId>::new();
        for candidate in &common {
            if redundant.contains(candidate) {
                continue;
            }

            let others = common
                .iter()
                .filter(|other| *other != candidate && !redundant.contains(*other))
                .cloned()
                .collect::<HashSet<_>>();
            let states = self.common_ancestors(candidate, &others)?;

            if states
                .get(candidate)
                .copied()
                .unwrap_or(VisitState::NONE)
                .contains(VisitState::FROM_TARGET)
            {
                redundant.insert(candidate.clone());
            }

            for other in &others {
                if states
                    .get(other)
                    .copied()
                    .unwrap_or(VisitState::NONE)
                    .contains(VisitState::FROM_SOURCE)
                {
                    redundant.insert(other.clone());
                }
            }
        }

        Ok(common
            .into_iter()
            .find(|candidate| !redundant.contains(candidate)))
    }
}

/// Find a best common ancestor of two commits
///
/// `Ok(None)` means the commits share no history. When several best common
/// ancestors exist, one of them is returned.
pub fn merge_base<S: ObjectStore>(
    store: &S,
    source: &ObjectId,
    target: &ObjectId,
) -> anyhow::Result<Option<ObjectId>> {
    MergeBaseFinder::new(store).best(source, target)
}
