//! Walk configuration: roots, ordering and pagination
//!
//! A `Frontier` is built up before a walk starts and consumed by the walker.
//! Show and hide roots keep insertion order, which seeds the traversal's
//! discovery order and makes unsorted walks deterministic.

use crate::errors::RevGraphError;
use crate::objects::object_id::ObjectId;
use crate::store::ObjectStore;
use bitflags::bitflags;

bitflags! {
    /// Ordering flags, independently combinable
    ///
    /// Empty means any valid reverse-topological order. `TIME` emits by
    /// non-increasing commit time. `TOPOLOGICAL` guarantees no parent before
    /// one of its walked children. `REVERSE` inverts the final order after
    /// the other flags are applied.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SortMode: u32 {
        const TIME = 0b001;
        const TOPOLOGICAL = 0b010;
        const REVERSE = 0b100;
    }
}

#[derive(Debug, Clone, Default)]
pub struct Frontier {
    show: Vec<ObjectId>,
    hide: Vec<ObjectId>,
    sort_mode: SortMode,
    simplify_first_parent: bool,
    no_merges: bool,
    offset: usize,
    limit: Option<usize>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&self) -> &[ObjectId] {
        &self.show
    }

    pub fn hide(&self) -> &[ObjectId] {
        &self.hide
    }

    pub fn is_empty(&self) -> bool {
        self.show.is_empty()
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn simplify_first_parent(&self) -> bool {
        self.simplify_first_parent
    }

    pub fn no_merges(&self) -> bool {
        self.no_merges
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Add a root, resolving symbolic specs through the store
    ///
    /// A well-formed full hex id is self-describing and inserted without a
    /// store round-trip; everything else goes through `resolve` and fails
    /// with `InvalidReference` when nothing matches.
    pub fn add<S: ObjectStore>(
        &mut self,
        store: &S,
        spec: &str,
        as_hide: bool,
    ) -> anyhow::Result<()> {
        let oid = if ObjectId::is_full_hex(spec) {
            ObjectId::try_parse(spec.to_string())?
        } else {
            store.resolve(spec)?
        };

        self.add_id(oid, as_hide);
        Ok(())
    }

    /// Add an already-resolved root
    pub fn add_id(&mut self, oid: ObjectId, as_hide: bool) {
        let side = if as_hide { &mut self.hide } else { &mut self.show };
        if !side.contains(&oid) {
            side.push(oid);
        }
    }

    /// Parse an `"A..B"` exclusion range into a hide of A and a show of B
    pub fn add_range<S: ObjectStore>(&mut self, store: &S, range: &str) -> anyhow::Result<()> {
        let invalid = || RevGraphError::InvalidRangeSpec(range.to_string());

        let (lower, upper) = range.split_once("..").ok_or_else(invalid)?;
        // a leading dot on the upper side means the range had three dots
        if lower.is_empty() || upper.is_empty() || upper.starts_with('.') {
            return Err(invalid().into());
        }

        self.add(store, lower, true)?;
        self.add(store, upper, false)?;
        Ok(())
    }

    pub fn set_sort_mode(&mut self, sort_mode: SortMode) -> &mut Self {
        self.sort_mode = sort_mode;
        self
    }

    pub fn set_simplify_first_parent(&mut self, simplify: bool) -> &mut Self {
        self.simplify_first_parent = simplify;
        self
    }

    pub fn set_no_merges(&mut self, no_merges: bool) -> &mut Self {
        self.no_merges = no_merges;
        self
    }

    pub fn set_offset(&mut self, offset: usize) -> &mut Self {
        self.offset = offset;
        self
    }

    pub fn set_limit(&mut self, limit: Option<usize>) -> &mut Self {
        self.limit = limit;
        self
    }

    /// Drop all roots, keeping the sort and pagination configuration
    pub fn clear_roots(&mut self) {
        self.show.clear();
        self.hide.clear();
    }
}
