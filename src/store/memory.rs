//! In-memory object store
//!
//! Holds records and refs in hash maps. This is the fixture backend used by
//! the algorithm tests, and a usable collaborator for embedders whose history
//! already lives in memory (the cross-repository resolver takes any two
//! stores, so a memory store can stand in for a remote).

use crate::errors::RevGraphError;
use crate::objects::blob::BlobRecord;
use crate::objects::commit::CommitRecord;
use crate::objects::object_id::ObjectId;
use crate::objects::record::ObjectRecord;
use crate::objects::signature::Signature;
use crate::objects::tag::TagRecord;
use crate::objects::tree::TreeRecord;
use crate::store::ObjectStore;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<ObjectId, ObjectRecord>,
    refs: HashMap<String, ObjectId>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, oid: ObjectId, record: ObjectRecord) {
        self.records.insert(oid, record);
    }

    pub fn insert_blob(&mut self, oid: ObjectId, blob: BlobRecord) {
        self.insert(oid, ObjectRecord::Blob(blob));
    }

    pub fn insert_tree(&mut self, oid: ObjectId, tree: TreeRecord) {
        self.insert(oid, ObjectRecord::Tree(tree));
    }

    pub fn insert_tag(&mut self, oid: ObjectId, tag: TagRecord) {
        self.insert(oid, ObjectRecord::Tag(tag));
    }

    /// Insert a commit, deriving the record id from the key
    pub fn insert_commit(
        &mut self,
        oid: ObjectId,
        parents: Vec<ObjectId>,
        tree_oid: ObjectId,
        author: Signature,
        committer: Signature,
        message: String,
    ) {
        let record = CommitRecord::new(oid.clone(), parents, tree_oid, author, committer, message);
        self.insert(oid, ObjectRecord::Commit(record));
    }

    /// Point a symbolic name at an id
    pub fn set_ref(&mut self, name: &str, oid: ObjectId) {
        self.refs.insert(name.to_string(), oid);
    }
}

impl ObjectStore for MemoryStore {
    fn lookup(&self, oid: &ObjectId) -> anyhow::Result<Option<ObjectRecord>> {
        Ok(self.records.get(oid).cloned())
    }

    fn contains(&self, oid: &ObjectId) -> bool {
        self.records.contains_key(oid)
    }

    fn resolve(&self, spec: &str) -> anyhow::Result<ObjectId> {
        if let Some(oid) = self.refs.get(spec) {
            return Ok(oid.clone());
        }

        if ObjectId::is_full_hex(spec) {
            let oid = ObjectId::try_parse(spec.to_string())?;
            if self.contains(&oid) {
                return Ok(oid);
            }
        }

        Err(RevGraphError::InvalidReference(spec.to_string()).into())
    }
}
