//! Tree snapshot record
//!
//! A tree maps path segments to blob or subtree ids, ordered by name so that
//! two snapshots can be compared pairwise.
//!
//! ## Payload format
//!
//! One entry per line:
//! ```text
//! blob <oid>\t<name>
//! tree <oid>\t<name>
//! ```

use crate::objects::object_id::ObjectId;
use anyhow::Context;
use std::collections::BTreeMap;
use std::io::BufRead;

/// Whether a tree entry names file content or a nested snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Blob,
    Tree,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct TreeEntry {
    pub kind: EntryKind,
    pub oid: ObjectId,
}

impl TreeEntry {
    pub fn is_tree(&self) -> bool {
        self.kind == EntryKind::Tree
    }
}

/// Immutable directory snapshot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TreeRecord {
    entries: BTreeMap<String, TreeEntry>,
}

impl TreeRecord {
    pub fn new(entries: BTreeMap<String, TreeEntry>) -> Self {
        TreeRecord { entries }
    }

    pub fn entries(&self) -> &BTreeMap<String, TreeEntry> {
        &self.entries
    }

    pub fn from_payload(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();

        for line in reader.lines() {
            let line = line.context("Invalid tree record: unreadable line")?;
            if line.is_empty() {
                continue;
            }

            let (kind, rest) = line
                .split_once(' ')
                .context("Invalid tree record: missing entry kind")?;
            let kind = match kind {
                "blob" => EntryKind::Blob,
                "tree" => EntryKind::Tree,
                _ => anyhow::bail!("Invalid tree record: unknown entry kind {kind}"),
            };
            let (oid, name) = rest
                .split_once('\t')
                .context("Invalid tree record: missing entry name")?;
            let oid = ObjectId::try_parse(oid.to_string())?;

            entries.insert(name.to_string(), TreeEntry::new(kind, oid));
        }

        Ok(TreeRecord { entries })
    }

    pub fn to_payload(&self) -> String {
        let mut lines = Vec::with_capacity(self.entries.len());
        for (name, entry) in &self.entries {
            let kind = match entry.kind {
                EntryKind::Blob => "blob",
                EntryKind::Tree => "tree",
            };
            lines.push(format!("{} {}\t{}", kind, entry.oid.as_ref(), name));
        }
        lines.join("\n")
    }
}
