//! Commit record
//!
//! A commit names a tree snapshot, zero or more parent commits (the first
//! parent is distinguished), its author/committer identities, and a message.
//!
//! ## Payload format
//!
//! ```text
//! tree <tree-oid>
//! parent <parent-oid>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```

use crate::objects::object_id::ObjectId;
use crate::objects::signature::Signature;
use anyhow::Context;
use std::io::BufRead;

/// Immutable commit record owned by a store
///
/// Walkers and the stats stage hold ids, not records; records are looked up
/// per operation and not retained across traversal steps.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CommitRecord {
    id: ObjectId,
    /// Parent ids, first parent distinguished (empty for a root commit)
    parents: Vec<ObjectId>,
    tree_oid: ObjectId,
    author: Signature,
    committer: Signature,
    message: String,
}

impl CommitRecord {
    pub fn new(
        id: ObjectId,
        parents: Vec<ObjectId>,
        tree_oid: ObjectId,
        author: Signature,
        committer: Signature,
        message: String,
    ) -> Self {
        CommitRecord {
            id,
            parents,
            tree_oid,
            author,
            committer,
            message,
        }
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn first_parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn author(&self) -> &Signature {
        &self.author
    }

    pub fn committer(&self) -> &Signature {
        &self.committer
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the message, for short-form display
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    /// The committer timestamp, which orders the walk
    pub fn commit_time(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.committer.timestamp()
    }

    pub fn from_payload(id: ObjectId, reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        let content = String::from_utf8(content)?;
        let mut lines = content.lines();

        let tree_line = lines
            .next()
            .context("Invalid commit record: missing tree line")?;
        let tree_oid = tree_line
            .strip_prefix("tree ")
            .context("Invalid commit record: invalid tree line")?
            .to_string();
        let tree_oid = ObjectId::try_parse(tree_oid)?;

        // Parse all parent lines (0, 1 or several)
        let mut parents = Vec::new();
        let mut next_line = lines
            .next()
            .context("Invalid commit record: missing author line")?;

        while next_line.starts_with("parent ") {
            let parent_oid = next_line
                .strip_prefix("parent ")
                .context("Invalid commit record: invalid parent line")?;
            parents.push(ObjectId::try_parse(parent_oid.to_string())?);

            next_line = lines
                .next()
                .context("Invalid commit record: missing author line")?;
        }

        let author = next_line
            .strip_prefix("author ")
            .context("Invalid commit record: invalid author line")?;
        let author = Signature::try_from(author)?;

        let committer_line = lines
            .next()
            .context("Invalid commit record: missing committer line")?;
        let committer = committer_line
            .strip_prefix("committer ")
            .context("Invalid commit record: invalid committer line")?;
        let committer = Signature::try_from(committer)?;

        // skip the empty separator line
        lines.next();

        let message = lines.collect::<Vec<&str>>().join("\n");
        Ok(Self::new(id, parents, tree_oid, author, committer, message))
    }

    pub fn to_payload(&self) -> String {
        let mut lines = vec![];

        lines.push(format!("tree {}", self.tree_oid.as_ref()));
        for parent in &self.parents {
            lines.push(format!("parent {}", parent.as_ref()));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.to_string());

        lines.join("\n")
    }
}
