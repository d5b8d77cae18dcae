use crate::objects::blob::BlobRecord;
use crate::objects::commit::CommitRecord;
use crate::objects::object_kind::ObjectKind;
use crate::objects::tag::TagRecord;
use crate::objects::tree::TreeRecord;

/// The closed set of records a store lookup can produce
///
/// The variant is selected by the `ObjectKind` tag read from the record
/// header; there is no dispatch outside this enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectRecord {
    Blob(BlobRecord),
    Tree(TreeRecord),
    Commit(CommitRecord),
    Tag(TagRecord),
}

impl ObjectRecord {
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectRecord::Blob(_) => ObjectKind::Blob,
            ObjectRecord::Tree(_) => ObjectKind::Tree,
            ObjectRecord::Commit(_) => ObjectKind::Commit,
            ObjectRecord::Tag(_) => ObjectKind::Tag,
        }
    }

    pub fn as_commit(&self) -> Option<&CommitRecord> {
        match self {
            ObjectRecord::Commit(commit) => Some(commit),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&TreeRecord> {
        match self {
            ObjectRecord::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&BlobRecord> {
        match self {
            ObjectRecord::Blob(blob) => Some(blob),
            _ => None,
        }
    }

    pub fn into_commit(self) -> Option<CommitRecord> {
        match self {
            ObjectRecord::Commit(commit) => Some(commit),
            _ => None,
        }
    }

    pub fn into_tree(self) -> Option<TreeRecord> {
        match self {
            ObjectRecord::Tree(tree) => Some(tree),
            _ => None,
        }
    }
}
