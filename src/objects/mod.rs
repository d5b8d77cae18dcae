//! Object model shared by every store backend
//!
//! - `object_id`: content-hash identifiers
//! - `object_kind`: the closed set of record kinds and header parsing
//! - `signature`: author/committer identities
//! - `blob`, `tree`, `tag`, `commit`: the record types themselves
//! - `record`: the `ObjectRecord` variant enum a lookup returns

pub mod blob;
pub mod commit;
pub mod object_id;
pub mod object_kind;
pub mod record;
pub mod signature;
pub mod tag;
pub mod tree;

/// Length of an object id in hexadecimal characters.
pub const OBJECT_ID_LENGTH: usize = 40;
