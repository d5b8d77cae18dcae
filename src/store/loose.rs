//! Read-only loose object store
//!
//! On-disk layout:
//!
//! ```text
//! <root>/objects/<first-2-chars>/<remaining-38-chars>   zlib(<kind> <size>\0<payload>)
//! <root>/refs/heads/<name>                              text file holding a full id
//! <root>/refs/tags/<name>                               text file holding a full id
//! <root>/HEAD                                           "ref: refs/heads/<name>" or a full id
//! ```
//!
//! The store only reads. Producing these files belongs to whatever writes
//! the repository; test fixtures lay them out directly.

use crate::errors::RevGraphError;
use crate::objects::blob::BlobRecord;
use crate::objects::commit::CommitRecord;
use crate::objects::object_id::ObjectId;
use crate::objects::object_kind::ObjectKind;
use crate::objects::record::ObjectRecord;
use crate::objects::tag::TagRecord;
use crate::objects::tree::TreeRecord;
use crate::store::ObjectStore;
use anyhow::Context;
use bytes::Bytes;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Shape of a spec worth trying as an abbreviated object id.
static OID_LIKE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[0-9a-fA-F]{4,40}$").expect("hex prefix pattern"));

/// Upper bound on `ref: ` indirection when chasing a symref to an id.
const MAX_SYMREF_DEPTH: usize = 8;

#[derive(Debug)]
pub struct LooseStore {
    root: Box<Path>,
}

impl LooseStore {
    /// Open a store rooted at a directory containing `objects/` and `refs/`
    pub fn open(root: &Path) -> anyhow::Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("Unable to open store at {}", root.display()))?;

        if !root.join("objects").is_dir() {
            anyhow::bail!("Not an object store: {} has no objects/ directory", root.display());
        }

        Ok(LooseStore {
            root: root.into_boxed_path(),
        })
    }

    fn objects_path(&self) -> PathBuf {
        self.root.join("objects")
    }

    fn object_path(&self, oid: &ObjectId) -> PathBuf {
        self.objects_path().join(oid.to_path())
    }

    fn read_record(&self, oid: &ObjectId) -> anyhow::Result<Option<ObjectRecord>> {
        let object_path = self.object_path(oid);
        if !object_path.exists() {
            return Ok(None);
        }

        let compressed = std::fs::read(&object_path).with_context(|| {
            format!("Unable to read object file {}", object_path.display())
        })?;
        let content = Self::decompress(compressed.into())?;

        let mut reader = Cursor::new(content);
        let kind = ObjectKind::parse_header(&mut reader)?;

        let record = match kind {
            ObjectKind::Blob => {
                let mut payload = Vec::new();
                reader.read_to_end(&mut payload)?;
                ObjectRecord::Blob(BlobRecord::new(Bytes::from(payload)))
            }
            ObjectKind::Tree => ObjectRecord::Tree(TreeRecord::from_payload(reader)?),
            ObjectKind::Commit => {
                ObjectRecord::Commit(CommitRecord::from_payload(oid.clone(), reader)?)
            }
            ObjectKind::Tag => ObjectRecord::Tag(TagRecord::from_payload(reader)?),
        };

        Ok(Some(record))
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    /// Read a ref file holding a full hex id, chasing `ref: ` indirection
    ///
    /// A chain longer than `MAX_SYMREF_DEPTH` is treated as a cycle and
    /// rejected rather than chased forever.
    fn read_ref_file(&self, relative: &Path) -> anyhow::Result<Option<ObjectId>> {
        let mut target = relative.to_path_buf();

        for _ in 0..MAX_SYMREF_DEPTH {
            let path = self.root.join(&target);
            if !path.is_file() {
                return Ok(None);
            }

            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Unable to read ref file {}", path.display()))?;
            let content = content.trim();

            if let Some(next) = content.strip_prefix("ref: ") {
                target = PathBuf::from(next);
                continue;
            }

            return Ok(Some(ObjectId::try_parse(content.to_string())?));
        }

        Err(RevGraphError::InvalidReference(relative.display().to_string()).into())
    }

    fn resolve_ref(&self, spec: &str) -> anyhow::Result<Option<ObjectId>> {
        // HEAD first, then the conventional ref namespaces
        let candidates = [
            PathBuf::from(spec),
            PathBuf::from("refs").join(spec),
            PathBuf::from("refs").join("heads").join(spec),
            PathBuf::from("refs").join("tags").join(spec),
        ];

        for candidate in candidates {
            if let Some(oid) = self.read_ref_file(&candidate)? {
                return Ok(Some(oid));
            }
        }

        Ok(None)
    }

    /// Find all objects whose id starts with the given prefix
    ///
    /// For prefixes of 2+ characters only the matching fan-out directory is
    /// scanned; shorter prefixes scan every directory.
    pub fn find_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();
        let mut matches = Vec::new();

        if prefix.len() >= 2 {
            let dir_name = &prefix[..2];
            let file_prefix = &prefix[2..];
            let dir_path = self.objects_path().join(dir_name);

            if dir_path.is_dir() {
                for entry in std::fs::read_dir(&dir_path)? {
                    let entry = entry?;
                    let file_name = entry.file_name();
                    let file_name_str = file_name.to_string_lossy();

                    if file_name_str.starts_with(file_prefix) {
                        let full_oid = format!("{}{}", dir_name, file_name_str);
                        if let Ok(oid) = ObjectId::try_parse(full_oid) {
                            matches.push(oid);
                        }
                    }
                }
            }
        } else {
            for i in 0..=255 {
                let dir_name = format!("{:02x}", i);
                if !dir_name.starts_with(&prefix) {
                    continue;
                }
                let dir_path = self.objects_path().join(&dir_name);

                if dir_path.is_dir() {
                    for entry in std::fs::read_dir(&dir_path)? {
                        let entry = entry?;
                        let file_name = entry.file_name();
                        let file_name_str = file_name.to_string_lossy();
                        let full_oid = format!("{}{}", dir_name, file_name_str);

                        if let Ok(oid) = ObjectId::try_parse(full_oid) {
                            matches.push(oid);
                        }
                    }
                }
            }
        }

        Ok(matches)
    }
}

impl ObjectStore for LooseStore {
    fn lookup(&self, oid: &ObjectId) -> anyhow::Result<Option<ObjectRecord>> {
        self.read_record(oid)
    }

    fn contains(&self, oid: &ObjectId) -> bool {
        self.object_path(oid).exists()
    }

    fn resolve(&self, spec: &str) -> anyhow::Result<ObjectId> {
        // Refs shadow ids, like the usual revision resolution order
        if let Some(oid) = self.resolve_ref(spec)? {
            return Ok(oid);
        }

        if ObjectId::is_full_hex(spec) {
            let oid = ObjectId::try_parse(spec.to_string())?;
            if self.contains(&oid) {
                return Ok(oid);
            }
            return Err(RevGraphError::InvalidReference(spec.to_string()).into());
        }

        if OID_LIKE.is_match(spec) {
            let mut matches = self.find_by_prefix(spec)?;
            if matches.len() == 1
                && let Some(only) = matches.pop()
            {
                return Ok(only);
            }
            // zero or ambiguous both fall through to the reference error
        }

        Err(RevGraphError::InvalidReference(spec.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn oid(c: char) -> ObjectId {
        ObjectId::try_parse(c.to_string().repeat(40)).unwrap()
    }

    fn write_object(root: &Path, id: &ObjectId, kind: &str, payload: &str) {
        let mut content = format!("{kind} {}\0", payload.len()).into_bytes();
        content.extend_from_slice(payload.as_bytes());

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&content).unwrap();
        let compressed = encoder.finish().unwrap();

        let path = root.join("objects").join(id.to_path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, compressed).unwrap();
    }

    fn fixture_store() -> (TempDir, LooseStore) {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("objects")).unwrap();
        std::fs::create_dir_all(dir.path().join("refs").join("heads")).unwrap();
        let store = LooseStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn open_rejects_a_directory_without_objects() {
        let dir = TempDir::new().unwrap();
        assert!(LooseStore::open(dir.path()).is_err());
    }

    #[test]
    fn decodes_commit_records_from_fixture_bytes() {
        let (dir, store) = fixture_store();
        let payload = concat!(
            "tree 1111111111111111111111111111111111111111\n",
            "parent 2222222222222222222222222222222222222222\n",
            "author Jane <jane@example.com> 1000 +0000\n",
            "committer Jane <jane@example.com> 2000 +0000\n",
            "\n",
            "fix the widget\n",
        );
        write_object(dir.path(), &oid('a'), "commit", payload);

        let commit = store.lookup_commit(&oid('a')).unwrap().unwrap();
        assert_eq!(commit.tree_oid(), &oid('1'));
        assert_eq!(commit.parents(), &[oid('2')]);
        assert_eq!(commit.commit_time().timestamp(), 2000);
        assert_eq!(commit.short_message(), "fix the widget");
    }

    #[test]
    fn decodes_blob_content() {
        let (dir, store) = fixture_store();
        write_object(dir.path(), &oid('b'), "blob", "one\ntwo\n");

        let record = store.lookup(&oid('b')).unwrap().unwrap();
        let blob = record.as_blob().unwrap();
        assert_eq!(blob.lines(), vec!["one", "two"]);
    }

    #[test]
    fn missing_objects_are_absent_not_errors() {
        let (_dir, store) = fixture_store();
        assert!(store.lookup(&oid('f')).unwrap().is_none());
        assert!(!store.contains(&oid('f')));
    }

    #[test]
    fn resolves_head_through_the_symref() {
        let (dir, store) = fixture_store();
        write_object(dir.path(), &oid('a'), "blob", "x");
        std::fs::write(
            dir.path().join("refs").join("heads").join("main"),
            format!("{}\n", oid('a')),
        )
        .unwrap();
        std::fs::write(dir.path().join("HEAD"), "ref: refs/heads/main\n").unwrap();

        assert_eq!(store.resolve("HEAD").unwrap(), oid('a'));
        assert_eq!(store.resolve("main").unwrap(), oid('a'));
    }

    #[test]
    fn symref_cycles_are_rejected() {
        let (dir, store) = fixture_store();
        std::fs::write(dir.path().join("HEAD"), "ref: HEAD\n").unwrap();

        let err = store.resolve("HEAD").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RevGraphError>(),
            Some(RevGraphError::InvalidReference(_))
        ));

        std::fs::write(dir.path().join("refs").join("heads").join("a"), "ref: refs/heads/b\n")
            .unwrap();
        std::fs::write(dir.path().join("refs").join("heads").join("b"), "ref: refs/heads/a\n")
            .unwrap();
        assert!(store.resolve("a").is_err());
    }

    #[test]
    fn abbreviated_ids_resolve_when_unambiguous() {
        let (dir, store) = fixture_store();
        write_object(dir.path(), &oid('a'), "blob", "x");
        write_object(dir.path(), &oid('b'), "blob", "y");

        assert_eq!(store.resolve("aaaa").unwrap(), oid('a'));

        let shared = ObjectId::try_parse(format!("aaab{}", "0".repeat(36))).unwrap();
        write_object(dir.path(), &shared, "blob", "z");
        let err = store.resolve("aaa").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RevGraphError>(),
            Some(RevGraphError::InvalidReference(_))
        ));
    }
}
