#![allow(dead_code)]

use assert_cmd::Command;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use revgraph::objects::commit::CommitRecord;
use revgraph::objects::object_id::ObjectId;
use revgraph::objects::signature::Signature;
use revgraph::objects::tree::{EntryKind, TreeEntry, TreeRecord};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Deterministic full hex id derived from a readable name
pub fn oid(name: &str) -> ObjectId {
    let mut hex = name
        .bytes()
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>();
    while hex.len() < 40 {
        hex.push('0');
    }
    hex.truncate(40);
    ObjectId::try_parse(hex).expect("invalid fixture id")
}

/// Lays out a loose object store on disk for the CLI to read
///
/// Object ids are derived from names, not content hashes; the store under
/// test never re-hashes, it only resolves paths.
pub struct StoreBuilder {
    root: PathBuf,
    next_time: i64,
}

impl StoreBuilder {
    pub fn init(root: &Path) -> Self {
        std::fs::create_dir_all(root.join("objects")).expect("create objects dir");
        std::fs::create_dir_all(root.join("refs").join("heads")).expect("create heads dir");
        std::fs::create_dir_all(root.join("refs").join("tags")).expect("create tags dir");
        StoreBuilder {
            root: root.to_path_buf(),
            next_time: 1_640_995_200,
        }
    }

    fn write_object(&self, id: &ObjectId, kind: &str, payload: &str) {
        let mut content = format!("{kind} {}\0", payload.len()).into_bytes();
        content.extend_from_slice(payload.as_bytes());

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&content).expect("compress object");
        let compressed = encoder.finish().expect("finish compression");

        let path = self.root.join("objects").join(id.to_path());
        std::fs::create_dir_all(path.parent().expect("fan-out dir")).expect("create fan-out dir");
        std::fs::write(path, compressed).expect("write object file");
    }

    pub fn blob(&self, name: &str, text: &str) -> ObjectId {
        let id = oid(name);
        self.write_object(&id, "blob", text);
        id
    }

    pub fn tree(&self, name: &str, entries: &[(&str, &ObjectId)]) -> ObjectId {
        let id = oid(name);
        let record = TreeRecord::new(
            entries
                .iter()
                .map(|(entry_name, blob)| {
                    (
                        entry_name.to_string(),
                        TreeEntry::new(EntryKind::Blob, (*blob).clone()),
                    )
                })
                .collect::<BTreeMap<_, _>>(),
        );
        self.write_object(&id, "tree", &record.to_payload());
        id
    }

    /// Write a commit with a strictly increasing timestamp per call
    pub fn commit(&mut self, name: &str, parents: &[&str], tree: &ObjectId) -> ObjectId {
        let id = oid(name);
        let signature = Signature::try_from(
            format!("Jane <jane@example.com> {} +0000", self.next_time).as_str(),
        )
        .expect("fixture signature");
        self.next_time += 3600;

        let record = CommitRecord::new(
            id.clone(),
            parents.iter().map(|parent| oid(parent)).collect(),
            tree.clone(),
            signature.clone(),
            signature,
            name.to_string(),
        );
        self.write_object(&id, "commit", &record.to_payload());
        id
    }

    pub fn branch(&self, name: &str, id: &ObjectId) {
        let path = self.root.join("refs").join("heads").join(name);
        std::fs::write(path, format!("{}\n", id.as_ref())).expect("write branch ref");
    }

    pub fn head(&self, branch: &str) {
        let path = self.root.join("HEAD");
        std::fs::write(path, format!("ref: refs/heads/{branch}\n")).expect("write HEAD");
    }
}

pub fn revgraph_cmd(store: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("revgraph").expect("binary under test");
    cmd.arg("--store").arg(store).args(args);
    cmd
}

/// Index of a needle within CLI output, for order assertions
pub fn position_of(output: &str, needle: &str) -> usize {
    output
        .find(needle)
        .unwrap_or_else(|| panic!("expected {needle:?} in output:\n{output}"))
}
