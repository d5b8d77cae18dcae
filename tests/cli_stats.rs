mod common;

use assert_fs::TempDir;
use common::{StoreBuilder, oid, revgraph_cmd};
use predicates::prelude::*;
use rstest::{fixture, rstest};

/// first creates a 3-line file, second grows it to 6 lines and rewrites one
#[fixture]
fn edited_store() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    let mut builder = StoreBuilder::init(dir.path());

    let blob_v1 = builder.blob("blob-v1", "one\ntwo\nthree");
    let blob_v2 = builder.blob("blob-v2", "one\ntwo changed\nthree\nfour\nfive\nsix");
    let tree_v1 = builder.tree("tree-v1", &[("file.txt", &blob_v1)]);
    let tree_v2 = builder.tree("tree-v2", &[("file.txt", &blob_v2)]);

    builder.commit("first", &[], &tree_v1);
    let second = builder.commit("second", &["first"], &tree_v2);
    builder.branch("main", &second);
    builder.head("main");

    dir
}

#[rstest]
fn stats_reports_per_commit_counts(edited_store: TempDir) {
    let assert = revgraph_cmd(edited_store.path(), &["stats"]).assert().success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);

    // newest first: second rewrote one line and added three
    assert!(lines[0].starts_with(&oid("second").to_short_oid()));
    assert!(lines[0].contains("+4"));
    assert!(lines[0].contains("-1"));

    // the root commit counts its whole tree as additions
    assert!(lines[1].starts_with(&oid("first").to_short_oid()));
    assert!(lines[1].contains("+3"));
    assert!(lines[1].contains("-0"));

    assert!(lines[2].contains("2 commits"));
    assert!(lines[2].contains("+7"));
    assert!(lines[2].contains("-1"));
}

#[rstest]
fn stats_respects_max_count(edited_store: TempDir) {
    let assert = revgraph_cmd(edited_store.path(), &["stats", "-n", "1"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 2);
    assert!(stdout.contains("1 commits"));
    assert!(stdout.starts_with(&oid("second").to_short_oid()));
}

#[rstest]
fn stats_excludes_merge_commits() {
    let dir = TempDir::new().expect("temp dir");
    let mut builder = StoreBuilder::init(dir.path());

    let blob_v1 = builder.blob("blob-v1", "one\ntwo\nthree");
    let blob_v2 = builder.blob("blob-v2", "one\ntwo\nthree\nfour");
    let tree_v1 = builder.tree("tree-v1", &[("file.txt", &blob_v1)]);
    let tree_v2 = builder.tree("tree-v2", &[("file.txt", &blob_v2)]);

    builder.commit("base", &[], &tree_v1);
    builder.commit("left", &["base"], &tree_v2);
    builder.commit("right", &["base"], &tree_v1);
    let merge = builder.commit("merge", &["left", "right"], &tree_v2);
    builder.branch("main", &merge);
    builder.head("main");

    let assert = revgraph_cmd(dir.path(), &["stats"]).assert().success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(!stdout.contains(&oid("merge").to_short_oid()));

    // right, left, base and the total line; merge is not diffed at all
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with(&oid("right").to_short_oid()));
    assert!(lines[1].starts_with(&oid("left").to_short_oid()));
    assert!(lines[2].starts_with(&oid("base").to_short_oid()));
    assert!(lines[3].contains("3 commits"));
    assert!(lines[3].contains("+4"));
    assert!(lines[3].contains("-0"));
}

#[rstest]
fn stats_on_unknown_revision_fails(edited_store: TempDir) {
    revgraph_cmd(edited_store.path(), &["stats", "no-such-branch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid reference"));
}
