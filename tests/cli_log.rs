mod common;

use assert_fs::TempDir;
use common::{StoreBuilder, oid, position_of, revgraph_cmd};
use predicates::prelude::*;
use rstest::{fixture, rstest};

/// first <- second <- third on branch main, HEAD at main
#[fixture]
fn linear_store() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    let mut builder = StoreBuilder::init(dir.path());

    let blob = builder.blob("blob-a", "hello\n");
    let tree = builder.tree("tree-a", &[("file.txt", &blob)]);
    builder.commit("first", &[], &tree);
    builder.commit("second", &["first"], &tree);
    let third = builder.commit("third", &["second"], &tree);
    builder.branch("main", &third);
    builder.head("main");

    dir
}

#[rstest]
fn log_lists_history_newest_first(linear_store: TempDir) {
    let assert = revgraph_cmd(linear_store.path(), &["log"]).assert().success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(position_of(&stdout, "third") < position_of(&stdout, "second"));
    assert!(position_of(&stdout, "second") < position_of(&stdout, "first"));
    assert!(stdout.contains(&format!("commit {}", oid("third").as_ref())));
    assert!(stdout.contains("Author: Jane <jane@example.com>"));
}

#[rstest]
fn oneline_prints_one_commit_per_line(linear_store: TempDir) {
    let assert = revgraph_cmd(linear_store.path(), &["log", "--oneline"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with(&oid("third").to_short_oid()));
    assert!(lines[0].ends_with("third"));
}

#[rstest]
fn range_excludes_the_hidden_side(linear_store: TempDir) {
    let range = format!("{}..HEAD", oid("first").as_ref());
    let assert = revgraph_cmd(linear_store.path(), &["log", "--oneline", &range])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 2);
    assert!(stdout.contains("third"));
    assert!(stdout.contains("second"));
    assert!(!stdout.contains("first"));
}

#[rstest]
fn pagination_selects_a_window(linear_store: TempDir) {
    let assert = revgraph_cmd(
        linear_store.path(),
        &["log", "--oneline", "--skip", "1", "-n", "1"],
    )
    .assert()
    .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.contains("second"));
}

#[rstest]
fn reverse_flag_inverts_the_order(linear_store: TempDir) {
    let assert = revgraph_cmd(linear_store.path(), &["log", "--oneline", "--reverse"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(position_of(&stdout, "first") < position_of(&stdout, "second"));
    assert!(position_of(&stdout, "second") < position_of(&stdout, "third"));
}

#[rstest]
fn no_merges_skips_merge_commits() {
    let dir = TempDir::new().expect("temp dir");
    let mut builder = StoreBuilder::init(dir.path());

    let blob = builder.blob("blob-a", "hello\n");
    let tree = builder.tree("tree-a", &[("file.txt", &blob)]);
    builder.commit("base", &[], &tree);
    builder.commit("left", &["base"], &tree);
    builder.commit("right", &["base"], &tree);
    let merge = builder.commit("merge", &["left", "right"], &tree);
    builder.branch("main", &merge);
    builder.head("main");

    let assert = revgraph_cmd(dir.path(), &["log", "--oneline", "--no-merges"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 3);
    assert!(!stdout.contains("merge"));
}

#[rstest]
fn first_parent_follows_the_main_line() {
    let dir = TempDir::new().expect("temp dir");
    let mut builder = StoreBuilder::init(dir.path());

    let blob = builder.blob("blob-a", "hello\n");
    let tree = builder.tree("tree-a", &[("file.txt", &blob)]);
    builder.commit("base", &[], &tree);
    builder.commit("left", &["base"], &tree);
    builder.commit("right", &["base"], &tree);
    let merge = builder.commit("merge", &["left", "right"], &tree);
    builder.branch("main", &merge);
    builder.head("main");

    let assert = revgraph_cmd(dir.path(), &["log", "--oneline", "--first-parent"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("merge"));
    assert!(stdout.contains("left"));
    assert!(stdout.contains("base"));
    assert!(!stdout.contains("right"));
}

#[rstest]
fn unknown_revision_is_reported(linear_store: TempDir) {
    revgraph_cmd(linear_store.path(), &["log", "no-such-branch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid reference"));
}

#[rstest]
fn malformed_range_is_reported(linear_store: TempDir) {
    revgraph_cmd(linear_store.path(), &["log", "main...main"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid range spec"));
}
