//! Integration tests for staging and committing.
//!
//! Test cases: SG-001 to SG-006

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use ledgit::{Digest, Error, Repository};

fn create_test_repo() -> (TempDir, Repository) {
    let temp = TempDir::new().unwrap();
    let repo = Repository::init(temp.path()).unwrap();
    (temp, repo)
}

fn write(root: &Path, name: &str, content: &str) {
    fs::write(root.join(name), content).unwrap();
}

fn object_count(repo: &Repository) -> usize {
    fs::read_dir(repo.ledgit_dir().join("objects")).unwrap().count()
}

// SG-001: add returns the content digest and stages the file
#[test]
fn test_sg001_add_stages_file() {
    let (temp, repo) = create_test_repo();
    write(temp.path(), "a.txt", "line1\n");

    let digest = repo.add("a.txt").unwrap();
    assert_eq!(digest, Digest::of(b"line1\n"));

    let staged = repo.staged().unwrap();
    assert_eq!(staged.len(), 1);
    assert_eq!(staged.entries()[0].path(), "a.txt");
    assert_eq!(staged.entries()[0].digest(), &digest);
}

// SG-002: identical content is stored once, whatever the path
#[test]
fn test_sg002_dedup() {
    let (temp, repo) = create_test_repo();
    write(temp.path(), "a.txt", "same\n");
    write(temp.path(), "b.txt", "same\n");

    let first = repo.add("a.txt").unwrap();
    let again = repo.add("a.txt").unwrap();
    let other = repo.add("b.txt").unwrap();

    assert_eq!(first, again);
    assert_eq!(first, other);
    assert_eq!(object_count(&repo), 1);
}

// SG-003: duplicates are kept in insertion order
#[test]
fn test_sg003_duplicate_paths_kept() {
    let (temp, repo) = create_test_repo();
    write(temp.path(), "a.txt", "v1\n");
    repo.add("a.txt").unwrap();
    write(temp.path(), "b.txt", "b\n");
    repo.add("b.txt").unwrap();
    write(temp.path(), "a.txt", "v2\n");
    repo.add("a.txt").unwrap();

    let staged = repo.staged().unwrap();
    let paths: Vec<_> = staged.iter().map(|e| e.path()).collect();
    assert_eq!(paths, vec!["a.txt", "b.txt", "a.txt"]);
    assert_eq!(staged.get("a.txt").unwrap().digest(), &Digest::of(b"v1\n"));
}

// SG-004: commit takes exactly the staged entries and clears the index
#[test]
fn test_sg004_staging_isolation() {
    let (temp, repo) = create_test_repo();
    write(temp.path(), "a.txt", "a\n");
    write(temp.path(), "b.txt", "b\n");
    repo.add("b.txt").unwrap();
    repo.add("a.txt").unwrap();
    let before = repo.staged().unwrap();

    let c1 = repo.commit("first").unwrap();
    let commit = repo.get_commit(&c1).unwrap();
    assert_eq!(commit.files(), before.entries());
    assert!(repo.staged().unwrap().is_empty());

    write(temp.path(), "c.txt", "c\n");
    repo.add("c.txt").unwrap();
    let staged = repo.staged().unwrap();
    assert_eq!(staged.len(), 1);
    assert_eq!(staged.entries()[0].path(), "c.txt");

    let c2 = repo.commit("second").unwrap();
    let paths: Vec<_> = repo
        .get_commit(&c2)
        .unwrap()
        .files()
        .iter()
        .map(|e| e.path().to_string())
        .collect();
    assert_eq!(paths, vec!["c.txt"]);
}

// SG-005: each commit points at the previous HEAD
#[test]
fn test_sg005_parent_linkage() {
    let (temp, repo) = create_test_repo();
    write(temp.path(), "a.txt", "1\n");
    repo.add("a.txt").unwrap();
    let c1 = repo.commit("one").unwrap();
    write(temp.path(), "a.txt", "2\n");
    repo.add("a.txt").unwrap();
    let c2 = repo.commit("two").unwrap();

    assert_eq!(repo.head(), Some(c2));
    let second = repo.get_commit(&c2).unwrap();
    assert_eq!(second.parent(), Some(&c1));
    let first = repo.get_commit(second.parent().unwrap()).unwrap();
    assert!(first.is_root());
    assert_eq!(first.message(), "one");
}

// SG-006: adding a missing file fails without touching the index
#[test]
fn test_sg006_add_missing_file() {
    let (temp, repo) = create_test_repo();
    write(temp.path(), "a.txt", "a\n");
    repo.add("a.txt").unwrap();

    assert!(matches!(repo.add("nope.txt"), Err(Error::PathNotFound(_))));
    assert_eq!(repo.staged().unwrap().len(), 1);
}

#[test]
fn test_commit_record_is_json_keyed_by_its_digest() {
    let (temp, repo) = create_test_repo();
    write(temp.path(), "a.txt", "a\n");
    let blob = repo.add("a.txt").unwrap();
    let digest = repo.commit("msg").unwrap();

    let raw = fs::read(repo.object_store().object_path(&digest)).unwrap();
    assert_eq!(Digest::of(&raw), digest);

    let text = String::from_utf8(raw).unwrap();
    assert!(text.starts_with("{\"timestamp\":\""));
    assert!(text.contains("\"message\":\"msg\""));
    assert!(text.contains(&format!(
        "\"files\":[{{\"path\":\"a.txt\",\"hash\":\"{}\"}}]",
        blob
    )));
    assert!(text.ends_with("\"parent\":null}"));
}

#[test]
fn test_index_file_is_json() {
    let (temp, repo) = create_test_repo();
    write(temp.path(), "a.txt", "a\n");
    let digest = repo.add("a.txt").unwrap();

    let raw = fs::read_to_string(repo.ledgit_dir().join("index")).unwrap();
    assert_eq!(raw, format!("[{{\"path\":\"a.txt\",\"hash\":\"{}\"}}]", digest));

    repo.commit("clear").unwrap();
    let raw = fs::read_to_string(repo.ledgit_dir().join("index")).unwrap();
    assert_eq!(raw, "[]");
}

#[test]
fn test_add_from_subdirectory_path() {
    let (temp, repo) = create_test_repo();
    fs::create_dir_all(temp.path().join("src")).unwrap();
    write(temp.path(), "src/lib.rs", "fn main() {}\n");

    repo.add("src/lib.rs").unwrap();
    assert_eq!(repo.staged().unwrap().entries()[0].path(), "src/lib.rs");
}

#[test]
fn test_add_through_parent_component_matches_the_committed_path() {
    let (temp, repo) = create_test_repo();
    write(temp.path(), "a.txt", "one\n");
    repo.add("a.txt").unwrap();
    repo.commit("first").unwrap();

    fs::create_dir_all(temp.path().join("sub")).unwrap();
    write(temp.path(), "a.txt", "two\n");
    repo.add(repo.path().join("sub").join("../a.txt")).unwrap();
    assert_eq!(repo.staged().unwrap().entries()[0].path(), "a.txt");

    let second = repo.commit("second").unwrap();
    let diff = repo.show(&second.to_hex()).unwrap();
    assert_eq!(diff.files().len(), 1);
    assert_eq!(diff.files()[0].path(), "a.txt");
    assert!(!diff.files()[0].is_new());
    assert_eq!(diff.stats().modified_files, 1);
    assert_eq!(diff.stats().new_files, 0);
}

#[test]
fn test_add_outside_the_repository_is_rejected() {
    let (_temp, repo) = create_test_repo();
    let other = TempDir::new().unwrap();
    write(other.path(), "x.txt", "x\n");

    let result = repo.add(other.path().join("x.txt"));
    assert!(matches!(result, Err(Error::InvalidPath { .. })));
    assert!(repo.staged().unwrap().is_empty());
    assert_eq!(object_count(&repo), 0);
}
