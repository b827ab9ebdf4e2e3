//! Integration tests for history traversal and the ancestry tree.
//!
//! Test cases: LH-001 to LH-004

use std::fs;
use tempfile::TempDir;
use ledgit::{AsciiTreeRenderer, Digest, Repository, TreeRenderer};

fn repo_with_commits(messages: &[&str]) -> (TempDir, Repository, Vec<Digest>) {
    let temp = TempDir::new().unwrap();
    let repo = Repository::init(temp.path()).unwrap();
    let mut digests = Vec::new();

    for (i, message) in messages.iter().enumerate() {
        fs::write(temp.path().join("file.txt"), format!("version {}\n", i)).unwrap();
        repo.add("file.txt").unwrap();
        digests.push(repo.commit(message).unwrap());
    }

    (temp, repo, digests)
}

// LH-001: log visits HEAD back to the root, each commit once
#[test]
fn test_lh001_history_completeness() {
    let (_temp, repo, digests) = repo_with_commits(&["one", "two", "three"]);

    let walked: Vec<Digest> = repo.log().map(|c| *c.unwrap().digest()).collect();
    let expected: Vec<Digest> = digests.iter().rev().copied().collect();
    assert_eq!(walked, expected);

    let messages: Vec<String> = repo
        .log()
        .map(|c| c.unwrap().message().to_string())
        .collect();
    assert_eq!(messages, vec!["three", "two", "one"]);
}

// LH-002: the walk can be cut short and restarted
#[test]
fn test_lh002_limit_and_restart() {
    let (_temp, repo, digests) = repo_with_commits(&["one", "two", "three"]);

    let first_two: Vec<Digest> = repo.log().take(2).map(|c| *c.unwrap().digest()).collect();
    assert_eq!(first_two, vec![digests[2], digests[1]]);
    assert_eq!(repo.log().count(), 3);
}

// LH-003: three commits give a three-level tree, HEAD least indented
#[test]
fn test_lh003_three_level_tree() {
    let (_temp, repo, digests) = repo_with_commits(&["c1", "c2", "c3"]);

    let tree = repo.ancestry().unwrap();
    let depths: Vec<usize> = tree.nodes().iter().map(|n| n.depth).collect();
    assert_eq!(depths, vec![0, 1, 2]);

    let text = tree.to_indented_text();
    assert_eq!(
        text,
        format!("{}\n  {}\n    {}\n", digests[2], digests[1], digests[0])
    );

    let drawn = AsciiTreeRenderer.render(&text);
    assert_eq!(
        drawn,
        format!(
            "{}\n└── {}\n    └── {}\n",
            digests[2], digests[1], digests[0]
        )
    );
}

// LH-004: a dangling parent surfaces as NotFound after the readable commits
#[test]
fn test_lh004_missing_parent() {
    let (_temp, repo, digests) = repo_with_commits(&["one", "two"]);
    fs::remove_file(repo.object_store().object_path(&digests[0])).unwrap();

    let results: Vec<_> = repo.log().collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(results[1].as_ref().unwrap_err().is_not_found());
    assert!(repo.ancestry().is_err());
}

#[test]
fn test_single_commit_tree() {
    let (_temp, repo, digests) = repo_with_commits(&["only"]);
    let tree = repo.ancestry().unwrap();

    assert_eq!(tree.to_indented_text(), format!("{}\n", digests[0]));
    assert_eq!(
        AsciiTreeRenderer.render(&tree.to_indented_text()),
        format!("{}\n", digests[0])
    );
}

#[test]
fn test_log_after_reopen() {
    let (temp, _repo, digests) = repo_with_commits(&["one", "two"]);
    let repo = Repository::open(temp.path()).unwrap();

    let head = repo.log().next().unwrap().unwrap();
    assert_eq!(head.digest(), &digests[1]);
    assert_eq!(head.parent(), Some(&digests[0]));
    assert!(!head.timestamp().is_empty());
}
