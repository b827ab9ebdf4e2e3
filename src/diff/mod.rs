//! Per-commit diff against the parent commit.
//!
//! A commit only records the files staged for it, so a commit diff covers
//! exactly those files. Each one is compared with the first entry for the
//! same path in the immediate parent's file list. A path the parent did not
//! stage (or any path in the root commit) is reported as newly introduced,
//! even if an older ancestor recorded it. Files that were not re-staged do
//! not appear at all.

pub mod lines;

use log::debug;

use crate::error::Result;
use crate::log::read_commit;
use crate::objects::{Blob, Commit, Digest};
use crate::Repository;

pub use lines::{LineDiff, LineRun, MyersLineDiff, RunKind};

/// How one file in a commit relates to the parent commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    /// No entry for this path in the parent; nothing to compare against.
    New {
        /// Number of lines in the new content.
        lines: usize,
    },
    /// Compared line by line with the parent's version.
    Modified {
        /// The diff, in document order.
        runs: Vec<LineRun>,
    },
    /// One side is binary; no line diff is attempted.
    Binary,
}

/// One file of a commit diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    path: String,
    digest: Digest,
    parent_digest: Option<Digest>,
    change: FileChange,
}

impl FileDiff {
    /// Returns the file path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the blob digest in this commit.
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Returns the blob digest in the parent commit, if the path was there.
    pub fn parent_digest(&self) -> Option<&Digest> {
        self.parent_digest.as_ref()
    }

    /// Returns the change.
    pub fn change(&self) -> &FileChange {
        &self.change
    }

    /// Returns true if the file is new relative to the parent.
    pub fn is_new(&self) -> bool {
        matches!(self.change, FileChange::New { .. })
    }

    /// Returns the line runs for a modified text file.
    pub fn runs(&self) -> &[LineRun] {
        match &self.change {
            FileChange::Modified { runs } => runs,
            _ => &[],
        }
    }

    /// Returns `(added, removed)` line counts.
    pub fn line_counts(&self) -> (usize, usize) {
        self.runs().iter().fold((0, 0), |(added, removed), run| match run.kind {
            RunKind::Added => (added + run.line_count(), removed),
            RunKind::Removed => (added, removed + run.line_count()),
            RunKind::Unchanged => (added, removed),
        })
    }
}

/// Totals over a commit diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    /// Files with no counterpart in the parent.
    pub new_files: usize,
    /// Files compared against the parent (text or binary).
    pub modified_files: usize,
    /// Lines added across modified text files.
    pub lines_added: usize,
    /// Lines removed across modified text files.
    pub lines_removed: usize,
}

/// The diff of one commit against its parent.
#[derive(Debug, Clone)]
pub struct CommitDiff {
    commit: Commit,
    files: Vec<FileDiff>,
}

impl CommitDiff {
    /// Returns the commit that was diffed.
    pub fn commit(&self) -> &Commit {
        &self.commit
    }

    /// Returns the parent digest, or `None` for the root commit.
    pub fn parent(&self) -> Option<&Digest> {
        self.commit.parent()
    }

    /// Returns true if the commit has no parent.
    pub fn is_root(&self) -> bool {
        self.commit.is_root()
    }

    /// Returns the per-file diffs, in the commit's file order.
    pub fn files(&self) -> &[FileDiff] {
        &self.files
    }

    /// Computes totals.
    pub fn stats(&self) -> DiffStats {
        let mut stats = DiffStats::default();
        for file in &self.files {
            if file.is_new() {
                stats.new_files += 1;
            } else {
                stats.modified_files += 1;
                let (added, removed) = file.line_counts();
                stats.lines_added += added;
                stats.lines_removed += removed;
            }
        }
        stats
    }
}

impl Repository {
    /// Diffs the commit named by `rev` (full or abbreviated digest) against
    /// its parent.
    ///
    /// # Errors
    ///
    /// - `Error::ObjectNotFound` if the commit, its parent, or a referenced
    ///   blob is missing.
    /// - `Error::CorruptData` if `rev` names something that is not a commit.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ledgit::Repository;
    ///
    /// let repo = Repository::open(".").unwrap();
    /// let diff = repo.show("3f2a9c1").unwrap();
    /// for file in diff.files() {
    ///     println!("{} new={}", file.path(), file.is_new());
    /// }
    /// ```
    pub fn show(&self, rev: &str) -> Result<CommitDiff> {
        let commit = self.get_commit(&self.resolve(rev)?)?;
        self.diff_commit_with(commit, &MyersLineDiff)
    }

    /// Diffs `commit` against its parent using the Myers line diff.
    pub fn diff_commit(&self, commit: Commit) -> Result<CommitDiff> {
        self.diff_commit_with(commit, &MyersLineDiff)
    }

    /// Diffs `commit` against its parent with a caller-chosen line diff.
    pub fn diff_commit_with(&self, commit: Commit, differ: &dyn LineDiff) -> Result<CommitDiff> {
        let store = self.object_store();
        let parent = match commit.parent() {
            Some(digest) => Some(read_commit(&store, digest)?),
            None => None,
        };

        let mut files = Vec::with_capacity(commit.files().len());
        for entry in commit.files() {
            let after = Blob::new(store.get(entry.digest())?);
            let before_entry = parent.as_ref().and_then(|p| p.file(entry.path()));

            let change = match before_entry {
                None => FileChange::New {
                    lines: after.text().split_inclusive('\n').count(),
                },
                Some(before_entry) => {
                    let before = Blob::new(store.get(before_entry.digest())?);
                    if before.is_binary() || after.is_binary() {
                        FileChange::Binary
                    } else {
                        FileChange::Modified {
                            runs: differ.diff(&before.text(), &after.text()),
                        }
                    }
                }
            };

            debug!("diffed {} in {}", entry.path(), commit.digest().short());
            files.push(FileDiff {
                path: entry.path().to_string(),
                digest: *entry.digest(),
                parent_digest: before_entry.map(|e| *e.digest()),
                change,
            });
        }

        Ok(CommitDiff { commit, files })
    }
}
