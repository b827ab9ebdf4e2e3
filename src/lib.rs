//! # ledgit
//!
//! A small content-addressable version control engine.
//!
//! File snapshots are stored by SHA-1 digest in a flat object directory.
//! Staged snapshots are grouped into immutable JSON commit records, each
//! pointing at its parent, so history is a single chain ending at the root
//! commit.
//!
//! ## Features
//!
//! - Stage files and commit them (`add`, `commit`)
//! - Walk history lazily from HEAD
//! - Diff a commit against its parent, file by file
//! - Render the ancestry chain as a tree
//! - Optional zlib object compression and advisory locking
//!
//! ## Quick Start
//!
//! ```no_run
//! use ledgit::{Repository, Result};
//!
//! fn main() -> Result<()> {
//!     let repo = Repository::open("path/to/project")?;
//!
//!     repo.add("notes.txt")?;
//!     let digest = repo.commit("Add notes")?;
//!     println!("committed {}", digest.short());
//!
//!     for commit in repo.log() {
//!         let commit = commit?;
//!         println!("{} {}", commit.digest().short(), commit.summary());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`error`] - Error types and Result alias
//! - [`repository`] - Main `Repository` type
//! - [`objects`] - Digests, the object store, blobs and commits
//! - [`index`] - Staging index
//! - [`refs`] - HEAD
//! - [`log`] - History traversal
//! - [`diff`] - Commit diffs and the line diff
//! - [`tree`] - Ancestry tree
//! - [`config`] - Repository configuration

pub mod config;
pub mod diff;
pub mod error;
pub mod index;
pub mod log;
pub mod objects;
pub mod refs;
pub mod repository;
pub mod tree;

// Internal modules (not part of public API)
pub(crate) mod infra;

pub use config::{Config, Settings};
pub use error::{Error, Result};
pub use repository::Repository;

pub use objects::{Blob, Commit, CommitRecord, Digest, ObjectStore};

pub use index::{Index, IndexEntry};

pub use log::History;

pub use diff::{CommitDiff, DiffStats, FileChange, FileDiff, LineDiff, LineRun, MyersLineDiff, RunKind};

pub use tree::{AncestryTree, AsciiTreeRenderer, TreeRenderer};
