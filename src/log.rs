//! Commit history traversal.
//!
//! History is a single chain: every commit names at most one parent, so
//! walking from HEAD and following `parent` visits each ancestor once and
//! stops at the root commit.
//!
//! ```no_run
//! use ledgit::Repository;
//!
//! let repo = Repository::open(".").unwrap();
//! for commit in repo.log().take(10) {
//!     let commit = commit.unwrap();
//!     println!("{} {}", commit.digest().short(), commit.summary());
//! }
//! ```

use std::collections::HashSet;

use log::{debug, warn};

use crate::error::Result;
use crate::objects::{Commit, Digest, ObjectStore};

/// Reads commit `digest` from `store`.
///
/// # Errors
///
/// - `Error::ObjectNotFound` if no object exists under `digest`.
/// - `Error::CorruptData` if the object is not a commit record.
pub fn read_commit(store: &ObjectStore, digest: &Digest) -> Result<Commit> {
    let data = store.get(digest)?;
    Commit::parse(*digest, &data)
}

/// A lazy iterator over the ancestry chain, newest first.
///
/// Created by [`Repository::log`](crate::Repository::log). Each call to
/// `next` reads one commit; an empty repository yields nothing. After an
/// error the iterator is exhausted. Every walk starts from scratch, so a
/// fresh iterator always reflects the current HEAD.
#[derive(Debug)]
pub struct History {
    store: ObjectStore,
    next: Option<Digest>,
    visited: HashSet<Digest>,
}

impl History {
    /// Creates a walk starting at `start` (or an empty walk for `None`).
    pub fn new(store: ObjectStore, start: Option<Digest>) -> Self {
        History {
            store,
            next: start,
            visited: HashSet::new(),
        }
    }
}

impl Iterator for History {
    type Item = Result<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        let digest = self.next.take()?;

        if !self.visited.insert(digest) {
            // Only reachable if two commits hash to each other's parent.
            warn!("history revisits {}; stopping", digest.short());
            return None;
        }

        match read_commit(&self.store, &digest) {
            Ok(commit) => {
                debug!("visited commit {}", digest.short());
                self.next = commit.parent().copied();
                Some(Ok(commit))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
