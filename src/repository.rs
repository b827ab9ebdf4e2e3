//! Repository handle and commit graph operations.

use std::fs;
use std::path::{Component, Path, PathBuf};

use log::{debug, info};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::index::{Index, IndexFile};
use crate::infra::{create_file_if_absent, read_file, LockGuard};
use crate::log::{read_commit, History};
use crate::objects::{Blob, Commit, CommitRecord, Digest, ObjectStore};
use crate::refs::HeadFile;
use crate::tree::AncestryTree;

/// Name of the repository directory inside the working tree.
pub const LEDGIT_DIR: &str = ".ledgit";

/// A ledgit repository.
///
/// This is the main entry point. A handle caches nothing but paths and the
/// settings read at open time: HEAD and the index are loaded from disk by
/// each operation and written back before it returns.
#[derive(Debug, Clone)]
pub struct Repository {
    /// The root directory of the working tree.
    root: PathBuf,
    /// The path to the `.ledgit` directory.
    ledgit_dir: PathBuf,
    settings: Settings,
}

impl Repository {
    /// Checks the minimal layout of a `.ledgit` directory.
    fn validate_ledgit_dir(ledgit_dir: &Path) -> Result<()> {
        if !ledgit_dir.is_dir() || !ledgit_dir.join("objects").is_dir() {
            return Err(Error::NotARepository(ledgit_dir.to_path_buf()));
        }
        Ok(())
    }

    fn from_root(root: PathBuf) -> Result<Self> {
        let ledgit_dir = root.join(LEDGIT_DIR);
        Self::validate_ledgit_dir(&ledgit_dir)?;
        let settings = Settings::load(ledgit_dir.join("config"))?;
        Ok(Repository {
            root,
            ledgit_dir,
            settings,
        })
    }

    /// Initializes a repository in `path` with default settings.
    ///
    /// See [`Repository::init_with`].
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::init_with(path, Settings::default())
    }

    /// Initializes a repository in `path`, writing `settings` to the config
    /// file if none exists yet.
    ///
    /// Every piece of the layout is created only if absent, so running this
    /// on an existing repository repairs missing pieces and leaves objects,
    /// HEAD and the index untouched.
    ///
    /// # Errors
    ///
    /// - `Error::AlreadyInitialized` if `.ledgit` already existed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ledgit::Repository;
    ///
    /// let repo = Repository::init("path/to/project").unwrap();
    /// assert!(repo.head().is_none());
    /// ```
    pub fn init_with<P: AsRef<Path>>(path: P, settings: Settings) -> Result<Self> {
        let path = path.as_ref();
        fs::create_dir_all(path)?;
        let root = path.canonicalize()?;
        let ledgit_dir = root.join(LEDGIT_DIR);
        let existed = ledgit_dir.is_dir();

        fs::create_dir_all(ledgit_dir.join("objects"))?;
        create_file_if_absent(ledgit_dir.join("HEAD"), b"")?;
        create_file_if_absent(ledgit_dir.join("index"), b"[]")?;

        create_file_if_absent(
            ledgit_dir.join("config"),
            settings.to_config().to_string().as_bytes(),
        )?;

        if existed {
            return Err(Error::AlreadyInitialized(ledgit_dir));
        }

        info!("initialized repository in {}", ledgit_dir.display());
        Self::from_root(root)
    }

    /// Opens the repository whose working tree root is `path`.
    ///
    /// # Errors
    ///
    /// - `Error::NotARepository` if `path` has no valid `.ledgit` directory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let root = path
            .canonicalize()
            .map_err(|_| Error::NotARepository(path.to_path_buf()))?;
        Self::from_root(root)
    }

    /// Finds a repository by searching upward from `path`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ledgit::Repository;
    ///
    /// let repo = Repository::discover("path/to/project/src").unwrap();
    /// println!("{}", repo.path().display());
    /// ```
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut current = path
            .canonicalize()
            .map_err(|_| Error::NotARepository(path.to_path_buf()))?;

        loop {
            if Self::validate_ledgit_dir(&current.join(LEDGIT_DIR)).is_ok() {
                return Self::from_root(current);
            }
            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Err(Error::NotARepository(path.to_path_buf())),
            }
        }
    }

    /// Returns the working tree root.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Returns the path to the `.ledgit` directory.
    pub fn ledgit_dir(&self) -> &Path {
        &self.ledgit_dir
    }

    /// Returns the settings read when the repository was opened.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the object store.
    pub fn object_store(&self) -> ObjectStore {
        ObjectStore::new(self.ledgit_dir.join("objects"), self.settings.compression)
    }

    /// Returns the staging index file.
    pub fn index_file(&self) -> IndexFile {
        IndexFile::new(self.ledgit_dir.join("index"))
    }

    /// Returns the HEAD file.
    pub fn head_file(&self) -> HeadFile {
        HeadFile::new(self.ledgit_dir.join("HEAD"))
    }

    /// Takes the repository lock if `core.locking` is enabled.
    fn lock(&self) -> Result<Option<LockGuard>> {
        if self.settings.locking {
            LockGuard::acquire(self.ledgit_dir.join("lock")).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Joins `path` onto the root and resolves `.` and `..` lexically.
    fn normalize(&self, path: &Path) -> PathBuf {
        let mut normalized = PathBuf::new();
        for component in self.root.join(path).components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other.as_os_str()),
            }
        }
        normalized
    }

    /// Maps a normalized absolute path to the name recorded in the index:
    /// relative to the root, `/`-separated, valid UTF-8.
    fn index_path(&self, full_path: &Path) -> Result<String> {
        let invalid = |reason: &str| Error::InvalidPath {
            path: full_path.to_path_buf(),
            reason: reason.to_string(),
        };

        let relative = full_path
            .strip_prefix(&self.root)
            .map_err(|_| invalid("outside the repository"))?;

        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(
                    part.to_str()
                        .ok_or_else(|| invalid("file name is not valid UTF-8"))?,
                ),
                _ => return Err(invalid("not a path inside the repository")),
            }
        }

        match parts.first() {
            None => Err(invalid("names the repository root")),
            Some(&first) if first == LEDGIT_DIR => Err(invalid("inside the repository directory")),
            Some(_) => Ok(parts.join("/")),
        }
    }

    /// Stores a working tree file and stages it.
    ///
    /// `path` is relative to the repository root, or absolute. It is recorded
    /// relative to the root with `..` resolved, so `sub/../a.txt` stages
    /// `a.txt`. Staging the same path again appends a second entry; earlier
    /// entries are kept.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidPath` if the path leaves the working tree, points into
    ///   `.ledgit`, or has a non-UTF-8 name.
    /// - `Error::PathNotFound` if the file does not exist.
    /// - `Error::Locked` if another process holds the repository lock.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ledgit::Repository;
    ///
    /// let repo = Repository::open("path/to/project").unwrap();
    /// let digest = repo.add("notes.txt").unwrap();
    /// println!("staged {}", digest.short());
    /// ```
    pub fn add<P: AsRef<Path>>(&self, path: P) -> Result<Digest> {
        let path = path.as_ref();
        let full_path = self.normalize(path);
        let name = self.index_path(&full_path)?;
        if !full_path.is_file() {
            return Err(Error::PathNotFound(path.to_path_buf()));
        }

        let _lock = self.lock()?;
        let content = read_file(&full_path)?;
        let digest = self.object_store().store(&content)?;
        self.index_file().append(name, digest)?;
        Ok(digest)
    }

    /// Records the staged entries as a new commit on top of HEAD.
    ///
    /// The index is emptied and HEAD moves to the new commit. Nothing staged
    /// still produces a commit, with an empty file list.
    ///
    /// # Errors
    ///
    /// - `Error::CorruptData` if the index cannot be parsed.
    /// - `Error::Locked` if another process holds the repository lock.
    pub fn commit(&self, message: &str) -> Result<Digest> {
        let _lock = self.lock()?;
        let parent = self.head();
        let files = self.index_file().snapshot_and_clear()?;
        let record = CommitRecord::new(message, files, parent);

        let digest = self.object_store().store(&record.to_bytes()?)?;
        self.set_head(&digest)?;

        info!(
            "committed {} ({} files, parent {})",
            digest.short(),
            record.files.len(),
            parent.map_or_else(|| "none".to_string(), |p| p.short())
        );
        Ok(digest)
    }

    /// Returns the latest commit, or `None` before the first commit.
    pub fn head(&self) -> Option<Digest> {
        self.head_file().read()
    }

    /// Points HEAD at `digest`.
    pub fn set_head(&self, digest: &Digest) -> Result<()> {
        self.head_file().write(digest)
    }

    /// Reads a commit.
    ///
    /// # Errors
    ///
    /// - `Error::ObjectNotFound` if no object exists under `digest`.
    /// - `Error::CorruptData` if the object is not a commit.
    pub fn get_commit(&self, digest: &Digest) -> Result<Commit> {
        read_commit(&self.object_store(), digest)
    }

    /// Reads a blob.
    pub fn blob(&self, digest: &Digest) -> Result<Blob> {
        self.object_store().get(digest).map(Blob::new)
    }

    /// Resolves a full or abbreviated hex digest.
    ///
    /// # Errors
    ///
    /// - `Error::ObjectNotFound` if nothing matches.
    /// - `Error::InvalidDigest` if the text is malformed or ambiguous.
    pub fn resolve(&self, text: &str) -> Result<Digest> {
        let digest = self.object_store().resolve(text.trim())?;
        debug!("resolved {} to {}", text, digest);
        Ok(digest)
    }

    /// Returns the staged entries, in insertion order.
    pub fn staged(&self) -> Result<Index> {
        self.index_file().current()
    }

    /// Walks history from HEAD, newest first.
    pub fn log(&self) -> History {
        History::new(self.object_store(), self.head())
    }

    /// Builds the ancestry tree from HEAD.
    pub fn ancestry(&self) -> Result<AncestryTree> {
        AncestryTree::from_history(self.log())
    }
}
