//! Stored objects: digests, blobs, commits, and the object store.

pub mod blob;
pub mod commit;
pub mod digest;
pub mod store;

pub use blob::Blob;
pub use commit::{Commit, CommitRecord};
pub use digest::{Digest, DIGEST_BYTES, DIGEST_HEX_LEN};
pub use store::ObjectStore;
