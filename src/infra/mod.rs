//! Infrastructure utilities (hashing, compression, filesystem, locking).

pub mod compression;
pub mod fs;
pub mod hash;
pub mod lock;

pub use compression::{compress, decompress};
pub use fs::{create_file_if_absent, read_file, read_file_opt, write_file_atomic};
pub use lock::LockGuard;
