//! References (HEAD).

pub mod head;

pub use head::HeadFile;
