//! taskrank-store: task storage collaborators for the scoring engine.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::{MemoryStore, Snapshot};
