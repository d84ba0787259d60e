//! Repository fetcher adapters.
//!
//! - [`GitFetcher`]: runs `git clone` inside the destination
//! - [`LocalDirectoryFetcher`]: copies a template checkout from disk
//! - [`MemoryFetcher`]: scripted trees for tests

mod git;
mod local;
mod memory;

pub use git::GitFetcher;
pub use local::LocalDirectoryFetcher;
pub use memory::MemoryFetcher;
