//! Infrastructure adapters for kiln.
//!
//! This crate implements the ports defined in `kiln-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod fetcher;
pub mod filesystem;
pub mod profile_loader;

// Re-export commonly used adapters
pub use fetcher::{GitFetcher, LocalDirectoryFetcher, MemoryFetcher};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use profile_loader::{load_profile, parse_profile};
