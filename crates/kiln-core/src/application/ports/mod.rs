//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `kiln-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: Directory and file operations
//!   - `RepositoryFetcher`: Template repository acquisition
//!   - `WorkflowObserver`: Per-step progress notifications
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{DirEntry, Filesystem, NoopObserver, RepositoryFetcher, WorkflowObserver};

#[cfg(test)]
pub use output::{MockFilesystem, MockRepositoryFetcher};
