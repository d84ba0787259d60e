//! Application layer for kiln.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (WorkflowService, InstantiationService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All rewriting rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{InstantiationService, ManifestChange, TreeStats, WorkflowService};

// Re-export port traits (for adapter implementation)
pub use ports::{DirEntry, Filesystem, NoopObserver, RepositoryFetcher, WorkflowObserver};

pub use error::ApplicationError;
