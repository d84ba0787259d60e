// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for kiln.
//!
//! This module contains the pure transformation logic: name forms, rule
//! sets, manifest and config rewriting, and the shapes of a run. All I/O is
//! handled via ports (traits) defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or process calls
//! - **Immutable entities**: Requests, targets and rule sets are read-only once built
//! - **Rich domain model**: Behaviour lives in entities, not services
//!
// Public API - what the world sees
pub mod classifier;
pub mod entities;
pub mod error;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use classifier::{AuthFailureMatcher, FailureClassifier, FailureKind};
pub use entities::{
    config_path::ConfigPathRewrite,
    manifest::{ManifestDescriptor, ManifestEdit},
    outcome::{Step, StepReport, StepStatus, WorkflowOutcome},
    profile::{ConfigPathSpec, ManifestSpec, RepositorySources, RuleIdentifiers, TemplateProfile},
    repository::{FetchOutput, FetchRequest, RepositoryTarget},
    request::{HasName, NoName, ProjectRequest, ProjectRequestBuilder},
    rules::{FileFilter, RuleKind, RuleSet, SubstitutionRule},
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{ProjectName, RepositoryRole, RuleSetVersion, Transport};

pub use validation::DomainValidator;
