//! Kiln Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for kiln, a tool
//! that turns a template repository into a fresh project: it fetches the
//! template, renames its packages, updates the module manifest and drops the
//! template's version-control metadata.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             kiln-cli (CLI)              │
//! │     (Config, logging, presentation)     │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (WorkflowService, InstantiationService) │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │  (Filesystem, RepositoryFetcher, ...)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      kiln-adapters (Infrastructure)     │
//! │  (LocalFilesystem, GitFetcher, etc)     │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (ProjectRequest, RuleSet, Manifest...)  │
//! │         No External Dependencies        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kiln_core::prelude::*;
//!
//! // 1. Describe the run
//! let request = ProjectRequest::builder()
//!     .name(ProjectName::parse("shop")?)
//!     .output_directory("/work")
//!     .build()?;
//!
//! // 2. Run the workflow (with injected adapters)
//! let service = WorkflowService::new(filesystem, fetcher, TemplateProfile::dilu());
//! let outcome = service.run(&request)?;
//! ```

// Domain layer (stable, well-defined API)
pub mod domain;

// Application layer (orchestration logic)
pub mod application;

// Error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        InstantiationService, WorkflowService,
        ports::{DirEntry, Filesystem, NoopObserver, RepositoryFetcher, WorkflowObserver},
    };
    pub use crate::domain::{
        AuthFailureMatcher, FailureClassifier, ProjectName, ProjectRequest, RepositoryRole,
        RuleSet, RuleSetVersion, Step, StepReport, StepStatus, TemplateProfile, Transport,
        WorkflowOutcome,
    };
    pub use crate::error::{KilnError, KilnResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
