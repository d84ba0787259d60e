//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "instantiate a project from a template".

pub mod instantiation_service;
pub mod workflow_service;

pub use instantiation_service::{InstantiationService, ManifestChange, TreeStats};
pub use workflow_service::WorkflowService;
