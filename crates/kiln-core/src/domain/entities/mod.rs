pub mod config_path;
pub mod manifest;
pub mod outcome;
pub mod profile;
pub mod repository;
pub mod request;
pub mod rules;

pub use crate::domain::DomainError;
pub use outcome::WorkflowOutcome;
pub use profile::TemplateProfile;
pub use request::ProjectRequest;
pub use rules::RuleSet;
