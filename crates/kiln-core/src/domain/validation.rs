use crate::domain::{
    entities::{ProjectRequest, TemplateProfile},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across services.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_request(request: &ProjectRequest) -> Result<(), DomainError> {
        request.validate()
    }

    pub fn validate_profile(profile: &TemplateProfile) -> Result<(), DomainError> {
        profile.validate()
    }
}
