//! Error types for the re-engagement engine.
//!
//! Per-recipient delivery problems are deliberately absent from this enum:
//! a failed dispatch or a missing contact channel is recovered locally and
//! recorded in the campaign result details, so batch-level callers always
//! receive a complete `CampaignExecutionResult` rather than an error.

use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum EngageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no outreach sequence registered for trigger '{0}'")]
    SequenceNotFound(String),
    #[error("patient {patient_id} not found in clinic {clinic_id}")]
    PatientNotFound { clinic_id: Uuid, patient_id: Uuid },
    #[error("upstream data source unreachable: {0}")]
    RepositoryUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to read engine configuration: {0}")]
    ConfigRead(std::io::Error),
    #[error("failed to parse engine configuration: {0}")]
    ConfigParse(serde_yaml::Error),
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
}

pub type EngageResult<T> = std::result::Result<T, EngageError>;
