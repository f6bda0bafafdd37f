//! # Reengage Core
//!
//! Patient re-engagement engine for clinic operations: classifies patients
//! by behavioural recency, computes a bounded propensity-to-return score
//! from weighted signals, selects and executes multi-step multi-channel
//! outreach sequences, and aggregates per-recipient delivery outcomes
//! across batch campaigns.
//!
//! The crate is a pure in-process service boundary. Persistence, message
//! transports and delivery history live behind the contracts in [`ports`]
//! and are injected into [`EngagementService`]; the engine itself keeps no
//! state and recomputes every [`PatientActivitySnapshot`] from live
//! repository facts on each query.
//!
//! **No API concerns**: HTTP/gRPC servers, authentication and request
//! routing belong to the hosting application, not this crate.

pub mod activity;
pub mod campaign;
pub mod config;
pub mod constants;
pub mod error;
pub mod executor;
pub mod outcome;
pub mod personalise;
pub mod ports;
pub mod recommendation;
pub mod scoring;
pub mod sequences;
pub mod service;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod test_support;

pub use activity::{classify, ActivityStatus};
pub use campaign::{CampaignRecipient, CampaignRunner};
pub use config::{
    EngineConfig, PropensityBand, PropensityBands, ReactivationTemplates, ScoringWeights,
};
pub use error::{EngageError, EngageResult};
pub use executor::SequenceExecutor;
pub use outcome::{CampaignExecutionResult, DispatchDetail};
pub use personalise::{personalise, standard_fields, FieldMap};
pub use ports::{
    ActivityRepository, Channel, ChannelAdapter, ChannelRegistry, DeliveryOutcome,
    DispatchOutcome, MessageLog, MessageLogEntry, OutboundMessage, PatientActivityFacts,
};
pub use recommendation::recommend;
pub use scoring::score;
pub use sequences::{Sequence, SequenceLibrary, SequenceStep, TriggerType};
pub use service::{EngagementService, EngagementStatistics, PropensityBandCounts};
pub use snapshot::PatientActivitySnapshot;
