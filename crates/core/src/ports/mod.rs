//! External collaborator contracts.
//!
//! The engine reads aggregated activity facts through the repository port,
//! dispatches messages through channel adapters, and records delivery
//! outcomes through the message log port. Concrete implementations (SQL
//! aggregation, SMS/email/WhatsApp providers, audit stores) live outside
//! this crate and are injected into the engagement service.

pub mod channel;
pub mod message_log;
pub mod repository;

pub use channel::{Channel, ChannelAdapter, ChannelRegistry, DeliveryOutcome, OutboundMessage};
pub use message_log::{DispatchOutcome, MessageLog, MessageLogEntry};
pub use repository::{ActivityRepository, PatientActivityFacts};
