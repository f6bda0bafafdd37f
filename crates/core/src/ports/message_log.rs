//! Delivery history port.

use crate::error::EngageResult;
use crate::ports::channel::Channel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Terminal outcome of one dispatch attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    Sent,
    Failed,
}

/// One dispatch attempt, as recorded to the external message log.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageLogEntry {
    pub clinic_id: Uuid,
    pub patient_id: Uuid,
    pub channel: Channel,
    /// Personalised message body as dispatched.
    pub content: String,
    pub outcome: DispatchOutcome,
    pub recorded_at: DateTime<Utc>,
}

/// Write-side port for long-term delivery history.
///
/// Recording is fire-and-forget from the engine's point of view: a failure
/// to record must never fail the dispatch that produced the entry.
pub trait MessageLog: Send + Sync {
    /// Records one dispatch attempt.
    fn record(&self, entry: &MessageLogEntry) -> EngageResult<()>;
}

/// Records an entry, downgrading a failure to a warning.
pub(crate) fn record_or_warn(log: &dyn MessageLog, entry: &MessageLogEntry) {
    if let Err(err) = log.record(entry) {
        tracing::warn!(
            "failed to record message log entry for patient {}: {}",
            entry.patient_id,
            err
        );
    }
}
