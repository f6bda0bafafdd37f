//! Campaign execution results.

use crate::ports::channel::Channel;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of one attempted dispatch within a campaign or sequence run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchDetail {
    pub patient_id: Uuid,
    pub patient_name: String,
    pub channel: Channel,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated delivery outcome across a batch campaign or sequence run.
///
/// `details` holds one entry per attempted dispatch, in a stable order
/// (repository fetch order for batch campaigns). For every counted attempt
/// `sent + failed` accounts for it; sequence runs additionally count their
/// future-scheduled steps in `total` without a matching detail entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignExecutionResult {
    pub total: u32,
    pub sent: u32,
    pub failed: u32,
    pub details: Vec<DispatchDetail>,
}

impl CampaignExecutionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one attempted dispatch.
    pub(crate) fn record_attempt(&mut self, detail: DispatchDetail) {
        self.total += 1;
        if detail.success {
            self.sent += 1;
        } else {
            self.failed += 1;
        }
        self.details.push(detail);
    }

    /// Counts a step that is skipped without a dispatch attempt.
    ///
    /// Skipped steps contribute to `total` only: no success, no failure,
    /// no detail entry.
    pub(crate) fn record_skipped(&mut self) {
        self.total += 1;
    }
}
