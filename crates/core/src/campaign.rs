//! Batch reactivation campaigns.

use crate::config::EngineConfig;
use crate::executor;
use crate::outcome::CampaignExecutionResult;
use crate::personalise;
use crate::ports::channel::{Channel, ChannelRegistry, OutboundMessage};
use crate::ports::message_log::MessageLog;
use crate::ports::repository::PatientActivityFacts;
use crate::snapshot::PatientActivitySnapshot;
use reengage_types::NonEmptyText;
use std::sync::Arc;
use uuid::Uuid;

/// A classified campaign recipient: repository facts plus the snapshot
/// derived from them.
#[derive(Clone, Debug)]
pub struct CampaignRecipient {
    pub facts: PatientActivityFacts,
    pub snapshot: PatientActivitySnapshot,
}

/// Drives one reactivation batch across a segment of patients.
pub struct CampaignRunner {
    channels: ChannelRegistry,
    message_log: Arc<dyn MessageLog>,
    config: Arc<EngineConfig>,
}

impl CampaignRunner {
    pub fn new(
        channels: ChannelRegistry,
        message_log: Arc<dyn MessageLog>,
        config: Arc<EngineConfig>,
    ) -> Self {
        Self {
            channels,
            message_log,
            config,
        }
    }

    /// Runs one reactivation batch over pre-segmented recipients.
    ///
    /// Recipients below the eligibility threshold are skipped. Recipients
    /// without contact data for `channel` are excluded from the batch
    /// entirely: no attempt is made and no detail entry is produced, unlike
    /// the sequence executor, which records the same situation as a
    /// failure. Both behaviours are load-bearing for compatibility with
    /// downstream reporting.
    ///
    /// One recipient's dispatch failure never stops the rest of the batch,
    /// and `details` preserves the input (repository fetch) order.
    pub fn run(
        &self,
        clinic_id: Uuid,
        clinic_name: Option<&NonEmptyText>,
        channel: Channel,
        recipients: &[CampaignRecipient],
    ) -> CampaignExecutionResult {
        let mut result = CampaignExecutionResult::new();

        for recipient in recipients {
            let snapshot = &recipient.snapshot;
            if snapshot.propensity_score < self.config.eligibility_threshold {
                tracing::debug!(
                    "patient {} below eligibility threshold ({} < {}), skipping",
                    snapshot.patient_id,
                    snapshot.propensity_score,
                    self.config.eligibility_threshold
                );
                continue;
            }
            if recipient.facts.contact_for(channel).is_none() {
                tracing::debug!(
                    "patient {} has no {} contact on file, excluded from batch",
                    snapshot.patient_id,
                    channel
                );
                continue;
            }

            let fields = personalise::standard_fields(&recipient.facts.name, clinic_name);
            let body = personalise::personalise(
                self.config.templates.for_status(snapshot.status),
                &fields,
            );
            let message = OutboundMessage {
                subject: None,
                body,
            };

            let detail = executor::attempt_dispatch(
                &self.channels,
                self.message_log.as_ref(),
                clinic_id,
                &recipient.facts,
                channel,
                &message,
            );
            result.record_attempt(detail);
        }

        tracing::info!(
            "reactivation campaign for clinic {} finished: {} sent, {} failed of {} attempted",
            clinic_id,
            result.sent,
            result.failed,
            result.total
        );
        result
    }
}
