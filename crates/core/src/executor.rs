//! Single-sequence execution for one recipient.

use crate::outcome::{CampaignExecutionResult, DispatchDetail};
use crate::personalise;
use crate::ports::channel::{Channel, ChannelRegistry, DeliveryOutcome, OutboundMessage};
use crate::ports::message_log::{self, DispatchOutcome, MessageLog, MessageLogEntry};
use crate::ports::repository::PatientActivityFacts;
use crate::sequences::Sequence;
use chrono::Utc;
use reengage_types::NonEmptyText;
use std::sync::Arc;
use uuid::Uuid;

/// Runs one outreach sequence for one patient, applying step gating.
pub struct SequenceExecutor {
    channels: ChannelRegistry,
    message_log: Arc<dyn MessageLog>,
}

impl SequenceExecutor {
    pub fn new(channels: ChannelRegistry, message_log: Arc<dyn MessageLog>) -> Self {
        Self {
            channels,
            message_log,
        }
    }

    /// Executes `sequence` for one recipient.
    ///
    /// Only the step with `order == 1` is dispatched. Later steps are
    /// future-scheduled touches with no scheduler behind them yet: they are
    /// counted in `total` but contribute neither `sent` nor `failed` nor a
    /// detail entry (see [`Sequence::future_steps`]).
    ///
    /// A missing contact for the step's channel, a channel without a
    /// registered adapter, and an adapter failure are all recorded as
    /// `failed` details; the executor never aborts a run on one failure.
    pub fn execute(
        &self,
        clinic_id: Uuid,
        clinic_name: Option<&NonEmptyText>,
        recipient: &PatientActivityFacts,
        sequence: &Sequence,
    ) -> CampaignExecutionResult {
        let mut result = CampaignExecutionResult::new();
        let fields = personalise::standard_fields(&recipient.name, clinic_name);

        for step in &sequence.steps {
            if step.order != 1 {
                tracing::debug!(
                    "skipping step {} of '{}' ({} days out, condition: {})",
                    step.order,
                    sequence.name,
                    step.days_after_start,
                    step.condition.as_deref().unwrap_or("none")
                );
                result.record_skipped();
                continue;
            }

            let message = OutboundMessage {
                subject: (!step.subject.is_empty())
                    .then(|| personalise::personalise(&step.subject, &fields)),
                body: personalise::personalise(&step.message_template, &fields),
            };
            let detail = attempt_dispatch(
                &self.channels,
                self.message_log.as_ref(),
                clinic_id,
                recipient,
                step.channel,
                &message,
            );
            result.record_attempt(detail);
        }

        result
    }
}

/// Dispatches one personalised message and records the attempt.
///
/// Never returns an error: a missing contact, an unregistered channel and a
/// transport failure all become a `failed` detail so the surrounding batch
/// keeps going. Every attempt is recorded to the message log; a log failure
/// is downgraded to a warning.
pub(crate) fn attempt_dispatch(
    channels: &ChannelRegistry,
    log: &dyn MessageLog,
    clinic_id: Uuid,
    recipient: &PatientActivityFacts,
    channel: Channel,
    message: &OutboundMessage,
) -> DispatchDetail {
    let outcome = match recipient.contact_for(channel) {
        Some(contact) => match channels.adapter_for(channel) {
            Some(adapter) => adapter.send(contact, message),
            None => DeliveryOutcome::failed(format!(
                "no adapter configured for channel '{channel}'"
            )),
        },
        None => DeliveryOutcome::failed(format!(
            "patient has no contact on file for channel '{channel}'"
        )),
    };

    if let Some(error) = &outcome.error {
        tracing::warn!(
            "dispatch to patient {} via {} failed: {}",
            recipient.patient_id,
            channel,
            error
        );
    }

    message_log::record_or_warn(
        log,
        &MessageLogEntry {
            clinic_id,
            patient_id: recipient.patient_id,
            channel,
            content: message.body.clone(),
            outcome: if outcome.success {
                DispatchOutcome::Sent
            } else {
                DispatchOutcome::Failed
            },
            recorded_at: Utc::now(),
        },
    );

    DispatchDetail {
        patient_id: recipient.patient_id,
        patient_name: recipient.name.as_str().to_owned(),
        channel,
        success: outcome.success,
        error: outcome.error,
    }
}
