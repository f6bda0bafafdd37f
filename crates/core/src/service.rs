//! Engagement service facade.
//!
//! Composes the classification pipeline, the sequence executor and the
//! campaign runner behind the operations exposed to callers. The service
//! is stateless: every collaborator is injected at construction and every
//! snapshot is recomputed from live repository facts per call.

use crate::activity::ActivityStatus;
use crate::campaign::{CampaignRecipient, CampaignRunner};
use crate::config::{EngineConfig, PropensityBand, PropensityBands};
use crate::error::{EngageError, EngageResult};
use crate::executor::SequenceExecutor;
use crate::outcome::CampaignExecutionResult;
use crate::ports::channel::{Channel, ChannelRegistry};
use crate::ports::message_log::MessageLog;
use crate::ports::repository::ActivityRepository;
use crate::sequences::{SequenceLibrary, TriggerType};
use crate::snapshot::PatientActivitySnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// Snapshot counts per propensity band.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropensityBandCounts {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

/// Clinic-wide engagement aggregates.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementStatistics {
    /// Patients with at least one classified snapshot.
    pub total: u32,
    pub by_status: BTreeMap<ActivityStatus, u32>,
    pub by_propensity_band: PropensityBandCounts,
    /// Lifetime value of patients the clinic could still lose: the sum over
    /// `at_risk`, `inactive` and `dormant` snapshots. `active` patients are
    /// not at risk and `lost` value is written off.
    pub value_at_risk: f64,
}

impl EngagementStatistics {
    fn from_snapshots<'a>(
        snapshots: impl Iterator<Item = &'a PatientActivitySnapshot>,
        bands: &PropensityBands,
    ) -> Self {
        let mut stats = Self::default();
        for snapshot in snapshots {
            stats.total += 1;
            *stats.by_status.entry(snapshot.status).or_insert(0) += 1;
            match bands.band_of(snapshot.propensity_score) {
                PropensityBand::High => stats.by_propensity_band.high += 1,
                PropensityBand::Medium => stats.by_propensity_band.medium += 1,
                PropensityBand::Low => stats.by_propensity_band.low += 1,
            }
            if matches!(
                snapshot.status,
                ActivityStatus::AtRisk | ActivityStatus::Inactive | ActivityStatus::Dormant
            ) {
                stats.value_at_risk += snapshot.lifetime_value;
            }
        }
        stats
    }
}

/// Patient re-engagement operations for one deployment.
///
/// Construct once with the injected ports and share freely; the service
/// holds no mutable state of its own.
pub struct EngagementService {
    repository: Arc<dyn ActivityRepository>,
    executor: SequenceExecutor,
    runner: CampaignRunner,
    library: SequenceLibrary,
    config: Arc<EngineConfig>,
}

impl EngagementService {
    pub fn new(
        repository: Arc<dyn ActivityRepository>,
        channels: ChannelRegistry,
        message_log: Arc<dyn MessageLog>,
        library: SequenceLibrary,
        config: EngineConfig,
    ) -> Self {
        let config = Arc::new(config);
        Self {
            executor: SequenceExecutor::new(channels.clone(), Arc::clone(&message_log)),
            runner: CampaignRunner::new(channels, message_log, Arc::clone(&config)),
            repository,
            library,
            config,
        }
    }

    /// Builds a service with the built-in sequence catalog and default
    /// configuration tables.
    pub fn with_defaults(
        repository: Arc<dyn ActivityRepository>,
        channels: ChannelRegistry,
        message_log: Arc<dyn MessageLog>,
    ) -> Self {
        Self::new(
            repository,
            channels,
            message_log,
            SequenceLibrary::built_in(),
            EngineConfig::default(),
        )
    }

    /// Classifies and scores every patient of a clinic.
    ///
    /// `status_filter` is forwarded to the repository as a pushdown hint
    /// and re-applied here on the computed status, so the returned
    /// segmentation honours the derived classification even when the
    /// upstream store filters approximately or not at all. Patients without
    /// a recorded visit are excluded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryUnavailable` when the upstream store cannot be
    /// reached; no partial list is ever returned.
    pub fn identify_inactive_patients(
        &self,
        clinic_id: Uuid,
        status_filter: Option<&[ActivityStatus]>,
    ) -> EngageResult<Vec<PatientActivitySnapshot>> {
        let recipients = self.classified_patients(clinic_id, status_filter, Utc::now())?;
        Ok(recipients
            .into_iter()
            .map(|recipient| recipient.snapshot)
            .collect())
    }

    /// Runs the outreach sequence registered for `trigger` for one patient.
    ///
    /// # Errors
    ///
    /// - `SequenceNotFound` if the catalog has no sequence for `trigger`;
    ///   surfaced before any dispatch work starts.
    /// - `PatientNotFound` if the clinic has no such patient on record.
    /// - `RepositoryUnavailable` when the upstream store cannot be reached.
    pub fn run_sequence_for_patient(
        &self,
        clinic_id: Uuid,
        patient_id: Uuid,
        trigger: TriggerType,
    ) -> EngageResult<CampaignExecutionResult> {
        let sequence = self.library.get(trigger)?;

        let rows = self.repository.fetch_activity_facts(clinic_id, None)?;
        let recipient = rows
            .into_iter()
            .find(|row| row.patient_id == patient_id)
            .ok_or(EngageError::PatientNotFound {
                clinic_id,
                patient_id,
            })?;
        let clinic_name = self.repository.clinic_display_name(clinic_id)?;

        tracing::info!(
            "running '{}' sequence for patient {} of clinic {}",
            sequence.name,
            patient_id,
            clinic_id
        );
        Ok(self
            .executor
            .execute(clinic_id, clinic_name.as_ref(), &recipient, sequence))
    }

    /// Selects the eligible segment and dispatches one reactivation batch.
    ///
    /// The segment is the clinic's patients whose computed status is in
    /// `target_statuses` and whose propensity score clears the configured
    /// eligibility threshold. Per-recipient delivery problems are recorded
    /// in the returned result, never raised as errors.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryUnavailable` when the upstream store cannot be
    /// reached; in that case nothing is dispatched.
    pub fn run_reactivation_campaign(
        &self,
        clinic_id: Uuid,
        target_statuses: &[ActivityStatus],
        channel: Channel,
    ) -> EngageResult<CampaignExecutionResult> {
        let recipients = self.classified_patients(clinic_id, Some(target_statuses), Utc::now())?;
        let clinic_name = self.repository.clinic_display_name(clinic_id)?;
        tracing::info!(
            "starting {} reactivation campaign for clinic {}: {} patients in segment",
            channel,
            clinic_id,
            recipients.len()
        );
        Ok(self
            .runner
            .run(clinic_id, clinic_name.as_ref(), channel, &recipients))
    }

    /// Aggregates clinic-wide engagement statistics.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryUnavailable` when the upstream store cannot be
    /// reached.
    pub fn engagement_statistics(&self, clinic_id: Uuid) -> EngageResult<EngagementStatistics> {
        let recipients = self.classified_patients(clinic_id, None, Utc::now())?;
        Ok(EngagementStatistics::from_snapshots(
            recipients.iter().map(|recipient| &recipient.snapshot),
            &self.config.bands,
        ))
    }

    /// Fetches, classifies and filters a clinic's patients.
    ///
    /// Rows that cannot be classified (no recorded visit, invalid
    /// aggregates) are skipped with a log line rather than failing the
    /// whole batch; order follows the repository fetch order.
    fn classified_patients(
        &self,
        clinic_id: Uuid,
        status_filter: Option<&[ActivityStatus]>,
        as_of: DateTime<Utc>,
    ) -> EngageResult<Vec<CampaignRecipient>> {
        let rows = self
            .repository
            .fetch_activity_facts(clinic_id, status_filter)?;

        let mut recipients = Vec::with_capacity(rows.len());
        for facts in rows {
            let snapshot = match PatientActivitySnapshot::derive(
                &facts,
                clinic_id,
                as_of,
                &self.config.weights,
            ) {
                Ok(Some(snapshot)) => snapshot,
                Ok(None) => {
                    tracing::debug!(
                        "patient {} has no recorded visit, excluded from classification",
                        facts.patient_id
                    );
                    continue;
                }
                Err(err) => {
                    tracing::warn!("skipping patient {}: {}", facts.patient_id, err);
                    continue;
                }
            };
            if let Some(filter) = status_filter {
                if !filter.contains(&snapshot.status) {
                    continue;
                }
            }
            recipients.push(CampaignRecipient { facts, snapshot });
        }
        Ok(recipients)
    }
}
