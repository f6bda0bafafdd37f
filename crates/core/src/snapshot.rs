//! Per-patient activity snapshot derivation.

use crate::activity::{self, ActivityStatus};
use crate::config::ScoringWeights;
use crate::error::EngageResult;
use crate::ports::repository::PatientActivityFacts;
use crate::recommendation;
use crate::scoring;
use chrono::{DateTime, Utc};
use reengage_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One patient's engagement picture at a single evaluation instant.
///
/// Snapshots are ephemeral: they are recomputed on every query from live
/// repository facts and never persisted by the engine. `status`,
/// `propensity_score` and `recommendation` are pure functions of the other
/// fields, so recomputing from equal inputs always yields an equal
/// snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatientActivitySnapshot {
    pub patient_id: Uuid,
    pub clinic_id: Uuid,
    pub patient_name: NonEmptyText,
    pub last_visit_date: DateTime<Utc>,
    pub days_since_last_visit: i64,
    pub status: ActivityStatus,
    pub visit_count: u32,
    pub lifetime_value: f64,
    pub open_invoices_count: u32,
    pub propensity_score: u8,
    pub recommendation: String,
}

impl PatientActivitySnapshot {
    /// Derives a snapshot from repository facts as of a given instant.
    ///
    /// Returns `Ok(None)` for rows without a recorded visit; those patients
    /// are excluded from classification rather than failing the batch.
    ///
    /// # Errors
    ///
    /// Propagates `EngageError::InvalidInput` from the scorer when the row
    /// carries an invalid lifetime value.
    pub fn derive(
        facts: &PatientActivityFacts,
        clinic_id: Uuid,
        as_of: DateTime<Utc>,
        weights: &ScoringWeights,
    ) -> EngageResult<Option<Self>> {
        let Some(last_visit_date) = facts.last_visit_date else {
            return Ok(None);
        };

        // A visit recorded later the same day can put the raw difference a
        // few hours into the future; that is zero-day recency, not bad input.
        let days_since_last_visit = (as_of - last_visit_date).num_days().max(0);

        let status = activity::classify(days_since_last_visit)?;
        let propensity_score = scoring::score(
            weights,
            days_since_last_visit,
            facts.visit_count,
            facts.lifetime_value,
            facts.open_invoices_count,
        )?;
        let recommendation = recommendation::recommend(
            status,
            propensity_score,
            facts.visit_count,
            facts.open_invoices_count,
        );

        Ok(Some(Self {
            patient_id: facts.patient_id,
            clinic_id,
            patient_name: facts.name.clone(),
            last_visit_date,
            days_since_last_visit,
            status,
            visit_count: facts.visit_count,
            lifetime_value: facts.lifetime_value,
            open_invoices_count: facts.open_invoices_count,
            propensity_score,
            recommendation,
        }))
    }
}
