//! Activity facts repository port.

use crate::activity::ActivityStatus;
use crate::error::EngageResult;
use crate::ports::channel::Channel;
use chrono::{DateTime, Utc};
use reengage_types::{EmailAddress, NonEmptyText, PhoneNumber};
use uuid::Uuid;

/// Per-patient aggregated activity facts supplied by the upstream store.
///
/// The upstream query returns one row per patient with at least one
/// recorded non-cancelled visit. `last_visit_date` is still optional
/// defensively: a row without it is excluded from classification rather
/// than failing the whole batch.
#[derive(Clone, Debug)]
pub struct PatientActivityFacts {
    pub patient_id: Uuid,
    pub name: NonEmptyText,
    pub email: Option<EmailAddress>,
    pub phone: Option<PhoneNumber>,
    pub last_visit_date: Option<DateTime<Utc>>,
    /// Total non-cancelled visits ever.
    pub visit_count: u32,
    /// Sum of all invoiced totals, in the clinic's currency.
    pub lifetime_value: f64,
    /// Count of unpaid invoices.
    pub open_invoices_count: u32,
}

impl PatientActivityFacts {
    /// Contact address for `channel`, if one is on file.
    pub fn contact_for(&self, channel: Channel) -> Option<&str> {
        match channel {
            Channel::Email => self.email.as_ref().map(EmailAddress::as_str),
            Channel::Sms | Channel::Whatsapp => self.phone.as_ref().map(PhoneNumber::as_str),
        }
    }
}

/// Read-side port over a clinic's activity data.
///
/// The engine never constructs queries itself; implementations own the
/// aggregation entirely.
pub trait ActivityRepository: Send + Sync {
    /// Fetches the activity facts for every patient of a clinic.
    ///
    /// `status_filter` is an advisory pushdown: the engine always re-applies
    /// the filter on the computed status, so implementations may filter
    /// approximately or ignore the hint altogether.
    ///
    /// # Errors
    ///
    /// Implementations must surface an unreachable upstream as
    /// `EngageError::RepositoryUnavailable` and never return a partial list.
    fn fetch_activity_facts(
        &self,
        clinic_id: Uuid,
        status_filter: Option<&[ActivityStatus]>,
    ) -> EngageResult<Vec<PatientActivityFacts>>;

    /// Display name used for the `{clinica}` template placeholder.
    fn clinic_display_name(&self, clinic_id: Uuid) -> EngageResult<Option<NonEmptyText>>;
}
