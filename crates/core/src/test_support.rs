//! In-memory port fakes shared across the engine tests.

use crate::activity::ActivityStatus;
use crate::error::{EngageError, EngageResult};
use crate::ports::channel::{ChannelAdapter, DeliveryOutcome, OutboundMessage};
use crate::ports::message_log::{MessageLog, MessageLogEntry};
use crate::ports::repository::{ActivityRepository, PatientActivityFacts};
use chrono::{DateTime, Duration, Utc};
use reengage_types::{EmailAddress, NonEmptyText, PhoneNumber};
use std::sync::Mutex;
use uuid::Uuid;

/// Fixed evaluation instant for tests that pass `as_of` explicitly.
pub(crate) fn fixed_now() -> DateTime<Utc> {
    "2026-03-01T12:00:00Z".parse().expect("valid timestamp")
}

/// Clinic display name used throughout the tests.
pub(crate) fn clinic_name() -> NonEmptyText {
    NonEmptyText::new("Clínica Aurora").expect("non-empty clinic name")
}

/// Facts for a reachable patient whose last visit was at `last_visit_date`.
pub(crate) fn facts_visited(name: &str, last_visit_date: DateTime<Utc>) -> PatientActivityFacts {
    let mailbox = name.to_lowercase().replace(' ', ".");
    PatientActivityFacts {
        patient_id: Uuid::new_v4(),
        name: NonEmptyText::new(name).expect("non-empty patient name"),
        email: Some(EmailAddress::new(format!("{mailbox}@example.com")).expect("valid email")),
        phone: Some(PhoneNumber::new("+351 912 345 678").expect("valid phone")),
        last_visit_date: Some(last_visit_date),
        visit_count: 12,
        lifetime_value: 2500.0,
        open_invoices_count: 0,
    }
}

/// Facts for a patient last seen `days_ago` days before now.
///
/// For service-level tests, where the pipeline evaluates against the real
/// clock; the derived day count equals `days_ago`.
pub(crate) fn recent_facts(name: &str, days_ago: i64) -> PatientActivityFacts {
    facts_visited(name, Utc::now() - Duration::days(days_ago))
}

/// Repository fake returning a fixed list of rows.
pub(crate) struct StaticRepository {
    pub rows: Vec<PatientActivityFacts>,
    pub clinic_name: Option<NonEmptyText>,
}

impl ActivityRepository for StaticRepository {
    fn fetch_activity_facts(
        &self,
        _clinic_id: Uuid,
        _status_filter: Option<&[ActivityStatus]>,
    ) -> EngageResult<Vec<PatientActivityFacts>> {
        Ok(self.rows.clone())
    }

    fn clinic_display_name(&self, _clinic_id: Uuid) -> EngageResult<Option<NonEmptyText>> {
        Ok(self.clinic_name.clone())
    }
}

/// Repository fake simulating an unreachable upstream.
pub(crate) struct UnavailableRepository;

impl ActivityRepository for UnavailableRepository {
    fn fetch_activity_facts(
        &self,
        _clinic_id: Uuid,
        _status_filter: Option<&[ActivityStatus]>,
    ) -> EngageResult<Vec<PatientActivityFacts>> {
        Err(EngageError::RepositoryUnavailable(
            "connection refused".into(),
        ))
    }

    fn clinic_display_name(&self, _clinic_id: Uuid) -> EngageResult<Option<NonEmptyText>> {
        Err(EngageError::RepositoryUnavailable(
            "connection refused".into(),
        ))
    }
}

/// Channel adapter recording every send; fails for scripted recipients.
pub(crate) struct RecordingAdapter {
    fail_recipients: Vec<String>,
    sent: Mutex<Vec<(String, OutboundMessage)>>,
}

impl RecordingAdapter {
    pub fn new() -> Self {
        Self {
            fail_recipients: Vec::new(),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// An adapter that reports a provider rejection for these contacts.
    pub fn failing_for(recipients: &[&str]) -> Self {
        Self {
            fail_recipients: recipients.iter().map(|r| (*r).to_owned()).collect(),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sends(&self) -> Vec<(String, OutboundMessage)> {
        self.sent.lock().expect("adapter mutex poisoned").clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sends().len()
    }

    pub fn last_send(&self) -> Option<(String, OutboundMessage)> {
        self.sends().last().cloned()
    }
}

impl ChannelAdapter for RecordingAdapter {
    fn send(&self, recipient_contact: &str, message: &OutboundMessage) -> DeliveryOutcome {
        self.sent
            .lock()
            .expect("adapter mutex poisoned")
            .push((recipient_contact.to_owned(), message.clone()));
        if self.fail_recipients.iter().any(|r| r == recipient_contact) {
            DeliveryOutcome::failed("provider rejected the message")
        } else {
            DeliveryOutcome::delivered()
        }
    }
}

/// Message log fake recording entries; optionally failing every record.
pub(crate) struct RecordingLog {
    entries: Mutex<Vec<MessageLogEntry>>,
    fail: bool,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// A log whose every `record` call fails.
    pub fn failing() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn entries(&self) -> Vec<MessageLogEntry> {
        self.entries.lock().expect("log mutex poisoned").clone()
    }
}

impl MessageLog for RecordingLog {
    fn record(&self, entry: &MessageLogEntry) -> EngageResult<()> {
        if self.fail {
            return Err(EngageError::RepositoryUnavailable(
                "message log store offline".into(),
            ));
        }
        self.entries
            .lock()
            .expect("log mutex poisoned")
            .push(entry.clone());
        Ok(())
    }
}
