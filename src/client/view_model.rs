use chrono::{DateTime, Utc};
use tracing::warn;

use super::api::PlantApi;
use super::confirm::{ConfirmGate, GateOutcome, GateSignal};
use super::status::{status_at, water_action_available, WaterStatus};
use crate::models::{PlantRecord, WaterRequest};

pub const WATERED_TOAST: &str = "Plant watered!";
pub const WATER_FAILED_TOAST: &str = "Failed to water plant. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

/// Per-session view state: the local copy of the record plus the ephemeral
/// bits (pending flag, confirmation gate, queued notifications).
#[derive(Debug)]
pub struct PlantViewModel {
    identity: String,
    record: Option<PlantRecord>,
    pending: bool,
    error: Option<String>,
    gate: ConfirmGate,
    notifications: Vec<Notification>,
}

impl PlantViewModel {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            record: None,
            pending: false,
            error: None,
            gate: ConfirmGate::default(),
            notifications: Vec::new(),
        }
    }

    pub fn record(&self) -> Option<&PlantRecord> {
        self.record.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn gate(&self) -> &ConfirmGate {
        &self.gate
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn status(&self, now: DateTime<Utc>) -> WaterStatus {
        status_at(self.record.as_ref().and_then(|r| r.last_watered), now)
    }

    /// Disabled while a submission is in flight.
    pub fn can_water(&self, now: DateTime<Utc>) -> bool {
        !self.pending
            && self
                .record
                .as_ref()
                .is_some_and(|record| water_action_available(record, now))
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub async fn refresh(&mut self, api: &dyn PlantApi) {
        self.error = None;
        match api.fetch().await {
            Ok(record) => self.record = Some(record),
            Err(err) => {
                warn!(error = %err, "could not load plant record");
                self.error = Some("Could not load plant data.".to_string());
            }
        }
    }

    /// Feeds a signal to the confirmation gate; a confirmation submits the
    /// watering before returning.
    pub async fn dispatch(
        &mut self,
        api: &dyn PlantApi,
        signal: GateSignal,
        now: DateTime<Utc>,
    ) -> GateOutcome {
        if signal == GateSignal::Open && !self.can_water(now) {
            return GateOutcome::Ignored;
        }
        let outcome = self.gate.handle(signal);
        if let GateOutcome::Confirmed { note } = &outcome {
            self.submit(api, note.clone(), now).await;
        }
        outcome
    }

    async fn submit(&mut self, api: &dyn PlantApi, note: String, now: DateTime<Utc>) {
        self.pending = true;
        self.error = None;
        let request = WaterRequest {
            is_watered: true,
            last_watered: Some(now),
            last_updated_by: self.identity.clone(),
            note: Some(note),
        };
        match api.water(request).await {
            Ok(record) => {
                self.record = Some(record);
                self.notifications
                    .push(Notification::Success(WATERED_TOAST.to_string()));
            }
            Err(err) => {
                warn!(error = %err, "could not record watering");
                self.error = Some("Could not update plant.".to_string());
                self.notifications
                    .push(Notification::Error(WATER_FAILED_TOAST.to_string()));
            }
        }
        self.pending = false;
    }
}
