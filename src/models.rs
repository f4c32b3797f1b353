use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Cuántos riegos recientes se conservan en el historial.
pub const HISTORY_LIMIT: usize = 5;

/// Autor del registro creado automáticamente en la primera lectura.
pub const SYSTEM_USER: &str = "system";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WateringEvent {
    pub date: DateTime<Utc>,
    pub user: String,
    #[serde(default)]
    pub note: String,
}

/// El único registro de riego que existe en el sistema.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlantRecord {
    pub is_watered: bool,
    pub last_watered: Option<DateTime<Utc>>,
    pub last_updated_by: String,
    #[serde(default)]
    pub watering_history: Vec<WateringEvent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlantRecord {
    pub fn new_default(now: DateTime<Utc>) -> Self {
        PlantRecord {
            is_watered: false,
            last_watered: None,
            last_updated_by: SYSTEM_USER.to_string(),
            watering_history: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a watering to the record: scalar fields are overwritten and
    /// the event goes to the head of the capped history.
    pub fn apply(&mut self, watering: &Watering, now: DateTime<Utc>) {
        self.is_watered = watering.is_watered;
        self.last_watered = Some(watering.watered_at);
        self.last_updated_by = watering.user.clone();
        push_capped(&mut self.watering_history, watering.event());
        self.updated_at = now;
    }
}

/// Inserts `event` at the head and drops whatever falls past `HISTORY_LIMIT`.
pub fn push_capped(history: &mut Vec<WateringEvent>, event: WateringEvent) {
    history.insert(0, event);
    history.truncate(HISTORY_LIMIT);
}

/// Cuerpo de `POST /api/plant`. Campos desconocidos se ignoran.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct WaterRequest {
    pub is_watered: bool,
    #[serde(default)]
    pub last_watered: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_updated_by: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// A validated watering: identity checked, timestamp resolved, note sanitized.
#[derive(Debug, Clone, PartialEq)]
pub struct Watering {
    pub is_watered: bool,
    pub watered_at: DateTime<Utc>,
    pub user: String,
    pub note: String,
}

impl Watering {
    pub fn event(&self) -> WateringEvent {
        WateringEvent {
            date: self.watered_at,
            user: self.user.clone(),
            note: self.note.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn watering(user: &str, at: DateTime<Utc>) -> Watering {
        Watering {
            is_watered: true,
            watered_at: at,
            user: user.to_string(),
            note: String::new(),
        }
    }

    #[test]
    fn default_record_has_empty_history() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let record = PlantRecord::new_default(now);
        assert!(!record.is_watered);
        assert_eq!(record.last_watered, None);
        assert_eq!(record.last_updated_by, "system");
        assert!(record.watering_history.is_empty());
    }

    #[test]
    fn sixth_watering_evicts_the_oldest_event() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut record = PlantRecord::new_default(start);
        for i in 0..6 {
            let at = start + Duration::days(i);
            record.apply(&watering(&format!("user{i}@identos.ca"), at), at);
        }
        assert_eq!(record.watering_history.len(), HISTORY_LIMIT);
        assert_eq!(record.watering_history[0].user, "user5@identos.ca");
        assert_eq!(record.watering_history[4].user, "user1@identos.ca");
        assert!(record
            .watering_history
            .iter()
            .all(|e| e.user != "user0@identos.ca"));
        assert_eq!(record.last_updated_by, "user5@identos.ca");
    }

    #[test]
    fn record_serializes_with_camel_case_fields() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let json = serde_json::to_value(PlantRecord::new_default(now)).unwrap();
        assert_eq!(json["isWatered"], false);
        assert!(json["lastWatered"].is_null());
        assert_eq!(json["lastUpdatedBy"], "system");
        assert_eq!(json["wateringHistory"], serde_json::json!([]));
    }

    #[test]
    fn request_ignores_extra_fields_and_missing_note() {
        let req: WaterRequest = serde_json::from_str(
            r#"{"name":"Office Plants","isWatered":true,"lastWatered":"2024-01-01T00:00:00Z","lastUpdatedBy":"a@identos.ca"}"#,
        )
        .unwrap();
        assert!(req.is_watered);
        assert_eq!(req.note, None);
        assert_eq!(
            req.last_watered,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
    }
}
