use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::error::PlantError;
use crate::models::{PlantRecord, WaterRequest, Watering};
use crate::sanitize::sanitize_note;
use crate::store::PlantStore;

/// Owns the singleton plant record on top of a `PlantStore`.
#[derive(Clone)]
pub struct PlantService {
    store: Arc<dyn PlantStore>,
}

impl PlantService {
    pub fn new(store: Arc<dyn PlantStore>) -> Self {
        Self { store }
    }

    pub fn backend_tag(&self) -> &'static str {
        self.store.backend_tag()
    }

    #[instrument(skip(self), fields(backend = self.store.backend_tag()))]
    pub async fn read(&self) -> Result<PlantRecord, PlantError> {
        Ok(self.store.get_or_create().await?)
    }

    #[instrument(skip(self, request), fields(backend = self.store.backend_tag()))]
    pub async fn update(&self, request: WaterRequest) -> Result<PlantRecord, PlantError> {
        let watering = validate(request, Utc::now())?;
        let record = self.store.record_watering(&watering).await?;
        info!(
            user = %watering.user,
            watered_at = %watering.watered_at,
            history_len = record.watering_history.len(),
            "plant watering recorded"
        );
        Ok(record)
    }
}

/// Turns a wire request into a `Watering`: the identity must be present, a
/// missing timestamp means `now`, and the note is sanitized.
pub fn validate(request: WaterRequest, now: DateTime<Utc>) -> Result<Watering, PlantError> {
    let user = request.last_updated_by.trim();
    if user.is_empty() {
        return Err(PlantError::InvalidRequest(
            "lastUpdatedBy is required".to_string(),
        ));
    }
    Ok(Watering {
        is_watered: request.is_watered,
        watered_at: request.last_watered.unwrap_or(now),
        user: user.to_string(),
        note: request.note.as_deref().map(sanitize_note).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HISTORY_LIMIT;
    use crate::store::MemoryPlantStore;
    use chrono::{Duration, TimeZone};

    fn service() -> (Arc<MemoryPlantStore>, PlantService) {
        let store = Arc::new(MemoryPlantStore::new());
        (store.clone(), PlantService::new(store))
    }

    fn request(user: &str, at: DateTime<Utc>, note: Option<&str>) -> WaterRequest {
        WaterRequest {
            is_watered: true,
            last_watered: Some(at),
            last_updated_by: user.to_string(),
            note: note.map(str::to_string),
        }
    }

    #[test]
    fn missing_timestamp_defaults_to_now() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let watering = validate(
            WaterRequest {
                is_watered: true,
                last_updated_by: "a@identos.ca".to_string(),
                ..Default::default()
            },
            now,
        )
        .unwrap();
        assert_eq!(watering.watered_at, now);
        assert_eq!(watering.note, "");
    }

    #[test]
    fn blank_identity_is_rejected() {
        let err = validate(
            WaterRequest {
                last_updated_by: "   ".to_string(),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, PlantError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn update_then_read_scenario() {
        let (_, service) = service();
        let fresh = service.read().await.unwrap();
        assert!(!fresh.is_watered);
        assert_eq!(fresh.last_watered, None);
        assert_eq!(fresh.last_updated_by, "system");
        assert!(fresh.watering_history.is_empty());

        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let record = service
            .update(request("alice@example.com", at, Some("looks dry")))
            .await
            .unwrap();
        assert!(record.is_watered);
        assert_eq!(record.last_watered, Some(at));
        assert_eq!(record.last_updated_by, "alice@example.com");
        assert_eq!(record.watering_history.len(), 1);
        assert_eq!(record.watering_history[0].date, at);
        assert_eq!(record.watering_history[0].user, "alice@example.com");
        assert_eq!(record.watering_history[0].note, "looks dry");
        assert_eq!(record.created_at, fresh.created_at);
    }

    #[tokio::test]
    async fn six_updates_keep_five_most_recent() {
        let (_, service) = service();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut last = None;
        for i in 0..6 {
            let at = start + Duration::days(i);
            last = Some(
                service
                    .update(request(&format!("u{i}@identos.ca"), at, None))
                    .await
                    .unwrap(),
            );
        }
        let record = last.unwrap();
        assert_eq!(record.watering_history.len(), HISTORY_LIMIT);
        assert_eq!(record.watering_history[0].date, start + Duration::days(5));
        let dates: Vec<_> = record.watering_history.iter().map(|e| e.date).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
        assert!(record.watering_history.iter().all(|e| e.date != start));
    }

    #[tokio::test]
    async fn note_markup_never_reaches_the_store() {
        let (store, service) = service();
        service
            .update(request(
                "a@identos.ca",
                Utc::now(),
                Some("<script>evil</script>hello"),
            ))
            .await
            .unwrap();
        let stored = store.snapshot().await.unwrap();
        assert_eq!(stored.watering_history[0].note, "evilhello");
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_store_error() {
        let (store, service) = service();
        store.set_unavailable(true);
        let err = service.read().await.unwrap_err();
        assert!(matches!(err, PlantError::Store(_)));
    }
}
