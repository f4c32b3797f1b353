use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use super::PlantStore;
use crate::error::StoreError;
use crate::models::{PlantRecord, Watering};

/// In-process store. Each operation holds the lock for its whole
/// read-modify-write, so it is atomic.
#[derive(Default)]
pub struct MemoryPlantStore {
    plant: Mutex<Option<PlantRecord>>,
    unavailable: AtomicBool,
}

impl MemoryPlantStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: PlantRecord) -> Self {
        Self {
            plant: Mutex::new(Some(record)),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Makes every following operation fail, as an unreachable database would.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    pub async fn snapshot(&self) -> Option<PlantRecord> {
        self.plant.lock().await.clone()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("memory store marked unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl PlantStore for MemoryPlantStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn get_or_create(&self) -> Result<PlantRecord, StoreError> {
        self.check_available()?;
        let mut plant = self.plant.lock().await;
        let record = plant.get_or_insert_with(|| PlantRecord::new_default(Utc::now()));
        Ok(record.clone())
    }

    async fn record_watering(&self, watering: &Watering) -> Result<PlantRecord, StoreError> {
        self.check_available()?;
        let now = Utc::now();
        let mut plant = self.plant.lock().await;
        let record = plant.get_or_insert_with(|| PlantRecord::new_default(now));
        record.apply(watering, now);
        Ok(record.clone())
    }
}
