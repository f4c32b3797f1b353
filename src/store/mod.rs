use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{PlantRecord, Watering};

pub mod memory;
pub mod mongo;

pub use memory::MemoryPlantStore;
pub use mongo::MongoPlantStore;

/// Durable home of the singleton plant record.
///
/// Both operations must be atomic at the store level: no caller may observe a
/// half-applied watering, and two concurrent waterings must both land in the
/// history.
#[async_trait]
pub trait PlantStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    /// Returns the record, creating the default one if it does not exist yet.
    async fn get_or_create(&self) -> Result<PlantRecord, StoreError>;

    /// Upserts the watering and returns the record as stored afterwards.
    async fn record_watering(&self, watering: &Watering) -> Result<PlantRecord, StoreError>;
}
