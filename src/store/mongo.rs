use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::{doc, to_bson, DateTime as BsonDateTime, Document};
use mongodb::options::{ClientOptions, ReturnDocument};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::PlantStore;
use crate::error::StoreError;
use crate::models::{PlantRecord, Watering, WateringEvent, HISTORY_LIMIT, SYSTEM_USER};

/// Clave fija del único documento de la planta.
pub const PLANT_ID: &str = "plant";
const COLLECTION: &str = "plants";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct EventDocument {
    date: BsonDateTime,
    user: String,
    #[serde(default)]
    note: String,
}

impl From<&Watering> for EventDocument {
    fn from(watering: &Watering) -> Self {
        EventDocument {
            date: BsonDateTime::from_chrono(watering.watered_at),
            user: watering.user.clone(),
            note: watering.note.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct PlantDocument {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    is_watered: bool,
    #[serde(default)]
    last_watered: Option<BsonDateTime>,
    #[serde(default)]
    last_updated_by: String,
    // None marks a document written before the history existed.
    #[serde(default)]
    watering_history: Option<Vec<EventDocument>>,
    #[serde(default)]
    created_at: Option<BsonDateTime>,
    #[serde(default)]
    updated_at: Option<BsonDateTime>,
}

impl PlantDocument {
    fn into_record(self) -> PlantRecord {
        let now = Utc::now();
        let created_at = self.created_at.map(BsonDateTime::to_chrono).unwrap_or(now);
        PlantRecord {
            is_watered: self.is_watered,
            last_watered: self.last_watered.map(BsonDateTime::to_chrono),
            last_updated_by: self.last_updated_by,
            watering_history: self
                .watering_history
                .unwrap_or_default()
                .into_iter()
                .map(|e| WateringEvent {
                    date: e.date.to_chrono(),
                    user: e.user,
                    note: e.note,
                })
                .collect(),
            created_at,
            updated_at: self.updated_at.map(BsonDateTime::to_chrono).unwrap_or(created_at),
        }
    }
}

pub struct MongoPlantStore {
    plants: Collection<PlantDocument>,
}

impl MongoPlantStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_selection_timeout = Some(Duration::from_secs(10));
        options.app_name = Some("office-plant".to_string());
        let client = Client::with_options(options)?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 }).await?;
        info!(database, "connected to mongodb");
        Ok(Self {
            plants: db.collection(COLLECTION),
        })
    }
}

/// `$setOnInsert` seed for the default record; a no-op once it exists.
fn default_seed(now: BsonDateTime) -> Document {
    doc! {
        "$setOnInsert": {
            "isWatered": false,
            "lastWatered": null,
            "lastUpdatedBy": SYSTEM_USER,
            "wateringHistory": [],
            "createdAt": now,
            "updatedAt": now,
        }
    }
}

/// Single-stage update pipeline: overwrite the scalar fields and rebuild the
/// history as `slice([event] ++ history, HISTORY_LIMIT)` in the same write.
/// User text goes through `$literal` so a leading `$` is never read as a
/// field path.
fn watering_pipeline(watering: &Watering) -> Result<Vec<Document>, StoreError> {
    let event = to_bson(&EventDocument::from(watering))?;
    let limit = HISTORY_LIMIT as i32;
    Ok(vec![doc! {
        "$set": {
            "isWatered": watering.is_watered,
            "lastWatered": BsonDateTime::from_chrono(watering.watered_at),
            "lastUpdatedBy": { "$literal": watering.user.as_str() },
            "wateringHistory": {
                "$slice": [
                    {
                        "$concatArrays": [
                            { "$literal": [event] },
                            { "$ifNull": ["$wateringHistory", []] },
                        ]
                    },
                    limit,
                ]
            },
            "createdAt": { "$ifNull": ["$createdAt", "$$NOW"] },
            "updatedAt": "$$NOW",
        }
    }])
}

#[async_trait]
impl PlantStore for MongoPlantStore {
    fn backend_tag(&self) -> &'static str {
        "mongo"
    }

    async fn get_or_create(&self) -> Result<PlantRecord, StoreError> {
        let mut plant = self
            .plants
            .find_one_and_update(doc! { "_id": PLANT_ID }, default_seed(BsonDateTime::now()))
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or(StoreError::MissingAfterUpsert(PLANT_ID))?;

        if plant.watering_history.is_none() {
            // `null` matches both a missing field and an explicit null.
            self.plants
                .update_one(
                    doc! { "_id": PLANT_ID, "wateringHistory": null },
                    doc! { "$set": { "wateringHistory": [] } },
                )
                .await?;
            plant.watering_history = Some(vec![]);
            info!("backfilled empty watering history on legacy plant record");
        }

        debug!(last_updated_by = %plant.last_updated_by, "plant record read");
        Ok(plant.into_record())
    }

    async fn record_watering(&self, watering: &Watering) -> Result<PlantRecord, StoreError> {
        let plant = self
            .plants
            .find_one_and_update(doc! { "_id": PLANT_ID }, watering_pipeline(watering)?)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or(StoreError::MissingAfterUpsert(PLANT_ID))?;
        Ok(plant.into_record())
    }
}
