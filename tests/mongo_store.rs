//! Runs against a real MongoDB: `MONGO_URI=mongodb://localhost:27017 cargo test -- --ignored`.

use chrono::{Duration, TimeZone, Utc};
use mongodb::bson::doc;
use office_plant::models::Watering;
use office_plant::{MongoPlantStore, PlantStore, HISTORY_LIMIT};

fn mongo_uri() -> String {
    std::env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
}

async fn fresh_store(name: &str) -> MongoPlantStore {
    let client = mongodb::Client::with_uri_str(mongo_uri())
        .await
        .expect("mongo client");
    client
        .database(name)
        .drop()
        .await
        .expect("drop test database");
    MongoPlantStore::connect(&mongo_uri(), name)
        .await
        .expect("connect store")
}

#[tokio::test]
#[ignore = "needs a running MongoDB"]
async fn read_is_idempotent_and_updates_are_capped() {
    let store = fresh_store("office_plant_test_cap").await;
    let first = store.get_or_create().await.expect("first read");
    let second = store.get_or_create().await.expect("second read");
    assert_eq!(first.created_at, second.created_at);
    assert_eq!(first.last_updated_by, "system");
    assert!(first.watering_history.is_empty());

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut last = None;
    for i in 0..6 {
        let watering = Watering {
            is_watered: true,
            watered_at: start + Duration::days(i),
            user: format!("u{i}@identos.ca"),
            note: "$not_a_path".to_string(),
        };
        last = Some(store.record_watering(&watering).await.expect("water"));
    }
    let record = last.expect("record");
    assert_eq!(record.watering_history.len(), HISTORY_LIMIT);
    assert_eq!(record.watering_history[0].user, "u5@identos.ca");
    assert_eq!(record.watering_history[0].note, "$not_a_path");
    assert!(record.watering_history.iter().all(|e| e.user != "u0@identos.ca"));
}

#[tokio::test]
#[ignore = "needs a running MongoDB"]
async fn legacy_record_gets_history_backfilled() {
    let name = "office_plant_test_legacy";
    let store = fresh_store(name).await;
    let client = mongodb::Client::with_uri_str(mongo_uri())
        .await
        .expect("mongo client");
    client
        .database(name)
        .collection::<mongodb::bson::Document>("plants")
        .insert_one(doc! { "_id": "plant", "isWatered": true, "lastUpdatedBy": "old@identos.ca" })
        .await
        .expect("seed legacy record");

    let record = store.get_or_create().await.expect("read");
    assert!(record.is_watered);
    assert_eq!(record.last_updated_by, "old@identos.ca");
    assert!(record.watering_history.is_empty());

    let raw = client
        .database(name)
        .collection::<mongodb::bson::Document>("plants")
        .find_one(doc! { "_id": "plant" })
        .await
        .expect("find")
        .expect("document");
    assert!(raw.get_array("wateringHistory").expect("backfilled").is_empty());
}
