use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::PlantRecord;

/// Días desde el último riego a partir de los cuales hay que revisar.
pub const CHECK_AFTER_DAYS: i64 = 4;
/// Días desde el último riego a partir de los cuales hay que regar.
pub const NEEDS_WATER_AFTER_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaterStatus {
    Watered,
    Check,
    NeedsWater,
}

impl WaterStatus {
    pub fn label(self) -> &'static str {
        match self {
            WaterStatus::Watered => "Watered",
            WaterStatus::Check => "Check Plants",
            WaterStatus::NeedsWater => "Needs Water",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            WaterStatus::Watered => "emerald",
            WaterStatus::Check => "yellow",
            WaterStatus::NeedsWater => "red",
        }
    }
}

/// Derives the display status from the elapsed whole days since
/// `last_watered`.
pub fn status_at(last_watered: Option<DateTime<Utc>>, now: DateTime<Utc>) -> WaterStatus {
    let Some(last) = last_watered else {
        return WaterStatus::NeedsWater;
    };
    let days = (now - last).num_seconds().div_euclid(86_400);
    if days < CHECK_AFTER_DAYS {
        WaterStatus::Watered
    } else if days < NEEDS_WATER_AFTER_DAYS {
        WaterStatus::Check
    } else {
        WaterStatus::NeedsWater
    }
}

/// The stored `isWatered` flag only holds while the derived status is still
/// `Watered`; past that window it has expired.
pub fn is_watered_at(record: &PlantRecord, now: DateTime<Utc>) -> bool {
    record.is_watered && status_at(record.last_watered, now) == WaterStatus::Watered
}

/// The water action is offered only when the status is not `Watered`. The
/// stored flag needs no separate check: outside `Watered` it has expired.
pub fn water_action_available(record: &PlantRecord, now: DateTime<Utc>) -> bool {
    status_at(record.last_watered, now) != WaterStatus::Watered
}
