//! Client side of the plant record: status derivation, the confirmation
//! gate and the view-model that drives refresh and submit.

pub mod api;
pub mod confirm;
pub mod status;
pub mod view_model;

pub use api::{ClientError, HttpPlantApi, PlantApi};
pub use confirm::{ConfirmGate, Focus, GateOutcome, GateSignal, GateState, Key};
pub use status::{is_watered_at, status_at, water_action_available, WaterStatus};
pub use view_model::{Notification, PlantViewModel};
