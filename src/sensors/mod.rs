//! UPS hat sensors: descriptions, unit handling and adapters

pub mod adapter;
pub mod classes;
pub mod description;
pub mod duration;
pub mod status;

pub use adapter::{SensorAdapter, SensorReading};
