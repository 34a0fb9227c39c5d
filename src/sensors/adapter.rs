//! Sensor adapters: project one snapshot field into a displayable reading

use super::classes::{DeviceClass, StateClass, Unit};
use super::description::SensorDescription;
use crate::snapshot::SnapshotReader;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone)]
pub struct SensorAdapter {
    description: &'static SensorDescription,
    reader: SnapshotReader,
    unique_id: String,
}

/// One read of one sensor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReading {
    pub name: &'static str,
    pub unique_id: String,
    pub key: &'static str,
    pub value: Option<f64>,
    pub unit: Unit,
    pub device_class: DeviceClass,
    pub state_class: StateClass,
    pub precision: u8,
    /// False when the last refresh failed and this is an older snapshot
    pub available: bool,
}

impl SensorAdapter {
    pub fn new(
        description: &'static SensorDescription,
        reader: SnapshotReader,
        device_slug: &str,
    ) -> Self {
        Self {
            description,
            reader,
            unique_id: format!("{}_{}", device_slug, description.key()),
        }
    }

    pub fn description(&self) -> &'static SensorDescription {
        self.description
    }

    pub fn name(&self) -> &'static str {
        self.description.name
    }

    pub fn key(&self) -> &'static str {
        self.description.key()
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Read the latest snapshot once and derive unit and value from it
    pub fn read(&self) -> SensorReading {
        let (snapshot, available) = self.reader.latest();
        let raw = snapshot.value(self.description.field);
        let (unit, value) = self.description.present(raw);

        SensorReading {
            name: self.description.name,
            unique_id: self.unique_id.clone(),
            key: self.description.key(),
            value,
            unit,
            device_class: self.description.device_class,
            state_class: self.description.state_class,
            precision: self.description.precision,
            available,
        }
    }

    #[cfg(test)]
    pub fn native_value(&self) -> Option<f64> {
        self.read().value
    }

    #[cfg(test)]
    pub fn unit_of_measurement(&self) -> Unit {
        self.read().unit
    }
}

impl fmt::Display for SensorReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => write!(
                f,
                "{}: {:.*} {}",
                self.name,
                self.precision as usize,
                value,
                self.unit
            )?,
            None => write!(f, "{}: unknown", self.name)?,
        }
        if !self.available {
            f.write_str(" (stale)")?;
        }
        Ok(())
    }
}
