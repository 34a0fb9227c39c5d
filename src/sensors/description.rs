//! Static description of every UPS hat sensor

use super::classes::{DeviceClass, StateClass, Unit};
use super::duration::select_duration_unit;
use crate::snapshot::Field;

/// Computes the unit and display value from the raw field value
pub type UnitSelector = fn(Option<f64>) -> (Unit, Option<f64>);

#[derive(Debug, Clone, Copy)]
pub struct SensorDescription {
    pub field: Field,
    pub name: &'static str,
    /// Unit used when there is no selector
    pub unit: Unit,
    pub device_class: DeviceClass,
    pub state_class: StateClass,
    pub precision: u8,
    pub unit_selector: Option<UnitSelector>,
}

impl SensorDescription {
    const fn measurement(
        field: Field,
        name: &'static str,
        unit: Unit,
        device_class: DeviceClass,
        precision: u8,
    ) -> Self {
        Self {
            field,
            name,
            unit,
            device_class,
            state_class: StateClass::Measurement,
            precision,
            unit_selector: None,
        }
    }

    const fn remaining_time(field: Field, name: &'static str) -> Self {
        Self {
            field,
            name,
            unit: Unit::Hours,
            device_class: DeviceClass::Duration,
            state_class: StateClass::TotalIncreasing,
            precision: 0,
            unit_selector: Some(select_duration_unit),
        }
    }

    pub const fn key(&self) -> &'static str {
        self.field.key()
    }

    /// Unit and display value for a raw reading
    pub fn present(&self, raw: Option<f64>) -> (Unit, Option<f64>) {
        match self.unit_selector {
            Some(select) => select(raw),
            None => (self.unit, raw),
        }
    }
}

pub const SENSORS: [SensorDescription; 9] = [
    SensorDescription::measurement(Field::Voltage, "Voltage", Unit::Volt, DeviceClass::Voltage, 2),
    SensorDescription::measurement(
        Field::Current,
        "Current",
        Unit::Ampere,
        DeviceClass::Current,
        2,
    ),
    SensorDescription::measurement(Field::Power, "Power", Unit::Watt, DeviceClass::Power, 2),
    SensorDescription::measurement(
        Field::ReadPower,
        "Read Power",
        Unit::Watt,
        DeviceClass::Power,
        2,
    ),
    SensorDescription::measurement(Field::Soc, "SoC", Unit::Percentage, DeviceClass::Battery, 1),
    SensorDescription::measurement(
        Field::SocInu,
        "SoC Inu",
        Unit::Percentage,
        DeviceClass::Battery,
        1,
    ),
    SensorDescription::measurement(
        Field::RemainingBatteryCapacity,
        "Remaining Capacity",
        Unit::WattHour,
        DeviceClass::EnergyStorage,
        0,
    ),
    SensorDescription::remaining_time(Field::RemainingTime, "Remaining Time"),
    SensorDescription::remaining_time(Field::RemainingTimeCustom, "Remaining Time Custom"),
];

pub fn find(key: &str) -> Option<&'static SensorDescription> {
    SENSORS.iter().find(|d| d.key() == key)
}
