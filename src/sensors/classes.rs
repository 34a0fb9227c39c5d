//! Device classes, state classes and units understood by Home Assistant

use serde::Serialize;
use std::fmt;

/// Semantic tag used to pick icon and formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Voltage,
    Current,
    Power,
    Battery,
    EnergyStorage,
    Duration,
}

impl DeviceClass {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Voltage => "voltage",
            DeviceClass::Current => "current",
            DeviceClass::Power => "power",
            DeviceClass::Battery => "battery",
            DeviceClass::EnergyStorage => "energy_storage",
            DeviceClass::Duration => "duration",
        }
    }
}

/// Whether a value is instantaneous or a growing total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    /// The value describes the present moment
    Measurement,
    /// A monotonically increasing total
    TotalIncreasing,
}

impl StateClass {
    pub const fn as_str(&self) -> &'static str {
        match self {
            StateClass::Measurement => "measurement",
            StateClass::TotalIncreasing => "total_increasing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Unit {
    #[serde(rename = "V")]
    Volt,
    #[serde(rename = "A")]
    Ampere,
    #[serde(rename = "W")]
    Watt,
    #[serde(rename = "%")]
    Percentage,
    #[serde(rename = "Wh")]
    WattHour,
    #[serde(rename = "h")]
    Hours,
    #[serde(rename = "min")]
    Minutes,
}

impl Unit {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Unit::Volt => "V",
            Unit::Ampere => "A",
            Unit::Watt => "W",
            Unit::Percentage => "%",
            Unit::WattHour => "Wh",
            Unit::Hours => "h",
            Unit::Minutes => "min",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for StateClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_matches_display() {
        for unit in [Unit::Percentage, Unit::WattHour, Unit::Minutes] {
            assert_eq!(
                serde_json::to_string(&unit).unwrap(),
                format!("\"{}\"", unit)
            );
        }
        assert_eq!(
            serde_json::to_string(&DeviceClass::EnergyStorage).unwrap(),
            "\"energy_storage\""
        );
        assert_eq!(
            serde_json::to_string(&StateClass::TotalIncreasing).unwrap(),
            "\"total_increasing\""
        );
    }
}
