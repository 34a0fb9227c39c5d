//! Sensor platform setup

use crate::config::Config;
use crate::sensors::description::SENSORS;
use crate::sensors::SensorAdapter;
use crate::snapshot::SnapshotReader;

/// Handed over by the coordinator when the UPS hat is discovered
#[derive(Debug, Clone)]
pub struct DiscoveryInfo {
    pub reader: SnapshotReader,
}

/// Register the UPS hat sensors.
///
/// Only runs when set up through discovery; without discovery info nothing
/// is registered.
pub fn setup_platform<F>(discovery: Option<DiscoveryInfo>, config: &Config, add_entities: F)
where
    F: FnOnce(Vec<SensorAdapter>),
{
    let Some(discovery) = discovery else {
        tracing::debug!("Sensor platform set up without discovery info, skipping");
        return;
    };

    let slug = config.device_slug();
    let sensors: Vec<SensorAdapter> = SENSORS
        .iter()
        .filter(|desc| {
            let enabled = config.is_enabled(desc.key());
            if !enabled {
                tracing::info!("Disabled sensor: {}", desc.key());
            }
            enabled
        })
        .map(|desc| SensorAdapter::new(desc, discovery.reader.clone(), &slug))
        .collect();

    for key in &config.disabled {
        if crate::sensors::description::find(key).is_none() {
            tracing::warn!("Config disables unknown sensor: {}", key);
        }
    }

    tracing::info!("Registering {} sensors for {}", sensors.len(), config.device_name);
    add_entities(sensors);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot;

    #[test]
    fn test_no_discovery_registers_nothing() {
        let mut called = false;
        setup_platform(None, &Config::default(), |_| called = true);
        assert!(!called);
    }

    #[test]
    fn test_registers_all_nine_in_order() {
        let (_publisher, reader) = snapshot::channel();
        let mut registered = Vec::new();
        setup_platform(Some(DiscoveryInfo { reader }), &Config::default(), |sensors| {
            registered = sensors
        });

        let names: Vec<&str> = registered.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            [
                "Voltage",
                "Current",
                "Power",
                "Read Power",
                "SoC",
                "SoC Inu",
                "Remaining Capacity",
                "Remaining Time",
                "Remaining Time Custom",
            ]
        );
        assert_eq!(registered[0].unique_id(), "ina219_ups_hat_voltage");
    }

    #[test]
    fn test_disabled_sensors_are_skipped() {
        let (_publisher, reader) = snapshot::channel();
        let mut config = Config::default();
        config.disable("read_power");
        config.disable("no_such_sensor");

        let mut keys = Vec::new();
        setup_platform(Some(DiscoveryInfo { reader }), &config, |sensors| {
            keys = sensors.iter().map(|s| s.key()).collect()
        });

        assert_eq!(keys.len(), 8);
        assert!(!keys.contains(&"read_power"));
    }
}
