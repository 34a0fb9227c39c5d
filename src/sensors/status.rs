//! UPS hat tool functions

use super::SensorAdapter;
use crate::coordinator::FileCoordinator;
use crate::shared::{internal_error, invalid_params};
use rmcp::{model::*, ErrorData as McpError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// === Parameter Types ===

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SensorKeyParams {
    #[schemars(description = "Sensor key, e.g. 'voltage', 'soc' or 'remaining_time'")]
    pub key: String,
}

// === Helper Functions ===

/// Refresh before reading. A failed refresh is not fatal: sensors keep
/// showing the last published snapshot, with `available` set to false.
async fn refresh(coordinator: &FileCoordinator) {
    if coordinator.refresh().await.is_err() {
        tracing::debug!("Serving last snapshot from {:?}", coordinator.path());
    }
}

pub fn format_status(sensors: &[SensorAdapter]) -> String {
    let mut result = String::from("UPS Hat Status:\n\n");

    if sensors.is_empty() {
        result.push_str("No sensors registered.\n");
        return result;
    }

    let mut stale = false;
    for sensor in sensors {
        let reading = sensor.read();
        stale |= !reading.available;
        result.push_str(&format!("  {}\n", reading));
    }

    if stale {
        result.push_str("\n(Last refresh failed; readings may be stale or unknown)\n");
    }
    result
}

pub fn readings_json(sensors: &[SensorAdapter]) -> serde_json::Result<String> {
    let readings: Vec<_> = sensors.iter().map(|s| s.read()).collect();
    serde_json::to_string_pretty(&readings)
}

// === Tool Functions ===

pub async fn list_sensors(sensors: &[SensorAdapter]) -> Result<CallToolResult, McpError> {
    let mut result = format!("Registered sensors ({}):\n\n", sensors.len());
    for sensor in sensors {
        let desc = sensor.description();
        result.push_str(&format!(
            "  {} ({}, id {}): device_class={}, state_class={}, unit={}{}\n",
            sensor.name(),
            sensor.key(),
            sensor.unique_id(),
            desc.device_class,
            desc.state_class,
            desc.unit,
            if desc.unit_selector.is_some() { " or min" } else { "" },
        ));
    }
    Ok(CallToolResult::success(vec![Content::text(result)]))
}

pub async fn get_sensor(
    coordinator: &FileCoordinator,
    sensors: &[SensorAdapter],
    params: SensorKeyParams,
) -> Result<CallToolResult, McpError> {
    let sensor = sensors
        .iter()
        .find(|s| s.key() == params.key)
        .ok_or_else(|| invalid_params(format!("Unknown sensor: {}", params.key)))?;

    refresh(coordinator).await;
    Ok(CallToolResult::success(vec![Content::text(
        sensor.read().to_string(),
    )]))
}

pub async fn get_ups_status(
    coordinator: &FileCoordinator,
    sensors: &[SensorAdapter],
) -> Result<CallToolResult, McpError> {
    refresh(coordinator).await;
    let result = format_status(sensors);
    Ok(CallToolResult::success(vec![Content::text(result)]))
}

pub async fn get_readings_json(
    coordinator: &FileCoordinator,
    sensors: &[SensorAdapter],
) -> Result<CallToolResult, McpError> {
    refresh(coordinator).await;
    let json = readings_json(sensors)
        .map_err(|e| internal_error(format!("Failed to serialize readings: {}", e)))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::description::SENSORS;
    use crate::snapshot::{self, Field, Snapshot, SnapshotReader};
    use std::path::PathBuf;

    fn all_sensors(reader: &SnapshotReader) -> Vec<SensorAdapter> {
        SENSORS
            .iter()
            .map(|d| SensorAdapter::new(d, reader.clone(), "ups"))
            .collect()
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "ina219-ups-hat-status-{}-{}.json",
            name,
            std::process::id()
        ))
    }

    fn text(result: &CallToolResult) -> String {
        result.content[0].as_text().unwrap().text.clone()
    }

    #[test]
    fn test_format_status() {
        let (publisher, reader) = snapshot::channel();
        publisher.publish(
            Snapshot::new()
                .with(Field::Soc, Some(42.0))
                .with(Field::RemainingTime, Some(0.75)),
        );
        let sensors = all_sensors(&reader);

        let status = format_status(&sensors);
        assert!(status.contains("SoC: 42.0 %"));
        assert!(status.contains("Remaining Time: 45 min"));
        assert!(status.contains("Voltage: unknown"));
        assert!(!status.contains("stale"));

        publisher.mark_unavailable();
        let status = format_status(&sensors);
        assert!(status.contains("SoC: 42.0 % (stale)"));
        assert!(status.contains("Last refresh failed"));
    }

    #[test]
    fn test_format_status_empty() {
        assert!(format_status(&[]).contains("No sensors registered"));
    }

    #[tokio::test]
    async fn test_get_sensor_unknown_key_is_invalid_params() {
        let coordinator = FileCoordinator::new(temp_path("unknown"));
        let sensors = all_sensors(&coordinator.reader());

        let err = get_sensor(
            &coordinator,
            &sensors,
            SensorKeyParams {
                key: "temperature".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_get_sensor_flags_stale_reading() {
        let path = temp_path("stale");
        tokio::fs::write(&path, r#"{"voltage": 7.95}"#).await.unwrap();
        let coordinator = FileCoordinator::new(&path);
        let sensors = all_sensors(&coordinator.reader());
        let params = || SensorKeyParams {
            key: "voltage".to_string(),
        };

        let result = get_sensor(&coordinator, &sensors, params()).await.unwrap();
        assert_eq!(text(&result), "Voltage: 7.95 V");

        tokio::fs::remove_file(&path).await.unwrap();
        let result = get_sensor(&coordinator, &sensors, params()).await.unwrap();
        assert_eq!(text(&result), "Voltage: 7.95 V (stale)");
    }

    #[tokio::test]
    async fn test_get_readings_json_short_duration_in_minutes() {
        let path = temp_path("json");
        tokio::fs::write(&path, r#"{"remaining_time_custom": 0.5, "soc": 12.5}"#)
            .await
            .unwrap();
        let coordinator = FileCoordinator::new(&path);
        let sensors = all_sensors(&coordinator.reader());

        let result = get_readings_json(&coordinator, &sensors).await.unwrap();
        let readings: Vec<serde_json::Value> = serde_json::from_str(&text(&result)).unwrap();
        assert_eq!(readings.len(), 9);

        let custom = readings
            .iter()
            .find(|r| r["key"] == "remaining_time_custom")
            .unwrap();
        assert_eq!(custom["unit"], "min");
        assert_eq!(custom["value"], 30.0);
        assert_eq!(custom["device_class"], "duration");
        assert_eq!(custom["available"], true);

        let voltage = readings.iter().find(|r| r["key"] == "voltage").unwrap();
        assert!(voltage["value"].is_null());

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_sensors_mentions_every_key() {
        let (_publisher, reader) = snapshot::channel();
        let sensors = all_sensors(&reader);

        let listing = text(&list_sensors(&sensors).await.unwrap());
        assert!(listing.starts_with("Registered sensors (9)"));
        for desc in &SENSORS {
            assert!(listing.contains(desc.key()), "{}", desc.key());
        }
        assert!(listing.contains("unit=h or min"));
        assert!(listing.contains("id ups_soc_inu"));
    }
}
