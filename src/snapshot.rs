//! Measurement snapshot shared between the poller and the sensors
//!
//! The producer replaces the whole snapshot on every poll; readers hold an
//! `Arc` to one complete snapshot per read.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;

/// Fields published by the UPS hat poller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Voltage,
    Current,
    Power,
    ReadPower,
    Soc,
    SocInu,
    RemainingBatteryCapacity,
    RemainingTime,
    RemainingTimeCustom,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Voltage,
        Field::Current,
        Field::Power,
        Field::ReadPower,
        Field::Soc,
        Field::SocInu,
        Field::RemainingBatteryCapacity,
        Field::RemainingTime,
        Field::RemainingTimeCustom,
    ];

    /// Key under which the poller stores this field
    pub const fn key(self) -> &'static str {
        match self {
            Field::Voltage => "voltage",
            Field::Current => "current",
            Field::Power => "power",
            Field::ReadPower => "read_power",
            Field::Soc => "soc",
            Field::SocInu => "soc_inu",
            Field::RemainingBatteryCapacity => "remaining_battery_capacity",
            Field::RemainingTime => "remaining_time",
            Field::RemainingTimeCustom => "remaining_time_custom",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// One complete set of readings, as the poller wrote it.
///
/// Values are kept per key as raw JSON, so an odd entry only affects the
/// sensor reading that key. `null`, a missing key and a non-numeric value
/// all read as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    values: HashMap<String, Value>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(Value::as_f64)
    }

    pub fn value(&self, field: Field) -> Option<f64> {
        self.get(field.key())
    }

    #[cfg(test)]
    pub fn with(mut self, field: Field, value: Option<f64>) -> Self {
        self.values
            .insert(field.key().to_string(), value.map_or(Value::Null, Value::from));
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(Field, f64)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (Field, f64)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(field, value)| (field.key().to_string(), Value::from(value)))
                .collect(),
        }
    }
}

/// What goes through the channel: the snapshot plus whether the last
/// refresh produced it.
#[derive(Debug, Clone)]
struct Published {
    snapshot: Arc<Snapshot>,
    available: bool,
}

/// Create a publisher/reader pair starting from an empty, unavailable snapshot
pub fn channel() -> (SnapshotPublisher, SnapshotReader) {
    let (tx, rx) = watch::channel(Published {
        snapshot: Arc::new(Snapshot::new()),
        available: false,
    });
    (SnapshotPublisher { tx }, SnapshotReader { rx })
}

/// Write side, owned by the single producer
#[derive(Debug)]
pub struct SnapshotPublisher {
    tx: watch::Sender<Published>,
}

impl SnapshotPublisher {
    /// Swap in a new snapshot as a whole
    pub fn publish(&self, snapshot: Snapshot) {
        // send_replace never fails, even with no live readers
        self.tx.send_replace(Published {
            snapshot: Arc::new(snapshot),
            available: true,
        });
    }

    /// Keep the current snapshot but flag it as stale
    pub fn mark_unavailable(&self) {
        self.tx.send_modify(|published| published.available = false);
    }

    pub fn subscribe(&self) -> SnapshotReader {
        SnapshotReader {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read side, cloned into every sensor
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    rx: watch::Receiver<Published>,
}

impl SnapshotReader {
    /// The latest published snapshot
    pub fn current(&self) -> Arc<Snapshot> {
        self.rx.borrow().snapshot.clone()
    }

    /// The latest snapshot together with its availability, taken in one borrow
    pub fn latest(&self) -> (Arc<Snapshot>, bool) {
        let published = self.rx.borrow();
        (published.snapshot.clone(), published.available)
    }
}
