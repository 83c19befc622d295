use std::fmt;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::error::{MalformedRecord, ModelError};
use crate::packet::{IdentityKey, PacketRecord, PathId};

/// Session status reported by the backend.
///
/// Unrecognised values are kept verbatim in `Unknown` instead of failing the
/// decode; consumers treat them as a no-op.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum TransmissionStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Unknown(String),
}

impl TransmissionStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "idle" | "stopped" | "stopping" => TransmissionStatus::Idle,
            "running" | "started" => TransmissionStatus::Running,
            "completed" | "complete" | "done" | "finished" => TransmissionStatus::Completed,
            _ => TransmissionStatus::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TransmissionStatus::Idle => "idle",
            TransmissionStatus::Running => "running",
            TransmissionStatus::Completed => "completed",
            TransmissionStatus::Unknown(raw) => raw.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TransmissionStatus::Unknown(_))
    }
}

impl fmt::Display for TransmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TransmissionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TransmissionStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TransmissionStatus::parse(&raw))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CompressionStats {
    pub original_size: u64,
    pub compressed_size: u64,
    pub ratio_percent: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TransmissionState {
    pub current_run: u64,
    pub total_runs: u64,
    pub status: TransmissionStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PerformanceStats {
    pub total_rtt: f64,
    pub average_rtt: f64,
    pub average_throughput: f64,
    pub average_packet_loss_rate: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PathCounters {
    pub packets: u64,
    pub success: u64,
}

impl PathCounters {
    /// Success percentage, `None` while nothing has been sent.
    pub fn success_rate(&self) -> Option<f64> {
        if self.packets == 0 {
            None
        } else {
            Some(self.success as f64 / self.packets as f64 * 100.0)
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PathStats {
    pub a: PathCounters,
    pub b: PathCounters,
}

impl PathStats {
    pub fn get(&self, path: PathId) -> &PathCounters {
        match path {
            PathId::PathA => &self.a,
            PathId::PathB => &self.b,
        }
    }
}

/// One full poll of the backend state.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SnapshotModel {
    pub compression: CompressionStats,
    pub transmission: TransmissionState,
    pub performance: PerformanceStats,
    pub paths: PathStats,
    pub packets: Vec<PacketRecord>,
    /// Wire records that were dropped during decoding.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<MalformedRecord>,
}

impl SnapshotModel {
    pub fn with_packets(packets: Vec<PacketRecord>) -> Self {
        Self {
            packets,
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: TransmissionStatus) -> Self {
        self.transmission.status = status;
        self
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        let value: JsonValue = serde_json::from_slice(bytes)?;
        Self::from_json(value)
    }

    /// Decodes a parsed `/api/stats` body. Fails only when the root is not an
    /// object; every section and record is read leniently.
    pub fn from_json(value: JsonValue) -> Result<Self, ModelError> {
        if !value.is_object() {
            return Err(ModelError::NotAnObject);
        }
        let wire: WireSnapshot = serde_json::from_value(value)?;

        let mut packets = Vec::with_capacity(wire.packets.len());
        let mut skipped = Vec::new();
        for (index, raw) in wire.packets.iter().enumerate() {
            match PacketRecord::from_wire(raw) {
                Ok(record) => packets.push(record),
                Err(reason) => skipped.push(MalformedRecord { index, reason }),
            }
        }

        Ok(Self {
            compression: CompressionStats {
                original_size: count(wire.compression.original_size),
                compressed_size: count(wire.compression.compressed_size),
                ratio_percent: real(wire.compression.ratio),
            },
            transmission: TransmissionState {
                current_run: count(wire.transmission.current_run),
                total_runs: count(wire.transmission.total_runs),
                // An absent status must not read as Idle, which would stop polling.
                status: wire
                    .transmission
                    .status
                    .as_deref()
                    .map(TransmissionStatus::parse)
                    .unwrap_or_else(|| TransmissionStatus::Unknown(String::new())),
            },
            performance: PerformanceStats {
                total_rtt: real(wire.performance.total_rtt),
                average_rtt: real(wire.performance.average_rtt),
                average_throughput: real(wire.performance.average_throughput),
                average_packet_loss_rate: real(wire.performance.average_packet_loss_rate),
            },
            paths: PathStats {
                a: wire.paths.path1.into(),
                b: wire.paths.path2.into(),
            },
            packets,
            skipped,
        })
    }

    pub fn status(&self) -> &TransmissionStatus {
        &self.transmission.status
    }

    pub fn min_timestamp(&self) -> Option<i64> {
        self.packets.iter().map(|p| p.timestamp).min()
    }

    /// First record carrying `key`, if any.
    pub fn find(&self, key: &IdentityKey) -> Option<&PacketRecord> {
        self.packets.iter().find(|p| &p.identity_key() == key)
    }
}

impl<'de> Deserialize<'de> for SnapshotModel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        SnapshotModel::from_json(value).map_err(D::Error::custom)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireSnapshot {
    #[serde(deserialize_with = "lenient")]
    compression: WireCompression,
    #[serde(deserialize_with = "lenient")]
    transmission: WireTransmission,
    #[serde(deserialize_with = "lenient")]
    performance: WirePerformance,
    #[serde(deserialize_with = "lenient")]
    paths: WirePaths,
    #[serde(deserialize_with = "lenient")]
    packets: Vec<JsonValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireCompression {
    original_size: Option<f64>,
    compressed_size: Option<f64>,
    #[serde(alias = "ratio_percent")]
    ratio: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireTransmission {
    current_run: Option<f64>,
    total_runs: Option<f64>,
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WirePerformance {
    total_rtt: Option<f64>,
    average_rtt: Option<f64>,
    average_throughput: Option<f64>,
    average_packet_loss_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WirePaths {
    #[serde(alias = "A", deserialize_with = "lenient")]
    path1: WirePathCounters,
    #[serde(alias = "B", deserialize_with = "lenient")]
    path2: WirePathCounters,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WirePathCounters {
    packets: Option<f64>,
    success: Option<f64>,
}

impl From<WirePathCounters> for PathCounters {
    fn from(wire: WirePathCounters) -> Self {
        Self {
            packets: count(wire.packets),
            success: count(wire.success),
        }
    }
}

/// Falls back to the default when a section is null or has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn count(value: Option<f64>) -> u64 {
    value
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round() as u64)
        .unwrap_or(0)
}

fn real(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}
