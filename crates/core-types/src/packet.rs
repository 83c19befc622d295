use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value as JsonValue};

use crate::error::{ModelError, SkipReason};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PathId {
    PathA,
    PathB,
}

impl PathId {
    pub fn tag(self) -> &'static str {
        match self {
            PathId::PathA => "A",
            PathId::PathB => "B",
        }
    }

    /// Accepts both the `path1`/`path2` names the backend reports and the
    /// short `A`/`B` forms.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "a" | "path1" | "patha" | "path_a" => Some(PathId::PathA),
            "b" | "path2" | "pathb" | "path_b" => Some(PathId::PathB),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PacketKind {
    Data,
    Acknowledgement,
}

impl PacketKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "data" => Some(PacketKind::Data),
            "ack" | "acked" | "acknowledgement" => Some(PacketKind::Acknowledgement),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PacketKind::Data => "data",
            PacketKind::Acknowledgement => "ack",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PacketStatus {
    Sent,
    Acked,
    Lost,
}

impl PacketStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sent" => Some(PacketStatus::Sent),
            "acked" | "ack" => Some(PacketStatus::Acked),
            "lost" => Some(PacketStatus::Lost),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PacketStatus::Sent => "sent",
            PacketStatus::Acked => "acked",
            PacketStatus::Lost => "lost",
        }
    }
}

/// One entry of the backend packet log. Immutable once observed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketRecord {
    /// Unique within a session and path, not globally.
    pub sequence: u64,
    pub timestamp: i64,
    pub path: Option<PathId>,
    pub size: Option<u64>,
    pub kind: PacketKind,
    pub status: PacketStatus,
}

impl PacketRecord {
    pub fn data(sequence: u64, timestamp: i64, path: PathId) -> Self {
        Self {
            sequence,
            timestamp,
            path: Some(path),
            size: None,
            kind: PacketKind::Data,
            status: PacketStatus::Sent,
        }
    }

    pub fn ack(sequence: u64, timestamp: i64) -> Self {
        Self {
            sequence,
            timestamp,
            path: None,
            size: None,
            kind: PacketKind::Acknowledgement,
            status: PacketStatus::Acked,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_status(mut self, status: PacketStatus) -> Self {
        self.status = status;
        self
    }

    pub fn lane(&self) -> Lane {
        Lane::of(self)
    }

    pub fn identity_key(&self) -> IdentityKey {
        identity_key(self)
    }

    /// Milliseconds from `origin` to this record. Widened before subtracting,
    /// so any pair of wire timestamps gives a finite value.
    pub fn millis_since(&self, origin: i64) -> f64 {
        (i128::from(self.timestamp) - i128::from(origin)) as f64
    }

    /// Decodes one wire record. Never panics; anything that cannot become a
    /// valid record is reported as a [`SkipReason`].
    pub fn from_wire(value: &JsonValue) -> Result<Self, SkipReason> {
        let wire = WirePacket::deserialize(value)
            .map_err(|err| SkipReason::Undecodable(err.to_string()))?;

        let timestamp = wire
            .timestamp
            .as_ref()
            .and_then(number_to_i64)
            .ok_or(SkipReason::MissingTimestamp)?;
        let sequence = wire
            .sequence
            .as_ref()
            .and_then(number_to_u64)
            .ok_or(SkipReason::MissingSequence)?;

        let path = match wire.path.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                Some(PathId::parse(raw).ok_or_else(|| SkipReason::UnknownPath(raw.to_string()))?)
            }
        };

        let kind = match wire.kind.as_deref() {
            Some(raw) => {
                PacketKind::parse(raw).ok_or_else(|| SkipReason::UnknownKind(raw.to_string()))?
            }
            None if path.is_some() => PacketKind::Data,
            None => PacketKind::Acknowledgement,
        };
        if kind == PacketKind::Data && path.is_none() {
            return Err(SkipReason::MissingPath);
        }

        let status = match wire.status.as_deref() {
            Some(raw) => PacketStatus::parse(raw)
                .ok_or_else(|| SkipReason::UnknownStatus(raw.to_string()))?,
            None => PacketStatus::Sent,
        };

        Ok(Self {
            sequence,
            timestamp,
            path,
            size: wire.size.as_ref().and_then(number_to_u64),
            kind,
            status,
        })
    }
}

/// Visual track a record is drawn on.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    PathA,
    PathB,
    Ack,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::PathA, Lane::PathB, Lane::Ack];

    /// Acknowledgements share one lane whatever path they report.
    pub fn of(record: &PacketRecord) -> Self {
        match (record.kind, record.path) {
            (PacketKind::Acknowledgement, _) => Lane::Ack,
            (PacketKind::Data, Some(PathId::PathA)) => Lane::PathA,
            (PacketKind::Data, Some(PathId::PathB)) => Lane::PathB,
            (PacketKind::Data, None) => Lane::Ack,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Lane::PathA => "A",
            Lane::PathB => "B",
            Lane::Ack => "ack",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Lane::PathA => "Path A",
            Lane::PathB => "Path B",
            Lane::Ack => "ACK",
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Stable key matching a record across polls: `"<lane-tag>-<timestamp>"`.
///
/// The sequence number is not part of the key because it repeats across
/// paths and acknowledgements carry no path.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn new(lane: Lane, timestamp: i64) -> Self {
        Self(format!("{}-{}", lane.tag(), timestamp))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for IdentityKey {
    type Err = ModelError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidKey(raw.to_string());
        let (tag, timestamp) = raw.split_once('-').ok_or_else(invalid)?;
        let lane = Lane::ALL
            .into_iter()
            .find(|lane| lane.tag() == tag)
            .ok_or_else(invalid)?;
        let timestamp = timestamp.parse::<i64>().map_err(|_| invalid())?;
        Ok(Self::new(lane, timestamp))
    }
}

pub fn identity_key(record: &PacketRecord) -> IdentityKey {
    IdentityKey::new(Lane::of(record), record.timestamp)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WirePacket {
    sequence: Option<Number>,
    timestamp: Option<Number>,
    path: Option<String>,
    size: Option<Number>,
    #[serde(rename = "type", alias = "kind")]
    kind: Option<String>,
    status: Option<String>,
}

// Fractional milliseconds are rounded to the nearest whole millisecond.
fn number_to_i64(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
            .map(|f| f.round() as i64)
    })
}

fn number_to_u64(n: &Number) -> Option<u64> {
    n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0 && *f < u64::MAX as f64)
            .map(|f| f.round() as u64)
    })
}
