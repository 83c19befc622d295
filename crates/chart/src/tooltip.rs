use chrono::DateTime;
use pathscope_core_types::{IdentityKey, PacketKind, PacketRecord, SnapshotModel};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    pub title: String,
    pub lines: Vec<String>,
}

impl Tooltip {
    fn fallback(key: &IdentityKey) -> Self {
        Self {
            title: key.to_string(),
            lines: Vec::new(),
        }
    }

    fn from_record(record: &PacketRecord) -> Self {
        let mut lines = vec![format!("time: {}", format_time(record.timestamp))];
        if let Some(path) = record.path {
            lines.push(format!("path: {}", path.tag()));
        }
        if let Some(size) = record.size {
            lines.push(format!("size: {size} B"));
        }
        lines.push(format!("type: {}", record.kind.as_str()));
        lines.push(format!("status: {}", record.status.as_str()));

        let title = match record.kind {
            PacketKind::Data => format!("packet #{}", record.sequence),
            PacketKind::Acknowledgement => format!("ack #{}", record.sequence),
        };
        Self { title, lines }
    }
}

/// Describes the record behind a chart point. A key with no matching record
/// yields a title-only tooltip.
pub fn tooltip_for(snapshot: &SnapshotModel, key: &IdentityKey) -> Tooltip {
    snapshot
        .find(key)
        .map(Tooltip::from_record)
        .unwrap_or_else(|| Tooltip::fallback(key))
}

fn format_time(timestamp_ms: i64) -> String {
    match DateTime::from_timestamp_millis(timestamp_ms) {
        Some(at) => at.format("%H:%M:%S%.3f").to_string(),
        None => format!("{timestamp_ms} ms"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathscope_core_types::{Lane, PacketStatus, PathId};

    #[test]
    fn describes_matching_record() {
        let snapshot = SnapshotModel::with_packets(vec![PacketRecord::data(7, 1_500, PathId::PathB)
            .with_size(1024)
            .with_status(PacketStatus::Acked)]);
        let tip = tooltip_for(&snapshot, &IdentityKey::new(Lane::PathB, 1_500));
        assert_eq!(tip.title, "packet #7");
        assert_eq!(
            tip.lines,
            vec![
                "time: 00:00:01.500",
                "path: B",
                "size: 1024 B",
                "type: data",
                "status: acked",
            ]
        );
    }

    #[test]
    fn missing_record_falls_back_to_key() {
        let tip = tooltip_for(&SnapshotModel::default(), &IdentityKey::new(Lane::Ack, 9));
        assert_eq!(tip.title, "ack-9");
        assert!(tip.lines.is_empty());
    }
}
