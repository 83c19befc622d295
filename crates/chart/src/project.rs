use crate::model::{LanePoint, LaneProjection, LaneScale};
use pathscope_core_types::{PacketRecord, SnapshotModel};
use std::collections::HashSet;

/// Projects the snapshot's packet log with the default lane scale.
pub fn project(snapshot: &SnapshotModel) -> LaneProjection {
    project_with(snapshot, &LaneScale::default())
}

/// Recomputes every lane from scratch. Points within a lane follow ascending
/// timestamp; a repeated identity key keeps only its first occurrence.
pub fn project_with(snapshot: &SnapshotModel, scale: &LaneScale) -> LaneProjection {
    let mut sorted: Vec<&PacketRecord> = snapshot.packets.iter().collect();
    sorted.sort_by_key(|record| record.timestamp);

    let origin = sorted.first().map(|record| record.timestamp).unwrap_or(0);
    let mut seen = HashSet::with_capacity(sorted.len());
    let mut projection = LaneProjection::default();

    for record in sorted {
        let key = record.identity_key();
        if !seen.insert(key.clone()) {
            continue;
        }
        let lane = record.lane();
        projection.lane_mut(lane).push(LanePoint {
            x: record.millis_since(origin) / 1000.0,
            y: scale.y(lane),
            label: format!("#{}", record.sequence),
            key,
        });
    }
    projection
}

/// Text drawn next to each point, in lane order A, B, ack.
pub fn point_labels(projection: &LaneProjection) -> Vec<String> {
    projection.points().map(|point| point.label.clone()).collect()
}
