use crate::model::{RenderedEntrySet, TimelineDiff, TimelineEntry};
use crate::policy::TimelineLayout;
use pathscope_core_types::{PacketRecord, SnapshotModel};
use std::collections::{BTreeSet, HashSet};

/// Stable ascending sort by timestamp; ties keep their wire order.
pub fn sort_for_placement(packets: &[PacketRecord]) -> Vec<&PacketRecord> {
    let mut sorted: Vec<&PacketRecord> = packets.iter().collect();
    sorted.sort_by_key(|record| record.timestamp);
    sorted
}

/// Diffs `snapshot` against the keys already rendered.
///
/// Offsets are measured from the earliest timestamp of *this* snapshot, so the
/// visible window stays dense regardless of session length. A key seen twice in
/// one snapshot is placed once, at its first position in sorted order.
pub fn reconcile(
    previous: &RenderedEntrySet,
    snapshot: &SnapshotModel,
    layout: &TimelineLayout,
) -> TimelineDiff {
    let sorted = sort_for_placement(&snapshot.packets);
    let min_ts = sorted.first().map(|record| record.timestamp).unwrap_or(0);

    let mut current = HashSet::with_capacity(sorted.len());
    let mut to_add = Vec::new();
    for record in sorted {
        let key = record.identity_key();
        if !current.insert(key.clone()) {
            continue;
        }
        if previous.contains(&key) {
            continue;
        }
        let lane = record.lane();
        to_add.push(TimelineEntry {
            offset_px: layout.offset(lane, record.millis_since(min_ts)),
            label: format!("#{}", record.sequence),
            key,
            lane,
            record: record.clone(),
        });
    }

    let to_remove: BTreeSet<_> = previous
        .keys()
        .filter(|key| !current.contains(*key))
        .cloned()
        .collect();

    TimelineDiff {
        to_add,
        to_remove,
        empty: snapshot.packets.is_empty(),
        skipped: snapshot.skipped.len(),
    }
}
