use pathscope_core_types::{IdentityKey, Lane, PacketRecord};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A record placed on the time axis, ready to be materialised by a sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub key: IdentityKey,
    pub lane: Lane,
    pub offset_px: f64,
    pub label: String,
    pub record: PacketRecord,
}

/// Result of diffing one snapshot against what is already on screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimelineDiff {
    /// New entries in ascending timestamp order.
    pub to_add: Vec<TimelineEntry>,
    pub to_remove: BTreeSet<IdentityKey>,
    /// The snapshot carried no usable packet records.
    pub empty: bool,
    pub skipped: usize,
}

impl TimelineDiff {
    pub fn is_noop(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TimelineOp {
    Append { entry: TimelineEntry },
    Remove { lane: Lane, key: IdentityKey },
    Placeholder { visible: bool },
}

/// Identity keys currently materialised on the timeline, with their lane.
///
/// Only the reconciliation core mutates this set; sinks never read it.
#[derive(Debug, Clone, Default)]
pub struct RenderedEntrySet {
    entries: BTreeMap<IdentityKey, Lane>,
    placeholder: bool,
}

impl RenderedEntrySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &IdentityKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn lane_of(&self, key: &IdentityKey) -> Option<Lane> {
        self.entries.get(key).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &IdentityKey> {
        self.entries.keys()
    }

    pub fn keys_in(&self, lane: Lane) -> impl Iterator<Item = &IdentityKey> {
        self.entries
            .iter()
            .filter(move |(_, l)| **l == lane)
            .map(|(key, _)| key)
    }

    pub fn placeholder_visible(&self) -> bool {
        self.placeholder
    }

    /// Operations that bring a sink from this set to the post-diff state.
    /// Removals come before appends; the placeholder toggles only when its
    /// visibility actually changes.
    pub fn to_ops(&self, diff: &TimelineDiff) -> Vec<TimelineOp> {
        let mut ops = Vec::with_capacity(diff.to_remove.len() + diff.to_add.len() + 1);
        for key in &diff.to_remove {
            if let Some(lane) = self.lane_of(key) {
                ops.push(TimelineOp::Remove {
                    lane,
                    key: key.clone(),
                });
            }
        }

        let remaining = self.len() - diff.to_remove.len().min(self.len()) + diff.to_add.len();
        let show_placeholder = diff.empty && remaining == 0;
        if show_placeholder != self.placeholder && !show_placeholder {
            ops.push(TimelineOp::Placeholder { visible: false });
        }

        for entry in &diff.to_add {
            ops.push(TimelineOp::Append {
                entry: entry.clone(),
            });
        }

        if show_placeholder != self.placeholder && show_placeholder {
            ops.push(TimelineOp::Placeholder { visible: true });
        }
        ops
    }

    pub fn absorb(&mut self, diff: &TimelineDiff) {
        for key in &diff.to_remove {
            self.entries.remove(key);
        }
        for entry in &diff.to_add {
            self.entries.insert(entry.key.clone(), entry.lane);
        }
        self.placeholder = diff.empty && self.entries.is_empty();
    }

    pub fn apply(&mut self, diff: &TimelineDiff) -> Vec<TimelineOp> {
        let ops = self.to_ops(diff);
        self.absorb(diff);
        ops
    }

    /// Drops every entry, returning the removals a sink must perform.
    pub fn clear(&mut self) -> Vec<TimelineOp> {
        let mut ops: Vec<TimelineOp> = std::mem::take(&mut self.entries)
            .into_iter()
            .map(|(key, lane)| TimelineOp::Remove { lane, key })
            .collect();
        if self.placeholder {
            self.placeholder = false;
            ops.push(TimelineOp::Placeholder { visible: false });
        }
        ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathscope_core_types::PathId;

    fn entry(record: PacketRecord) -> TimelineEntry {
        TimelineEntry {
            key: record.identity_key(),
            lane: record.lane(),
            offset_px: 0.0,
            label: format!("#{}", record.sequence),
            record,
        }
    }

    #[test]
    fn removals_precede_appends() {
        let mut set = RenderedEntrySet::new();
        let old = entry(PacketRecord::data(1, 10, PathId::PathA));
        set.absorb(&TimelineDiff {
            to_add: vec![old.clone()],
            ..TimelineDiff::default()
        });

        let diff = TimelineDiff {
            to_add: vec![entry(PacketRecord::ack(1, 20))],
            to_remove: BTreeSet::from([old.key.clone()]),
            ..TimelineDiff::default()
        };
        let ops = set.apply(&diff);
        assert!(matches!(ops[0], TimelineOp::Remove { lane: Lane::PathA, .. }));
        assert!(matches!(ops[1], TimelineOp::Append { .. }));
        assert_eq!(set.len(), 1);
        assert_eq!(set.keys_in(Lane::Ack).count(), 1);
    }

    #[test]
    fn placeholder_toggles_once() {
        let mut set = RenderedEntrySet::new();
        let empty = TimelineDiff {
            empty: true,
            ..TimelineDiff::default()
        };
        assert_eq!(
            set.apply(&empty),
            vec![TimelineOp::Placeholder { visible: true }]
        );
        assert!(set.apply(&empty).is_empty());

        let filled = TimelineDiff {
            to_add: vec![entry(PacketRecord::data(1, 10, PathId::PathB))],
            ..TimelineDiff::default()
        };
        let ops = set.apply(&filled);
        assert_eq!(ops[0], TimelineOp::Placeholder { visible: false });
        assert!(!set.placeholder_visible());
    }

    #[test]
    fn clear_removes_everything() {
        let mut set = RenderedEntrySet::new();
        set.absorb(&TimelineDiff {
            to_add: vec![
                entry(PacketRecord::data(1, 10, PathId::PathA)),
                entry(PacketRecord::ack(1, 12)),
            ],
            ..TimelineDiff::default()
        });
        let ops = set.clear();
        assert_eq!(ops.len(), 2);
        assert!(set.is_empty());
    }
}
