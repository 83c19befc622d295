use crate::model::{ChartInstanceId, ChartOp, LaneProjection};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum SlotState {
    Absent,
    Present {
        id: ChartInstanceId,
        data: LaneProjection,
    },
}

/// The single chart instance of a session.
///
/// `Absent -> Present` constructs, `Present -> Present` patches in place and
/// redraws, `Present -> Absent` destroys. Ids are never reused, so a sink can
/// tell a recreated chart from the one it replaced.
#[derive(Debug)]
pub struct ChartSlot {
    state: SlotState,
    next_id: u64,
}

impl Default for ChartSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartSlot {
    pub fn new() -> Self {
        Self {
            state: SlotState::Absent,
            next_id: 1,
        }
    }

    pub fn state(&self) -> &SlotState {
        &self.state
    }

    pub fn is_present(&self) -> bool {
        matches!(self.state, SlotState::Present { .. })
    }

    pub fn current_id(&self) -> Option<ChartInstanceId> {
        match &self.state {
            SlotState::Present { id, .. } => Some(*id),
            SlotState::Absent => None,
        }
    }

    /// Brings the chart in line with `projection`. An unchanged projection on
    /// a present chart emits nothing.
    pub fn sync(&mut self, projection: LaneProjection) -> Vec<ChartOp> {
        match &mut self.state {
            SlotState::Absent => {
                let id = ChartInstanceId(self.next_id);
                self.next_id += 1;
                debug!(%id, points = projection.len(), "chart constructed");
                self.state = SlotState::Present {
                    id,
                    data: projection.clone(),
                };
                vec![ChartOp::Construct {
                    id,
                    data: projection,
                }]
            }
            SlotState::Present { id, data } => {
                if *data == projection {
                    return Vec::new();
                }
                let id = *id;
                *data = projection.clone();
                vec![
                    ChartOp::Patch {
                        id,
                        data: projection,
                    },
                    ChartOp::Redraw { id },
                ]
            }
        }
    }

    /// Tears the instance down. No-op when already absent.
    pub fn destroy(&mut self) -> Vec<ChartOp> {
        match std::mem::replace(&mut self.state, SlotState::Absent) {
            SlotState::Present { id, .. } => {
                debug!(%id, "chart destroyed");
                vec![ChartOp::Destroy { id }]
            }
            SlotState::Absent => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::project;
    use pathscope_core_types::{PacketRecord, PathId, SnapshotModel};

    fn projection(n: u64) -> LaneProjection {
        let packets = (1..=n)
            .map(|seq| PacketRecord::data(seq, seq as i64 * 100, PathId::PathA))
            .collect();
        project(&SnapshotModel::with_packets(packets))
    }

    #[test]
    fn construct_then_patch_keeps_identity() {
        let mut slot = ChartSlot::new();
        let ops = slot.sync(projection(1));
        assert!(matches!(&ops[..], [ChartOp::Construct { id, .. }] if *id == ChartInstanceId(1)));

        let ops = slot.sync(projection(2));
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[0], ChartOp::Patch { .. }));
        assert_eq!(ops[1], ChartOp::Redraw { id: ChartInstanceId(1) });
        assert_eq!(slot.current_id(), Some(ChartInstanceId(1)));
    }

    #[test]
    fn unchanged_projection_is_quiet() {
        let mut slot = ChartSlot::new();
        slot.sync(projection(2));
        assert!(slot.sync(projection(2)).is_empty());
    }

    #[test]
    fn destroy_then_recreate_uses_fresh_id() {
        let mut slot = ChartSlot::new();
        slot.sync(projection(1));
        assert_eq!(slot.destroy(), vec![ChartOp::Destroy { id: ChartInstanceId(1) }]);
        assert!(slot.destroy().is_empty());
        assert!(!slot.is_present());

        let ops = slot.sync(projection(1));
        assert_eq!(ops[0].id(), ChartInstanceId(2));
    }
}
