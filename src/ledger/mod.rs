//! Termination ledger
//!
//! Tracks which nodes reached STOPPED with 1 bit each,
//! plus the node-local round in which each one halted.

use bitvec::prelude::*;

use crate::tree::NodeId;

/// Record of the termination cascade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopLedger {
    /// Stop bits (1 bit per node)
    stopped: BitVec,

    /// Node-local round of the halt, 0 while active
    halt_rounds: Vec<u64>,
}

impl StopLedger {
    /// Create ledger for `nodes` workers, all active
    pub fn new(nodes: usize) -> Self {
        Self {
            stopped: bitvec![0; nodes],
            halt_rounds: vec![0; nodes],
        }
    }

    /// Mark a node stopped in its `round`
    pub fn mark_stopped(&mut self, id: NodeId, round: u64) {
        let idx = id.index();
        debug_assert!(!self.stopped[idx], "{} stopped twice", id);
        self.stopped.set(idx, true);
        self.halt_rounds[idx] = round;
    }

    /// Check whether a node stopped
    pub fn is_stopped(&self, id: NodeId) -> bool {
        self.stopped.get(id.index()).map_or(false, |bit| *bit)
    }

    /// Round in which the node halted
    pub fn halt_round(&self, id: NodeId) -> Option<u64> {
        self.is_stopped(id).then(|| self.halt_rounds[id.index()])
    }

    /// Number of stopped nodes
    pub fn stopped_count(&self) -> usize {
        self.stopped.count_ones()
    }

    /// Verify every node reached STOPPED
    pub fn all_stopped(&self) -> bool {
        self.stopped.all()
    }

    /// Nodes that never stopped
    pub fn pending(&self) -> Vec<NodeId> {
        self.stopped.iter_zeros().map(NodeId::new).collect()
    }

    /// Total rounds executed by the slowest node
    pub fn max_halt_round(&self) -> u64 {
        self.halt_rounds.iter().copied().max().unwrap_or(0)
    }
}
