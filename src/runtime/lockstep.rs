//! Single-threaded lock-step simulator
//!
//! Sweeps the nodes in ascending id order. A send completes when the
//! addressed peer is currently waiting on a receive from the sender;
//! emits complete immediately. A sweep without progress while some node
//! is still active means an expected message can never arrive.

use tracing::trace;

use crate::machine::{Action, NodeMachine, NodeStatus};
use crate::runtime::Emitter;
use crate::tree::NodeId;
use crate::SortError;

/// Drive `machines` (index = node id) until every node has stopped
///
/// Returns the number of sweeps performed.
pub fn run(machines: &mut [NodeMachine], emitter: &mut dyn Emitter) -> Result<u64, SortError> {
    let mut sweeps = 0u64;

    loop {
        sweeps += 1;
        let mut progressed = false;

        for idx in 0..machines.len() {
            match machines[idx].poll() {
                Action::Halt | Action::Recv { .. } => {}
                Action::Emit(value) => {
                    emitter.emit(value);
                    machines[idx].on_emitted();
                    progressed = true;
                }
                Action::Send { to, value } => {
                    let from = NodeId::new(idx);
                    let peer = machines
                        .get_mut(to.index())
                        .ok_or(SortError::Channel { node: from, peer: to })?;
                    if peer.poll() == (Action::Recv { from }) {
                        trace!(%from, %to, %value, sweep = sweeps, "rendezvous");
                        peer.on_received(value);
                        machines[idx].on_sent();
                        progressed = true;
                    }
                }
            }
        }

        let pending: Vec<NodeId> = machines
            .iter()
            .filter(|machine| machine.status() == NodeStatus::Active)
            .map(NodeMachine::id)
            .collect();

        if pending.is_empty() {
            return Ok(sweeps);
        }
        if !progressed {
            return Err(SortError::Stalled { pending });
        }
    }
}
