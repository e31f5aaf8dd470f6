//! Thread-per-node runtime over rendezvous channels
//!
//! Every edge carries two zero-capacity `flume` channels, one per
//! direction, so a send blocks until the peer's receive pairs with it.
//! A node whose peer has gone away fails with [`SortError::Channel`] and
//! exits, closing its own edges; the failure therefore spreads through
//! the tree instead of leaving anyone blocked.

use std::thread;

use flume::{Receiver, Sender};
use tracing::{debug, trace};

use crate::machine::{Action, NodeMachine};
use crate::slot::Value;
use crate::tree::NodeId;
use crate::SortError;

/// One end of an edge: outbound sender plus inbound receiver
#[derive(Debug)]
struct Link {
    peer: NodeId,
    tx: Sender<Value>,
    rx: Receiver<Value>,
}

/// All links owned by one node
#[derive(Debug, Default)]
struct Ports {
    parent: Option<Link>,
    left: Option<Link>,
    right: Option<Link>,
    /// Root only: sorted output towards the caller
    output: Option<Sender<i64>>,
}

impl Ports {
    fn link(&self, node: NodeId, peer: NodeId) -> Result<&Link, SortError> {
        [&self.parent, &self.left, &self.right]
            .into_iter()
            .flatten()
            .find(|link| link.peer == peer)
            .ok_or(SortError::Channel { node, peer })
    }
}

/// Wire up every edge of the tree formed by `nodes` workers
fn build_ports(nodes: usize) -> Vec<Ports> {
    let mut ports: Vec<Ports> = (0..nodes).map(|_| Ports::default()).collect();

    for child in 1..nodes {
        let child_id = NodeId::new(child);
        let Some(parent_id) = child_id.parent() else {
            continue;
        };
        let (up_tx, up_rx) = flume::bounded(0);
        let (down_tx, down_rx) = flume::bounded(0);

        ports[child].parent = Some(Link {
            peer: parent_id,
            tx: up_tx,
            rx: down_rx,
        });
        let downward = Some(Link {
            peer: child_id,
            tx: down_tx,
            rx: up_rx,
        });
        if child_id.is_left_child() {
            ports[parent_id.index()].left = downward;
        } else {
            ports[parent_id.index()].right = downward;
        }
    }

    ports
}

/// Execute one node until it stops or an edge breaks
fn drive(mut machine: NodeMachine, ports: Ports) -> Result<NodeMachine, SortError> {
    let node = machine.id();

    loop {
        match machine.poll() {
            Action::Halt => {
                debug!(%node, round = machine.round(), "worker finished");
                return Ok(machine);
            }
            Action::Emit(value) => {
                let output = ports.output.as_ref().ok_or(SortError::Channel {
                    node,
                    peer: NodeId::ROOT,
                })?;
                output.send(value).map_err(|_| SortError::Channel {
                    node,
                    peer: NodeId::ROOT,
                })?;
                machine.on_emitted();
            }
            Action::Send { to, value } => {
                let link = ports.link(node, to)?;
                link.tx
                    .send(value)
                    .map_err(|_| SortError::Channel { node, peer: to })?;
                trace!(%node, peer = %to, %value, "sent");
                machine.on_sent();
            }
            Action::Recv { from } => {
                let link = ports.link(node, from)?;
                let value = link
                    .rx
                    .recv()
                    .map_err(|_| SortError::Channel { node, peer: from })?;
                machine.on_received(value);
            }
        }
    }
}

/// Run `machines` (index = node id) on one thread each
///
/// The caller's thread forwards the root's output to `emitter` while the
/// workers run, so values reach the emitter as soon as they are emitted.
pub fn run(
    machines: Vec<NodeMachine>,
    emitter: &mut dyn crate::runtime::Emitter,
) -> Result<Vec<NodeMachine>, SortError> {
    let mut ports = build_ports(machines.len());
    let (out_tx, out_rx) = flume::unbounded();
    if let Some(root) = ports.first_mut() {
        root.output = Some(out_tx);
    }

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(machines.len());
        let mut spawn_error = None;

        for (machine, node_ports) in machines.into_iter().zip(ports.drain(..)) {
            let node = machine.id();
            let spawned = thread::Builder::new()
                .name(format!("node-{}", node.index()))
                .spawn_scoped(scope, move || drive(machine, node_ports));
            match spawned {
                Ok(handle) => handles.push((node, handle)),
                Err(err) => {
                    // unspawned nodes drop their ports, which unblocks the rest
                    spawn_error = Some(SortError::Spawn(err));
                    break;
                }
            }
        }

        for value in out_rx.iter() {
            emitter.emit(value);
        }

        let mut finished = Vec::with_capacity(handles.len());
        let mut first_error = spawn_error;
        for (node, handle) in handles {
            match handle.join() {
                Ok(Ok(machine)) => finished.push(machine),
                Ok(Err(err)) => {
                    first_error.get_or_insert(err);
                }
                Err(_) => {
                    first_error.get_or_insert(SortError::WorkerPanicked(node));
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(finished),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::NodeStatus;
    use crate::tree::Topology;

    #[test]
    fn test_ports_cover_every_edge() {
        let ports = build_ports(7);
        assert!(ports[0].parent.is_none());
        assert!(ports[0].output.is_none());
        for internal in 0..3 {
            assert_eq!(ports[internal].left.as_ref().unwrap().peer, NodeId::new(2 * internal + 1));
            assert_eq!(ports[internal].right.as_ref().unwrap().peer, NodeId::new(2 * internal + 2));
        }
        for leaf in 3..7 {
            assert!(ports[leaf].left.is_none());
            assert_eq!(
                ports[leaf].parent.as_ref().unwrap().peer,
                NodeId::new(leaf).parent().unwrap()
            );
        }
    }

    #[test]
    fn test_threaded_three_node_sort() {
        let topology = Topology::new(3, 2).unwrap();
        let machines = vec![
            NodeMachine::new(NodeId::new(0), &topology, Value::Empty),
            NodeMachine::new(NodeId::new(1), &topology, Value::Number(8)),
            NodeMachine::new(NodeId::new(2), &topology, Value::Number(3)),
        ];
        let mut out = Vec::new();

        let finished = run(machines, &mut out).unwrap();

        assert_eq!(out, vec![3, 8]);
        assert_eq!(finished.len(), 3);
        assert!(finished.iter().all(|node| node.status() == NodeStatus::Stopped));
    }

    #[test]
    fn test_missing_worker_aborts_instead_of_hanging() {
        let topology = Topology::new(3, 2).unwrap();
        // right leaf never runs: its edges are closed from the start
        let machines = vec![
            NodeMachine::new(NodeId::new(0), &topology, Value::Empty),
            NodeMachine::new(NodeId::new(1), &topology, Value::Number(8)),
        ];
        let mut out = Vec::new();

        let result = run(machines, &mut out);

        assert!(matches!(result, Err(SortError::Channel { .. })));
        assert!(out.is_empty());
    }
}
