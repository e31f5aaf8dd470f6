//! Per-node protocol transcripts
//!
//! Each node appends to its own log only, so a transcript is identical
//! under every scheduling of the rendezvous (lock-step or threaded).

use std::fmt::Write as _;

use crate::slot::{IntegerFrames, Side, Value};
use crate::tree::NodeId;

/// One observable step of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum TraceEvent {
    /// Rendezvous completed: value delivered to `to`
    Sent {
        /// Peer
        to: NodeId,
        /// Payload
        value: Value,
    },
    /// Rendezvous completed: value received from `from`
    Received {
        /// Peer
        from: NodeId,
        /// Payload
        value: Value,
    },
    /// Refill chose the offer on `side`
    Selected {
        /// Winning child edge
        side: Side,
        /// Winning value
        value: i64,
    },
    /// Refill found both children drained and closed them
    Closed,
    /// Root handed a value to the emitter
    Emitted(i64),
    /// Node reached STOPPED
    Halted,
}

/// Event stamped with the node-local round it happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct TraceEntry {
    /// Node-local round number (1-based)
    pub round: u64,
    /// What happened
    pub event: TraceEvent,
}

/// Transcripts of every node, indexed by node id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct Transcript {
    logs: Vec<Vec<TraceEntry>>,
}

impl Transcript {
    /// Assemble from per-node logs (index = node id)
    pub fn from_logs(logs: Vec<Vec<TraceEntry>>) -> Self {
        Self { logs }
    }

    /// Log of a single node
    pub fn node(&self, id: NodeId) -> &[TraceEntry] {
        self.logs.get(id.index()).map_or(&[], Vec::as_slice)
    }

    /// Number of node logs
    pub fn len(&self) -> usize {
        self.logs.len()
    }

    /// Whether no node logs are present
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// Refill selections made by `id`, in order
    pub fn selections(&self, id: NodeId) -> impl Iterator<Item = (u64, Side, i64)> + '_ {
        self.node(id).iter().filter_map(|entry| match entry.event {
            TraceEvent::Selected { side, value } => Some((entry.round, side, value)),
            _ => None,
        })
    }

    /// Total completed rendezvous (each counted once, at the sender)
    pub fn message_count(&self) -> usize {
        self.logs
            .iter()
            .flatten()
            .filter(|entry| matches!(entry.event, TraceEvent::Sent { .. }))
            .count()
    }

    /// Stable BLAKE3 fingerprint over all logs
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        for (node, log) in self.logs.iter().enumerate() {
            hasher.update(&(node as u64).to_le_bytes());
            hasher.update(&(log.len() as u64).to_le_bytes());
            for entry in log {
                hasher.update(&entry.round.to_le_bytes());
                hash_event(&mut hasher, &entry.event);
            }
        }
        hasher.finalize()
    }

    /// Human-readable dump; with `frames`, slot values print as integer frames
    pub fn render(&self, frames: Option<IntegerFrames>) -> String {
        let show = |value: Value| match frames {
            Some(frames) => frames.encode(value).to_string(),
            None => value.to_string(),
        };

        let mut out = String::new();
        for (node, log) in self.logs.iter().enumerate() {
            for entry in log {
                let _ = match entry.event {
                    TraceEvent::Sent { to, value } => {
                        writeln!(out, "{}\t{}\tsend {} -> {}", node, entry.round, show(value), to)
                    }
                    TraceEvent::Received { from, value } => {
                        writeln!(out, "{}\t{}\trecv {} <- {}", node, entry.round, show(value), from)
                    }
                    TraceEvent::Selected { side, value } => {
                        writeln!(out, "{}\t{}\tselect {:?} {}", node, entry.round, side, value)
                    }
                    TraceEvent::Closed => writeln!(out, "{}\t{}\tclose", node, entry.round),
                    TraceEvent::Emitted(value) => {
                        writeln!(out, "{}\t{}\temit {}", node, entry.round, value)
                    }
                    TraceEvent::Halted => writeln!(out, "{}\t{}\thalt", node, entry.round),
                };
            }
        }
        out
    }
}

fn hash_value(hasher: &mut blake3::Hasher, value: &Value) {
    match value {
        Value::Number(v) => {
            hasher.update(&[0]);
            hasher.update(&v.to_le_bytes());
        }
        Value::Empty => {
            hasher.update(&[1]);
        }
        Value::Stop => {
            hasher.update(&[2]);
        }
    }
}

fn hash_event(hasher: &mut blake3::Hasher, event: &TraceEvent) {
    match event {
        TraceEvent::Sent { to, value } => {
            hasher.update(&[0]);
            hasher.update(&(to.index() as u64).to_le_bytes());
            hash_value(hasher, value);
        }
        TraceEvent::Received { from, value } => {
            hasher.update(&[1]);
            hasher.update(&(from.index() as u64).to_le_bytes());
            hash_value(hasher, value);
        }
        TraceEvent::Selected { side, value } => {
            hasher.update(&[2, matches!(side, Side::Right) as u8]);
            hasher.update(&value.to_le_bytes());
        }
        TraceEvent::Closed => {
            hasher.update(&[3]);
        }
        TraceEvent::Emitted(value) => {
            hasher.update(&[4]);
            hasher.update(&value.to_le_bytes());
        }
        TraceEvent::Halted => {
            hasher.update(&[5]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transcript {
        Transcript::from_logs(vec![
            vec![
                TraceEntry {
                    round: 1,
                    event: TraceEvent::Received {
                        from: NodeId::new(1),
                        value: Value::Number(3),
                    },
                },
                TraceEntry {
                    round: 1,
                    event: TraceEvent::Sent {
                        to: NodeId::new(1),
                        value: Value::Empty,
                    },
                },
            ],
            vec![TraceEntry {
                round: 1,
                event: TraceEvent::Halted,
            }],
        ])
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = sample();
        let mut b = sample();
        assert_eq!(a.fingerprint(), b.fingerprint());

        b.logs[1][0].round = 2;
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_render_with_frames() {
        let transcript = sample();
        let plain = transcript.render(None);
        assert!(plain.contains("send EMPTY -> #1"));

        let framed = transcript.render(Some(IntegerFrames::default()));
        assert!(framed.contains("send -1 -> #1"));
        assert_eq!(transcript.message_count(), 1);
    }
}
