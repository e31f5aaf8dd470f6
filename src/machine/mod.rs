//! Per-node extraction engine
//!
//! Each worker runs the same round loop:
//! 1. Root emits its candidate, if it holds a number
//! 2. Internal nodes with an empty candidate refill from both children
//! 3. Non-root nodes offer their candidate upward and adopt the reply
//!
//! The engine never touches a channel. It exposes the next rendezvous as
//! an [`Action`] and is resumed by a driver once that rendezvous completes,
//! so the same state machine runs under the lock-step simulator and the
//! threaded runtime.

mod transition;

pub use transition::{Action, NodeStatus, Phase};

use tracing::{debug, trace};

use crate::slot::{min_candidate, Selection, Side, Value};
use crate::trace::{TraceEntry, TraceEvent};
use crate::tree::{NodeId, Role, Topology};

/// State owned by one worker node
#[derive(Debug, Clone)]
pub struct NodeMachine {
    id: NodeId,
    role: Role,
    parent: Option<NodeId>,
    children: Option<(NodeId, NodeId)>,

    /// Value this node currently offers (or emits, at the root)
    candidate: Value,
    /// Last offer kept for the left child
    left_slot: Value,
    /// Last offer kept for the right child
    right_slot: Value,
    /// Child edges closed: both children reported drained
    stopped: bool,
    /// Root only: whole tree drained
    global_stop: bool,

    phase: Phase,
    /// Node-local round counter, for instrumentation only
    round: u64,
    log: Option<Vec<TraceEntry>>,
}

impl NodeMachine {
    /// Create state for `id`; leaves start with their assigned value
    pub fn new(id: NodeId, topology: &Topology, initial: Value) -> Self {
        let role = topology.role(id);
        debug_assert!(
            role == Role::Leaf || initial.is_empty(),
            "only leaves receive input values"
        );

        Self {
            id,
            role,
            parent: id.parent(),
            children: topology.children(id),
            candidate: initial,
            left_slot: Value::Empty,
            right_slot: Value::Empty,
            stopped: false,
            global_stop: false,
            phase: Phase::Start,
            round: 0,
            log: None,
        }
    }

    /// Record a transcript of every step
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.log = enabled.then(Vec::new);
        self
    }

    /// Node id
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Node role
    pub fn role(&self) -> Role {
        self.role
    }

    /// Current candidate
    pub fn candidate(&self) -> Value {
        self.candidate
    }

    /// Child slots `(left, right)`
    pub fn slots(&self) -> (Value, Value) {
        (self.left_slot, self.right_slot)
    }

    /// Whether the child edges have been closed
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Root only: whether the whole tree has drained
    pub fn global_stop(&self) -> bool {
        self.global_stop
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Rounds started so far
    pub fn round(&self) -> u64 {
        self.round
    }

    /// ACTIVE until the node halts, then STOPPED for good
    pub fn status(&self) -> NodeStatus {
        if self.phase == Phase::Halted {
            NodeStatus::Stopped
        } else {
            NodeStatus::Active
        }
    }

    /// Take the recorded transcript (empty if tracing is off)
    pub fn take_log(&mut self) -> Vec<TraceEntry> {
        self.log.take().unwrap_or_default()
    }

    /// Resolve local phases and return the pending action
    ///
    /// Idempotent: polling again without completing the action returns
    /// the same action.
    pub fn poll(&mut self) -> Action {
        loop {
            match self.phase {
                Phase::Start => self.begin_round(),
                Phase::Forward => self.finish_refill(),
                Phase::Emitting(value) => return Action::Emit(value),
                Phase::AwaitLeft => return Action::Recv { from: self.left() },
                Phase::AwaitRight => return Action::Recv { from: self.right() },
                Phase::ReplyLeft => {
                    return Action::Send {
                        to: self.left(),
                        value: self.left_slot,
                    }
                }
                Phase::ReplyRight => {
                    return Action::Send {
                        to: self.right(),
                        value: self.right_slot,
                    }
                }
                Phase::Offering => {
                    return Action::Send {
                        to: self.parent_id(),
                        value: self.candidate,
                    }
                }
                Phase::AwaitReply => return Action::Recv { from: self.parent_id() },
                Phase::Halted => return Action::Halt,
            }
        }
    }

    /// The emitter accepted the root's value
    pub fn on_emitted(&mut self) {
        let Phase::Emitting(value) = self.phase else {
            debug_assert!(false, "{} completed an emit in phase {:?}", self.id, self.phase);
            return;
        };
        self.record(TraceEvent::Emitted(value));
        self.candidate = Value::Empty;
        self.phase = self.refill_or_forward();
    }

    /// The pending send was taken by the peer
    pub fn on_sent(&mut self) {
        let (to, value, next) = match self.phase {
            Phase::ReplyLeft => (self.left(), self.left_slot, Phase::ReplyRight),
            Phase::ReplyRight => (self.right(), self.right_slot, Phase::Forward),
            Phase::Offering => (self.parent_id(), self.candidate, Phase::AwaitReply),
            other => {
                debug_assert!(false, "{} completed a send in phase {:?}", self.id, other);
                return;
            }
        };
        trace!(node = %self.id, peer = %to, %value, "sent");
        self.record(TraceEvent::Sent { to, value });
        self.phase = next;
    }

    /// The pending receive produced `value`
    pub fn on_received(&mut self, value: Value) {
        let from = match self.phase {
            Phase::AwaitLeft => self.left(),
            Phase::AwaitRight => self.right(),
            Phase::AwaitReply => self.parent_id(),
            other => {
                debug_assert!(false, "{} completed a receive in phase {:?}", self.id, other);
                return;
            }
        };
        trace!(node = %self.id, peer = %from, %value, "received");
        self.record(TraceEvent::Received { from, value });

        match self.phase {
            Phase::AwaitLeft => {
                self.left_slot = value;
                self.phase = Phase::AwaitRight;
            }
            Phase::AwaitRight => {
                self.right_slot = value;
                self.select();
                self.phase = Phase::ReplyLeft;
            }
            _ => {
                if value.is_stop() {
                    self.halt();
                } else {
                    // Empty: consumed, refill. Unchanged number: retry.
                    self.candidate = value;
                    self.phase = Phase::Start;
                }
            }
        }
    }

    fn begin_round(&mut self) {
        self.round += 1;
        self.phase = match self.candidate {
            Value::Number(value) if self.role == Role::Root => Phase::Emitting(value),
            _ => self.refill_or_forward(),
        };
    }

    fn refill_or_forward(&self) -> Phase {
        if self.children.is_some() && self.candidate.is_empty() && !self.stopped {
            Phase::AwaitLeft
        } else {
            Phase::Forward
        }
    }

    fn finish_refill(&mut self) {
        if self.role != Role::Root {
            self.phase = Phase::Offering;
        } else if self.global_stop {
            self.halt();
        } else {
            self.phase = Phase::Start;
        }
    }

    fn select(&mut self) {
        match min_candidate(self.left_slot, self.right_slot) {
            Selection::Exhausted => {
                self.stopped = true;
                self.left_slot = Value::Stop;
                self.right_slot = Value::Stop;
                if self.role == Role::Root {
                    self.global_stop = true;
                }
                debug!(node = %self.id, round = self.round, "children drained, closing edges");
                self.record(TraceEvent::Closed);
            }
            Selection::Winner(side) => {
                let slot = match side {
                    Side::Left => &mut self.left_slot,
                    Side::Right => &mut self.right_slot,
                };
                self.candidate = std::mem::replace(slot, Value::Empty);
                if let Value::Number(value) = self.candidate {
                    self.record(TraceEvent::Selected { side, value });
                }
            }
        }
    }

    fn halt(&mut self) {
        debug!(node = %self.id, round = self.round, "node stopped");
        self.record(TraceEvent::Halted);
        self.phase = Phase::Halted;
    }

    fn record(&mut self, event: TraceEvent) {
        if let Some(log) = self.log.as_mut() {
            log.push(TraceEntry {
                round: self.round,
                event,
            });
        }
    }

    fn left(&self) -> NodeId {
        self.children.map_or(self.id, |(left, _)| left)
    }

    fn right(&self) -> NodeId {
        self.children.map_or(self.id, |(_, right)| right)
    }

    fn parent_id(&self) -> NodeId {
        self.parent.unwrap_or(self.id)
    }
}
