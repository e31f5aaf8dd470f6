//! Engine phases and the actions they request from a driver

use crate::slot::Value;
use crate::tree::NodeId;

/// Where a node is inside its current round
///
/// Phases that need no rendezvous (`Start`, `Forward`) are resolved
/// internally by [`super::NodeMachine::poll`] and never observed by a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Beginning of a round
    Start,
    /// Root holds a number to hand to the emitter
    Emitting(i64),
    /// Waiting for the left child's offer
    AwaitLeft,
    /// Waiting for the right child's offer
    AwaitRight,
    /// Sending the left slot back to the left child
    ReplyLeft,
    /// Sending the right slot back to the right child
    ReplyRight,
    /// End of refill; root loops, others offer upward
    Forward,
    /// Sending the candidate to the parent
    Offering,
    /// Waiting for the parent's verdict on the offer
    AwaitReply,
    /// Terminal
    Halted,
}

/// Next externally visible step of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Rendezvous: deliver `value` to `to`
    Send {
        /// Receiving peer
        to: NodeId,
        /// Payload
        value: Value,
    },
    /// Rendezvous: wait for a value from `from`
    Recv {
        /// Sending peer
        from: NodeId,
    },
    /// Hand a sorted value to the emitter (root only, no peer involved)
    Emit(i64),
    /// Node reached STOPPED; nothing more will be sent or expected
    Halt,
}

/// Two-state lifecycle of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum NodeStatus {
    /// Still exchanging messages
    Active,
    /// Terminal; all outbound edges have carried their last message
    Stopped,
}
