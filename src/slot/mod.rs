//! Candidate slots and the sentinel discipline
//!
//! A slot holds exactly one of `Number(v)`, `Empty`, `Stop`.
//! Sentinels are enum variants, disjoint from every sortable integer.

pub mod codec;

pub use codec::{IntegerFrames, SentinelPolicy};

use std::fmt;

/// Tagged slot content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum Value {
    /// A real input value
    Number(i64),
    /// No current candidate; compares above every `Number`
    Empty,
    /// Edge permanently closed; never compared
    Stop,
}

impl Value {
    /// Check for `Number`
    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Check for `Empty`
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Check for `Stop`
    #[inline]
    pub fn is_stop(&self) -> bool {
        matches!(self, Value::Stop)
    }

    /// Extract the number, if any
    #[inline]
    pub fn number(&self) -> Option<i64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<Option<i64>> for Value {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Value::Empty, Value::Number)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{}", v),
            Value::Empty => f.write_str("EMPTY"),
            Value::Stop => f.write_str("STOP"),
        }
    }
}

/// Which child edge of an internal node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum Side {
    /// Edge to child 2·id + 1
    Left,
    /// Edge to child 2·id + 2
    Right,
}

/// Outcome of comparing the two child slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The slot on this side holds the smaller value
    Winner(Side),
    /// Both slots are `Empty`: the subtree is drained
    Exhausted,
}

/// Pick the minimum of two child offers
///
/// `Empty` ranks above every `Number`; equal numbers go to the left slot.
pub fn min_candidate(left: Value, right: Value) -> Selection {
    debug_assert!(
        !left.is_stop() && !right.is_stop(),
        "children never offer Stop upward"
    );

    match (left, right) {
        (Value::Number(l), Value::Number(r)) if r < l => Selection::Winner(Side::Right),
        (Value::Number(_), _) => Selection::Winner(Side::Left),
        (_, Value::Number(_)) => Selection::Winner(Side::Right),
        _ => Selection::Exhausted,
    }
}
