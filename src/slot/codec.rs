//! Integer frame encoding for slot values
//!
//! Integer-only transports reserve two values as in-band sentinels.
//! Inputs that collide with a reserved frame are rejected before
//! they reach the core.

use super::Value;
use crate::SortError;

/// Integer frame layout: two reserved values for `Empty` and `Stop`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct IntegerFrames {
    /// Frame carrying `Empty`
    pub empty: i64,
    /// Frame carrying `Stop`
    pub stop: i64,
}

impl Default for IntegerFrames {
    fn default() -> Self {
        Self { empty: -1, stop: -2 }
    }
}

impl IntegerFrames {
    /// Build a layout; the two reserved frames must differ
    pub fn new(empty: i64, stop: i64) -> Result<Self, SortError> {
        if empty == stop {
            return Err(SortError::InvalidConfiguration(format!(
                "empty and stop frames must differ, both are {}",
                empty
            )));
        }
        Ok(Self { empty, stop })
    }

    /// Check whether `value` is one of the reserved frames
    #[inline]
    pub fn is_reserved(&self, value: i64) -> bool {
        value == self.empty || value == self.stop
    }

    /// Encode a slot value into a frame
    pub fn encode(&self, value: Value) -> i64 {
        match value {
            Value::Number(v) => v,
            Value::Empty => self.empty,
            Value::Stop => self.stop,
        }
    }

    /// Decode a frame into a slot value
    pub fn decode(&self, frame: i64) -> Value {
        if frame == self.empty {
            Value::Empty
        } else if frame == self.stop {
            Value::Stop
        } else {
            Value::Number(frame)
        }
    }
}

/// Which integers the input boundary must refuse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SentinelPolicy {
    /// Sentinels are tagged variants; every integer is sortable
    #[default]
    Disjoint,
    /// Sentinels share the integer domain through frame encoding
    Frames(IntegerFrames),
}

impl SentinelPolicy {
    /// Reject the first input value that collides with a reserved frame
    pub fn validate(&self, input: &[i64]) -> Result<(), SortError> {
        match self {
            SentinelPolicy::Disjoint => Ok(()),
            SentinelPolicy::Frames(frames) => input
                .iter()
                .position(|&value| frames.is_reserved(value))
                .map_or(Ok(()), |index| {
                    Err(SortError::SentinelCollision {
                        value: input[index],
                        index,
                    })
                }),
        }
    }

    /// Frame layout, if any
    pub fn frames(&self) -> Option<IntegerFrames> {
        match self {
            SentinelPolicy::Disjoint => None,
            SentinelPolicy::Frames(frames) => Some(*frames),
        }
    }
}
