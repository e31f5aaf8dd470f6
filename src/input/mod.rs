//! Input boundary
//!
//! Validates the raw sequence and assigns it one-to-one to the leaves,
//! in ascending leaf order starting at the first leaf. Leaves beyond the
//! last value start out `Empty`.

mod io;

pub use io::{parse_numbers, read_numbers, write_input_line, InputFormat, WriteEmitter};

use crate::slot::{SentinelPolicy, Value};
use crate::tree::{NodeId, Topology};
use crate::SortError;

/// Initial candidate of every node, index = node id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    initial: Vec<Value>,
}

impl Assignment {
    /// Initial candidate for `id`
    pub fn initial(&self, id: NodeId) -> Value {
        self.initial.get(id.index()).copied().unwrap_or(Value::Empty)
    }

    /// Number of nodes covered
    pub fn len(&self) -> usize {
        self.initial.len()
    }

    /// Whether the assignment covers no nodes
    pub fn is_empty(&self) -> bool {
        self.initial.is_empty()
    }
}

/// Assigns input values to leaves before round 1
#[derive(Debug, Clone, Copy)]
pub struct InputDistributor<'a> {
    topology: &'a Topology,
    policy: SentinelPolicy,
}

impl<'a> InputDistributor<'a> {
    /// Create a distributor for `topology`
    pub fn new(topology: &'a Topology, policy: SentinelPolicy) -> Self {
        Self { topology, policy }
    }

    /// Validate `input` and produce the per-node starting candidates
    pub fn distribute(&self, input: &[i64]) -> Result<Assignment, SortError> {
        self.policy.validate(input)?;

        let leaves = self.topology.leaf_count();
        if input.len() > leaves {
            return Err(SortError::InsufficientLeaves {
                leaves,
                elements: input.len(),
            });
        }

        let mut initial = vec![Value::Empty; self.topology.node_count()];
        for (leaf, &value) in self.topology.leaves().zip(input) {
            initial[leaf.index()] = Value::Number(value);
        }

        Ok(Assignment { initial })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::IntegerFrames;

    #[test]
    fn test_fills_leaves_in_order() {
        let topology = Topology::new(7, 3).unwrap();
        let assignment = InputDistributor::new(&topology, SentinelPolicy::Disjoint)
            .distribute(&[30, 10, 20])
            .unwrap();

        assert_eq!(assignment.len(), 7);
        for internal in 0..3 {
            assert_eq!(assignment.initial(NodeId::new(internal)), Value::Empty);
        }
        assert_eq!(assignment.initial(NodeId::new(3)), Value::Number(30));
        assert_eq!(assignment.initial(NodeId::new(4)), Value::Number(10));
        assert_eq!(assignment.initial(NodeId::new(5)), Value::Number(20));
        assert_eq!(assignment.initial(NodeId::new(6)), Value::Empty);
    }

    #[test]
    fn test_rejects_overflow_and_collisions() {
        let topology = Topology::new(3, 2).unwrap();
        let distributor = InputDistributor::new(&topology, SentinelPolicy::Disjoint);
        assert!(matches!(
            distributor.distribute(&[1, 2, 3]),
            Err(SortError::InsufficientLeaves { leaves: 2, elements: 3 })
        ));

        let framed = InputDistributor::new(&topology, SentinelPolicy::Frames(IntegerFrames::default()));
        assert!(matches!(
            framed.distribute(&[5, -1]),
            Err(SortError::SentinelCollision { value: -1, index: 1 })
        ));
        assert!(framed.distribute(&[5, 0]).is_ok());
    }
}
