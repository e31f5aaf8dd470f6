//! Tournament tree topology
//!
//! Complete binary tree over `p` worker nodes in array-heap order.
//! Implicit representation: No explicit tree stored!
//! Parent/child/role relations are computed on demand from the node id.

mod node;

pub use node::NodeId;

use crate::SortError;

/// Role of a node within the tournament tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum Role {
    /// Node 0: emits the global minimum, originates termination
    Root,
    /// Non-root node with two children
    Internal,
    /// Holds at most one input value, has no children
    Leaf,
}

/// Tree shape (implicit)
///
/// Never materialized - all navigation via arithmetic on [`NodeId`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    /// Total node count p
    nodes: usize,

    /// Count of internal nodes; ids at or above this are leaves
    first_leaf: usize,
}

impl Topology {
    /// Build the topology for `nodes` workers sorting `elements` values
    ///
    /// `first_leaf = (p + 1) / 2 − 1`, so an odd `p` yields a full tree
    /// in which every internal node owns exactly two children.
    pub fn new(nodes: usize, elements: usize) -> Result<Self, SortError> {
        if nodes < 3 {
            return Err(SortError::InvalidConfiguration(format!(
                "need at least 3 nodes (root plus two leaves), got {}",
                nodes
            )));
        }
        if nodes % 2 == 0 {
            return Err(SortError::InvalidConfiguration(format!(
                "node count must be odd so every internal node has two children, got {}",
                nodes
            )));
        }

        let topology = Self {
            nodes,
            first_leaf: (nodes + 1) / 2 - 1,
        };

        if topology.leaf_count() < elements {
            return Err(SortError::InsufficientLeaves {
                leaves: topology.leaf_count(),
                elements,
            });
        }

        Ok(topology)
    }

    /// Smallest perfect tree with at least `elements` leaves (minimum two)
    pub fn balanced_for(elements: usize) -> Self {
        let leaves = elements.max(2).next_power_of_two();
        Self {
            nodes: 2 * leaves - 1,
            first_leaf: leaves - 1,
        }
    }

    /// Total node count p
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    /// Index of the first leaf (= number of internal nodes, root included)
    pub fn first_leaf(&self) -> usize {
        self.first_leaf
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        self.nodes - self.first_leaf
    }

    /// Check if `id` is a node of this tree
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes
    }

    /// Check if leaf
    #[inline]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        id.index() >= self.first_leaf
    }

    /// Classify a node
    pub fn role(&self, id: NodeId) -> Role {
        if id.is_root() {
            Role::Root
        } else if self.is_leaf(id) {
            Role::Leaf
        } else {
            Role::Internal
        }
    }

    /// Children of an internal node, `None` for leaves
    pub fn children(&self, id: NodeId) -> Option<(NodeId, NodeId)> {
        if self.is_leaf(id) {
            None
        } else {
            Some((id.left(), id.right()))
        }
    }

    /// All node ids in ascending order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes).map(NodeId::new)
    }

    /// Leaf ids in ascending order, starting at `first_leaf`
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> {
        (self.first_leaf..self.nodes).map(NodeId::new)
    }

    /// Height of the tree (deepest leaf depth)
    pub fn height(&self) -> usize {
        NodeId::new(self.nodes - 1).depth()
    }
}
