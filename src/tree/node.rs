//! Implicit tree node identity
//!
//! Node = index into an array-heap layout, root at 0
//! Children computed arithmetically:
//!   Left child:  2·id + 1
//!   Right child: 2·id + 2

use std::fmt;

/// Worker node identifier (implicit - just a heap index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct NodeId(usize);

impl NodeId {
    /// The root node (index 0)
    pub const ROOT: NodeId = NodeId(0);

    /// Wrap a raw heap index
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw heap index
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }

    /// Check if root
    #[inline]
    pub const fn is_root(self) -> bool {
        self.0 == 0
    }

    /// Left child: 2·id + 1
    #[inline]
    pub const fn left(self) -> NodeId {
        NodeId(2 * self.0 + 1)
    }

    /// Right child: 2·id + 2
    #[inline]
    pub const fn right(self) -> NodeId {
        NodeId(2 * self.0 + 2)
    }

    /// Parent node, `None` for the root
    ///
    /// Even ids are right children, odd ids are left children; both
    /// branches collapse to ⌊(id − 1) / 2⌋.
    #[inline]
    pub const fn parent(self) -> Option<NodeId> {
        if self.0 == 0 {
            None
        } else if self.0 % 2 == 0 {
            Some(NodeId((self.0 - 2) / 2))
        } else {
            Some(NodeId((self.0 - 1) / 2))
        }
    }

    /// Whether this node is its parent's left child
    #[inline]
    pub const fn is_left_child(self) -> bool {
        self.0 % 2 == 1
    }

    /// Depth below the root (root = 0)
    pub fn depth(self) -> usize {
        (usize::BITS - 1 - (self.0 + 1).leading_zeros()) as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_formula() {
        let node = NodeId::new(3);
        assert_eq!(node.left(), NodeId::new(7));
        assert_eq!(node.right(), NodeId::new(8));
    }

    #[test]
    fn test_parent_inverts_children() {
        for raw in 0..1024 {
            let node = NodeId::new(raw);
            assert_eq!(node.left().parent(), Some(node));
            assert_eq!(node.right().parent(), Some(node));
            assert!(node.left().is_left_child());
            assert!(!node.right().is_left_child());
        }
        assert_eq!(NodeId::ROOT.parent(), None);
    }

    #[test]
    fn test_depth() {
        assert_eq!(NodeId::new(0).depth(), 0);
        assert_eq!(NodeId::new(1).depth(), 1);
        assert_eq!(NodeId::new(2).depth(), 1);
        assert_eq!(NodeId::new(3).depth(), 2);
        assert_eq!(NodeId::new(6).depth(), 2);
        assert_eq!(NodeId::new(7).depth(), 3);
    }
}
