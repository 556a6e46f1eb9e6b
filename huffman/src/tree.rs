use log::debug;
use std::cmp;
use std::collections::BinaryHeap;
use thiserror::Error;

use crate::frequency::Frequencies;

/// Returned when asked to build a tree for an input without any symbols.
#[derive(Clone, Copy, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
#[error("cannot build a Huffman tree from an empty alphabet")]
pub struct EmptyAlphabet;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    Leaf {
        symbol: u8,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn weight(&self) -> u64 {
        match *self {
            Node::Leaf { weight, .. } => weight,
            Node::Internal { weight, .. } => weight,
        }
    }
    pub fn is_leaf(&self) -> bool {
        matches!(*self, Node::Leaf { .. })
    }
    fn merge(left: Node, right: Node) -> Node {
        Node::Internal {
            weight: left.weight().saturating_add(right.weight()),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
    fn depth(&self) -> u32 {
        match *self {
            Node::Leaf { .. } => 0,
            Node::Internal { ref left, ref right, .. } => {
                1 + cmp::max(left.depth(), right.depth())
            }
        }
    }
    fn num_leaves(&self) -> usize {
        match *self {
            Node::Leaf { .. } => 1,
            Node::Internal { ref left, ref right, .. } => {
                left.num_leaves() + right.num_leaves()
            }
        }
    }
}

/// Queue entry of the tree builder.
///
/// Ordered by weight first and by the order of insertion second, reversed so
/// that `BinaryHeap` pops the lightest, oldest entry first.
struct Entry {
    weight: u64,
    sequence: u32,
    node: Node,
}

impl Entry {
    fn key(&self) -> (u64, u32) {
        (self.weight, self.sequence)
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Entry) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Entry) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Entry) -> cmp::Ordering {
        other.key().cmp(&self.key())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tree {
    root: Node,
}

impl Tree {
    /// Builds the Huffman tree for the given symbol frequencies.
    ///
    /// The two lightest nodes are merged until only one node is left, the
    /// first one taken from the queue becomes the left child. Equal weights
    /// are taken in insertion order: leaves are inserted in ascending symbol
    /// order, merged nodes are inserted after all nodes created before them.
    ///
    /// A single symbol results in a tree consisting of just one leaf.
    pub fn from_frequencies(frequencies: &Frequencies) -> Result<Tree, EmptyAlphabet> {
        let mut sequence = 0;
        let mut queue = BinaryHeap::with_capacity(frequencies.len());
        for (symbol, weight) in frequencies {
            queue.push(Entry {
                weight: weight,
                sequence: sequence,
                node: Node::Leaf { symbol: symbol, weight: weight },
            });
            sequence += 1;
        }

        let root = loop {
            let first = queue.pop().ok_or(EmptyAlphabet)?;
            let second = match queue.pop() {
                Some(s) => s,
                None => break first.node,
            };
            let node = Node::merge(first.node, second.node);
            queue.push(Entry {
                weight: node.weight(),
                sequence: sequence,
                node: node,
            });
            sequence += 1;
        };

        let result = Tree { root: root };
        debug!(
            "built tree for {} symbols, depth {}, weight {}",
            frequencies.len(),
            result.depth(),
            result.weight()
        );
        Ok(result)
    }
    pub fn root(&self) -> &Node {
        &self.root
    }
    /// Sum of all symbol frequencies.
    pub fn weight(&self) -> u64 {
        self.root.weight()
    }
    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> u32 {
        self.root.depth()
    }
    pub fn num_leaves(&self) -> usize {
        self.root.num_leaves()
    }
}
