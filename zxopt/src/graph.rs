// QuiZX - Rust library for quantum circuit rewriting and optimisation
//         using the ZX-calculus
// Copyright (C) 2021 - Aleks Kissinger
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Node kinds and the [`GraphLike`] trait shared by every ZX-graph store.
//!
//! A graph consists of boundary nodes (one input and one output per qubit),
//! spiders, and Hadamard boxes. There are no typed edges: a "Hadamard edge"
//! between two spiders is a path through exactly one [`NodeKind::HadamardBox`].

pub use crate::phase::Phase;
use derive_more::{Display, From};
use num::Zero;
use std::fmt;
use thiserror::Error;

/// Stable identifier of a node. Ids are handed out by a per-graph counter and
/// are never reused, even after the node is removed.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, From)]
pub struct NodeId(pub usize);

/// Which side of the circuit a boundary node sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Input,
    Output,
}

/// The basis of a spider: Green is the Z basis, Red is the X basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Green,
    Red,
}

impl Color {
    pub fn flipped(self) -> Color {
        match self {
            Color::Green => Color::Red,
            Color::Red => Color::Green,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Boundary(Direction),
    HadamardBox,
    Spider { color: Color, phase: Phase },
}

impl NodeKind {
    pub fn green(phase: impl Into<Phase>) -> NodeKind {
        NodeKind::Spider {
            color: Color::Green,
            phase: phase.into(),
        }
    }

    pub fn red(phase: impl Into<Phase>) -> NodeKind {
        NodeKind::Spider {
            color: Color::Red,
            phase: phase.into(),
        }
    }

    pub fn is_boundary(&self) -> bool {
        matches!(self, NodeKind::Boundary(_))
    }

    pub fn is_spider(&self) -> bool {
        matches!(self, NodeKind::Spider { .. })
    }

    pub fn is_hadamard(&self) -> bool {
        matches!(self, NodeKind::HadamardBox)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Boundary(Direction::Input) => write!(f, "input"),
            NodeKind::Boundary(Direction::Output) => write!(f, "output"),
            NodeKind::HadamardBox => write!(f, "hadamard box"),
            NodeKind::Spider { color, phase } => {
                let c = match color {
                    Color::Green => "green",
                    Color::Red => "red",
                };
                if phase.is_zero() {
                    write!(f, "{c} spider")
                } else {
                    write!(f, "{c} spider ({phase})")
                }
            }
        }
    }
}

/// A node together with its ordered adjacency list.
///
/// An edge is a pair of mutual references. A self-loop on `v` shows up as two
/// copies of `v` in its own list, and parallel edges as repeated entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    edges: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, edges: Vec<NodeId>) -> Node {
        Node { kind, edges }
    }

    pub fn edges(&self) -> &[NodeId] {
        &self.edges
    }

    pub(crate) fn edges_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.edges
    }
}

/// Errors raised by graph mutation and by rules applied to the wrong nodes.
///
/// `MissingNode` and `MissingEdge` mean the engine lost track of its own
/// structure; `WrongKind` means a caller asked for something that does not
/// make sense on the given node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("dangling reference to node {0}")]
    MissingNode(NodeId),

    #[error("no edge between nodes {0} and {1}")]
    MissingEdge(NodeId, NodeId),

    #[error("{rule}: node {node} is a {found}")]
    WrongKind {
        rule: &'static str,
        node: NodeId,
        found: NodeKind,
    },
}

impl GraphError {
    /// True for the internal-consistency errors, which can only come from a
    /// bug in the engine rather than from caller input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            GraphError::MissingNode(_) | GraphError::MissingEdge(_, _)
        )
    }
}

pub trait GraphLike: Clone + Sized + fmt::Debug {
    /// Initialise a new empty graph
    fn new() -> Self;

    /// A graph of `n` identity wires. Boundary ids are interleaved, so input
    /// `q` is node `2q` and output `q` is node `2q + 1`.
    fn with_qubits(n: usize) -> Self;

    /// Next fresh node id. Only ever increases.
    fn id_counter(&self) -> usize;

    /// Number of live nodes
    fn num_nodes(&self) -> usize;

    /// Iterator over the live nodes, in creation order
    fn nodes(&self) -> impl Iterator<Item = NodeId> + '_;

    /// Input boundary of each qubit
    fn inputs(&self) -> &[NodeId];

    /// Output boundary of each qubit
    fn outputs(&self) -> &[NodeId];

    fn contains(&self, v: NodeId) -> bool;

    fn node(&self, v: NodeId) -> Result<&Node, GraphError>;

    fn kind_mut(&mut self, v: NodeId) -> Result<&mut NodeKind, GraphError>;

    /// Register a new edgeless node
    fn add_node(&mut self, kind: NodeKind) -> NodeId;

    /// Sever every edge of `v`, then delete it
    fn remove_node(&mut self, v: NodeId) -> Result<(), GraphError>;

    /// Add an edge between `a` and `b`. Parallel edges and self-loops are
    /// allowed.
    fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<(), GraphError>;

    /// Remove exactly one edge between `a` and `b`, keeping the order of the
    /// remaining adjacency.
    fn remove_edge(&mut self, a: NodeId, b: NodeId) -> Result<(), GraphError>;

    /// Splice `n` into an existing edge between `left` and `right`
    ///
    /// `n` takes the place of `right` in the adjacency of `left` and vice
    /// versa, and its own adjacency gains `[left, right]`.
    fn insert_node(&mut self, n: NodeId, left: NodeId, right: NodeId) -> Result<(), GraphError>;

    fn num_qubits(&self) -> usize {
        self.inputs().len()
    }

    fn kind(&self, v: NodeId) -> Result<NodeKind, GraphError> {
        Ok(self.node(v)?.kind)
    }

    fn neighbors(&self, v: NodeId) -> Result<&[NodeId], GraphError> {
        Ok(self.node(v)?.edges())
    }

    fn neighbor_vec(&self, v: NodeId) -> Result<Vec<NodeId>, GraphError> {
        Ok(self.neighbors(v)?.to_vec())
    }

    fn degree(&self, v: NodeId) -> Result<usize, GraphError> {
        Ok(self.neighbors(v)?.len())
    }

    fn node_vec(&self) -> Vec<NodeId> {
        self.nodes().collect()
    }

    fn is_spider(&self, v: NodeId) -> bool {
        self.node(v).is_ok_and(|n| n.kind.is_spider())
    }

    fn is_hadamard(&self, v: NodeId) -> bool {
        self.node(v).is_ok_and(|n| n.kind.is_hadamard())
    }

    fn is_boundary(&self, v: NodeId) -> bool {
        self.node(v).is_ok_and(|n| n.kind.is_boundary())
    }

    /// Color and phase of a spider, or a `WrongKind` error naming `rule`
    fn spider_data(&self, v: NodeId, rule: &'static str) -> Result<(Color, Phase), GraphError> {
        match self.kind(v)? {
            NodeKind::Spider { color, phase } => Ok((color, phase)),
            found => Err(GraphError::WrongKind {
                rule,
                node: v,
                found,
            }),
        }
    }

    fn phase(&self, v: NodeId) -> Result<Phase, GraphError> {
        Ok(self.spider_data(v, "phase")?.1)
    }

    fn color(&self, v: NodeId) -> Result<Color, GraphError> {
        Ok(self.spider_data(v, "color")?.0)
    }

    fn set_phase(&mut self, v: NodeId, p: impl Into<Phase>) -> Result<(), GraphError> {
        match self.kind_mut(v)? {
            NodeKind::Spider { phase, .. } => {
                *phase = p.into();
                Ok(())
            }
            found => Err(GraphError::WrongKind {
                rule: "set_phase",
                node: v,
                found: *found,
            }),
        }
    }

    fn add_to_phase(&mut self, v: NodeId, p: impl Into<Phase>) -> Result<(), GraphError> {
        let p0 = self.spider_data(v, "add_to_phase")?.1;
        self.set_phase(v, p0 + p.into())
    }

    fn set_color(&mut self, v: NodeId, c: Color) -> Result<(), GraphError> {
        match self.kind_mut(v)? {
            NodeKind::Spider { color, .. } => {
                *color = c;
                Ok(())
            }
            found => Err(GraphError::WrongKind {
                rule: "set_color",
                node: v,
                found: *found,
            }),
        }
    }

    fn add_spider(&mut self, color: Color, phase: impl Into<Phase>) -> NodeId {
        self.add_node(NodeKind::Spider {
            color,
            phase: phase.into(),
        })
    }

    fn add_hadamard(&mut self) -> NodeId {
        self.add_node(NodeKind::HadamardBox)
    }

    fn is_connected(&self, a: NodeId, b: NodeId) -> Result<bool, GraphError> {
        Ok(self.neighbors(a)?.contains(&b))
    }

    fn is_connected_to_boundary(&self, v: NodeId) -> Result<bool, GraphError> {
        Ok(self.neighbors(v)?.iter().any(|&n| self.is_boundary(n)))
    }

    /// The end of Hadamard box `h` that is not `v`
    fn across(&self, h: NodeId, v: NodeId) -> Result<NodeId, GraphError> {
        match *self.neighbors(h)? {
            [a, b] if a == v => Ok(b),
            [a, b] if b == v => Ok(a),
            _ => Err(GraphError::MissingEdge(h, v)),
        }
    }

    /// First Hadamard box sitting between `a` and `b`, if any
    fn hadamard_between(&self, a: NodeId, b: NodeId) -> Result<Option<NodeId>, GraphError> {
        for &h in self.neighbors(a)? {
            if self.is_hadamard(h) && self.across(h, a)? == b {
                return Ok(Some(h));
            }
        }
        Ok(None)
    }

    /// The spiders reached from `v` through a single Hadamard box, in the
    /// adjacency order of `v`
    fn hadamard_neighbors(&self, v: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let mut ns = Vec::new();
        for &h in self.neighbors(v)? {
            if self.is_hadamard(h) {
                let w = self.across(h, v)?;
                if self.is_spider(w) {
                    ns.push(w);
                }
            }
        }
        Ok(ns)
    }

    fn find_node<F>(&self, f: F) -> Option<NodeId>
    where
        F: Fn(NodeId) -> bool,
    {
        self.nodes().find(|&v| f(v))
    }

    fn num_spiders(&self) -> usize {
        self.nodes().filter(|&v| self.is_spider(v)).count()
    }

    /// Number of spiders whose phase is not a multiple of 1/2
    fn tcount(&self) -> usize {
        self.nodes()
            .filter(|&v| self.phase(v).is_ok_and(|p| !p.is_clifford()))
            .count()
    }

    /// Checks if the graph only consists of wires from the inputs to outputs (in order)
    fn is_identity(&self) -> bool {
        let n = self.num_qubits();
        self.outputs().len() == n
            && self.num_nodes() == 2 * n
            && (0..n).all(|q| {
                self.is_connected(self.inputs()[q], self.outputs()[q])
                    .unwrap_or(false)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec_graph::Graph;
    use num::One;

    #[test]
    fn spider_accessors() {
        let mut g = Graph::with_qubits(1);
        let s = g.add_spider(Color::Red, (1, 2));
        assert_eq!(g.color(s), Ok(Color::Red));
        assert_eq!(g.phase(s), Ok(Phase::from((1, 2))));

        g.add_to_phase(s, (1, 2)).unwrap();
        assert!(g.phase(s).unwrap().is_one());
        g.set_color(s, Color::Green).unwrap();
        assert_eq!(g.color(s), Ok(Color::Green));

        let h = g.add_hadamard();
        assert_eq!(
            g.phase(h),
            Err(GraphError::WrongKind {
                rule: "phase",
                node: h,
                found: NodeKind::HadamardBox
            })
        );
        assert!(!g.phase(h).unwrap_err().is_internal());
        assert!(g.phase(NodeId(99)).unwrap_err().is_internal());
    }

    #[test]
    fn hadamard_queries() {
        let mut g = Graph::new();
        let a = g.add_spider(Color::Green, 0);
        let b = g.add_spider(Color::Green, 0);
        let c = g.add_spider(Color::Green, 0);
        let h = g.add_hadamard();
        g.add_edge(a, b).unwrap();
        g.add_edge(a, c).unwrap();
        g.insert_node(h, a, b).unwrap();

        assert_eq!(g.hadamard_between(a, b), Ok(Some(h)));
        assert_eq!(g.hadamard_between(b, a), Ok(Some(h)));
        assert_eq!(g.hadamard_between(a, c), Ok(None));
        assert_eq!(g.hadamard_neighbors(a), Ok(vec![b]));
        assert_eq!(g.across(h, b), Ok(a));
        assert!(g.is_connected(a, c).unwrap());
        assert!(!g.is_connected(a, b).unwrap());
    }

    #[test]
    fn boundary_queries() {
        let mut g = Graph::with_qubits(2);
        assert!(g.is_identity());
        let s = g.add_spider(Color::Green, 0);
        g.insert_node(s, g.inputs()[1], g.outputs()[1]).unwrap();
        assert!(!g.is_identity());
        assert!(g.is_connected_to_boundary(s).unwrap());
        assert_eq!(g.num_spiders(), 1);
        assert_eq!(g.tcount(), 0);
        g.set_phase(s, (1, 4)).unwrap();
        assert_eq!(g.tcount(), 1);
    }

    #[test]
    fn kind_display() {
        assert_eq!(NodeKind::green((1, 2)).to_string(), "green spider (1/2)");
        assert_eq!(NodeKind::red(0).to_string(), "red spider");
        assert_eq!(NodeKind::Boundary(Direction::Output).to_string(), "output");
        assert_eq!(
            GraphError::MissingEdge(NodeId(1), NodeId(2)).to_string(),
            "no edge between nodes 1 and 2"
        );
    }
}
