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

pub use crate::graph::*;
use std::fmt;
use std::mem;

pub type VTab<T> = Vec<Option<T>>;

/// A ZX-graph stored as an arena indexed by [`NodeId`].
///
/// Removed nodes leave a hole behind; holes are never refilled, so the id of
/// a node is also its creation index.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    ndata: VTab<Node>,
    inputs: Vec<NodeId>,
    outputs: Vec<NodeId>,
    numv: usize,
}

impl Graph {
    fn slot_mut(&mut self, v: NodeId) -> Result<&mut Node, GraphError> {
        match self.ndata.get_mut(v.0) {
            Some(Some(n)) => Ok(n),
            _ => Err(GraphError::MissingNode(v)),
        }
    }

    /// Removes one copy of `t` from the adjacency of `s`.
    fn remove_half_edge(&mut self, s: NodeId, t: NodeId) -> Result<(), GraphError> {
        let nhd = self.slot_mut(s)?.edges_mut();
        let i = nhd
            .iter()
            .position(|&w| w == t)
            .ok_or(GraphError::MissingEdge(s, t))?;
        nhd.remove(i);
        Ok(())
    }

    /// Replaces the first copy of `old` in the adjacency of `s` by `new`.
    fn replace_half_edge(&mut self, s: NodeId, old: NodeId, new: NodeId) -> Result<(), GraphError> {
        let nhd = self.slot_mut(s)?.edges_mut();
        let i = nhd
            .iter()
            .position(|&w| w == old)
            .ok_or(GraphError::MissingEdge(s, old))?;
        nhd[i] = new;
        Ok(())
    }

    fn count_half_edges(&self, s: NodeId, t: NodeId) -> Result<usize, GraphError> {
        Ok(self.neighbors(s)?.iter().filter(|&&w| w == t).count())
    }
}

impl GraphLike for Graph {
    fn new() -> Graph {
        Graph {
            ndata: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            numv: 0,
        }
    }

    fn with_qubits(n: usize) -> Graph {
        let mut g = Graph::new();
        for _ in 0..n {
            let i = NodeId(g.ndata.len());
            let o = NodeId(g.ndata.len() + 1);
            g.ndata.push(Some(Node::new(
                NodeKind::Boundary(Direction::Input),
                vec![o],
            )));
            g.ndata.push(Some(Node::new(
                NodeKind::Boundary(Direction::Output),
                vec![i],
            )));
            g.numv += 2;
            g.inputs.push(i);
            g.outputs.push(o);
        }
        g
    }

    fn id_counter(&self) -> usize {
        self.ndata.len()
    }

    fn num_nodes(&self) -> usize {
        self.numv
    }

    fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ndata
            .iter()
            .enumerate()
            .filter_map(|(i, d)| d.as_ref().map(|_| NodeId(i)))
    }

    fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    fn outputs(&self) -> &[NodeId] {
        &self.outputs
    }

    fn contains(&self, v: NodeId) -> bool {
        matches!(self.ndata.get(v.0), Some(Some(_)))
    }

    fn node(&self, v: NodeId) -> Result<&Node, GraphError> {
        match self.ndata.get(v.0) {
            Some(Some(n)) => Ok(n),
            _ => Err(GraphError::MissingNode(v)),
        }
    }

    fn kind_mut(&mut self, v: NodeId) -> Result<&mut NodeKind, GraphError> {
        Ok(&mut self.slot_mut(v)?.kind)
    }

    fn add_node(&mut self, kind: NodeKind) -> NodeId {
        self.numv += 1;
        self.ndata.push(Some(Node::new(kind, Vec::new())));
        NodeId(self.ndata.len() - 1)
    }

    fn remove_node(&mut self, v: NodeId) -> Result<(), GraphError> {
        let adj = mem::take(self.slot_mut(v)?.edges_mut());
        for w in adj {
            // self-loops live entirely in the adjacency we just took
            if w != v {
                self.remove_half_edge(w, v)?;
            }
        }
        self.ndata[v.0] = None;
        self.numv -= 1;
        Ok(())
    }

    fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<(), GraphError> {
        if !self.contains(b) {
            return Err(GraphError::MissingNode(b));
        }
        self.slot_mut(a)?.edges_mut().push(b);
        self.slot_mut(b)?.edges_mut().push(a);
        Ok(())
    }

    fn remove_edge(&mut self, a: NodeId, b: NodeId) -> Result<(), GraphError> {
        let needed = if a == b { 2 } else { 1 };
        if self.count_half_edges(a, b)? < needed || self.count_half_edges(b, a)? < needed {
            return Err(GraphError::MissingEdge(a, b));
        }
        self.remove_half_edge(a, b)?;
        self.remove_half_edge(b, a)
    }

    fn insert_node(&mut self, n: NodeId, left: NodeId, right: NodeId) -> Result<(), GraphError> {
        if !self.contains(n) {
            return Err(GraphError::MissingNode(n));
        }
        let needed = if left == right { 2 } else { 1 };
        if self.count_half_edges(left, right)? < needed {
            return Err(GraphError::MissingEdge(left, right));
        }

        // for a self-loop the second lookup finds the second copy
        self.replace_half_edge(left, right, n)?;
        self.replace_half_edge(right, left, n)?;
        let nhd = self.slot_mut(n)?.edges_mut();
        nhd.push(left);
        nhd.push(right);
        Ok(())
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "graph with {} qubits, {} nodes",
            self.num_qubits(),
            self.num_nodes()
        )?;
        for (i, d) in self.ndata.iter().enumerate() {
            if let Some(n) = d {
                let adj: Vec<String> = n.edges().iter().map(|w| w.to_string()).collect();
                writeln!(f, "  {}: {} -- [{}]", i, n.kind, adj.join(", "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[usize]) -> Vec<NodeId> {
        v.iter().map(|&i| NodeId(i)).collect()
    }

    #[test]
    fn create_empty_graph() {
        let g = Graph::new();
        assert_eq!(g.num_nodes(), 0);
        assert_eq!(g.id_counter(), 0);
        assert_eq!(g.num_qubits(), 0);
    }

    #[test]
    fn initialise_graph() {
        let g = Graph::with_qubits(3);
        assert_eq!(g.num_qubits(), 3);
        assert_eq!(g.num_nodes(), 6);
        assert_eq!(g.id_counter(), 6);
        assert_eq!(g.inputs(), &ids(&[0, 2, 4])[..]);
        assert_eq!(g.outputs(), &ids(&[1, 3, 5])[..]);
        for q in 0..3 {
            let (i, o) = (g.inputs()[q], g.outputs()[q]);
            assert_eq!(g.kind(i), Ok(NodeKind::Boundary(Direction::Input)));
            assert_eq!(g.kind(o), Ok(NodeKind::Boundary(Direction::Output)));
            assert_eq!(g.neighbors(i), Ok(&[o][..]));
            assert_eq!(g.neighbors(o), Ok(&[i][..]));
        }
    }

    #[test]
    fn new_nodes_are_edgeless() {
        let mut g = Graph::with_qubits(1);
        let h = g.add_hadamard();
        let s = g.add_spider(Color::Red, (1, 2));
        assert_eq!(h, NodeId(2));
        assert_eq!(s, NodeId(3));
        assert_eq!(g.degree(h), Ok(0));
        assert_eq!(g.kind(s), Ok(NodeKind::red((1, 2))));
        assert_eq!(g.num_nodes(), 4);
        assert_eq!(g.node_vec(), ids(&[0, 1, 2, 3]));
    }

    #[test]
    fn get_node() {
        let g = Graph::with_qubits(1);
        assert!(g.node(NodeId(1)).is_ok());
        assert_eq!(g.node(NodeId(2)), Err(GraphError::MissingNode(NodeId(2))));
        assert!(!g.contains(NodeId(2)));
    }

    #[test]
    fn add_and_remove_edges() {
        let mut g = Graph::new();
        let a = g.add_spider(Color::Green, 0);
        let b = g.add_spider(Color::Green, 0);
        let c = g.add_spider(Color::Green, 0);

        g.add_edge(a, b).unwrap();
        g.add_edge(a, c).unwrap();
        g.add_edge(a, b).unwrap();
        assert_eq!(g.neighbors(a), Ok(&[b, c, b][..]));
        assert_eq!(g.neighbors(b), Ok(&[a, a][..]));

        // only the first copy goes, and the rest keep their order
        g.remove_edge(a, b).unwrap();
        assert_eq!(g.neighbors(a), Ok(&[c, b][..]));
        assert_eq!(g.neighbors(b), Ok(&[a][..]));

        assert_eq!(g.remove_edge(b, c), Err(GraphError::MissingEdge(b, c)));
        assert_eq!(
            g.add_edge(a, NodeId(7)),
            Err(GraphError::MissingNode(NodeId(7)))
        );
        assert_eq!(g.neighbors(a), Ok(&[c, b][..]));
    }

    #[test]
    fn self_loops() {
        let mut g = Graph::new();
        let a = g.add_spider(Color::Green, 0);
        g.add_edge(a, a).unwrap();
        assert_eq!(g.degree(a), Ok(2));
        g.remove_edge(a, a).unwrap();
        assert_eq!(g.degree(a), Ok(0));
        assert!(g.remove_edge(a, a).is_err());
    }

    #[test]
    fn insert_node() {
        let mut g = Graph::with_qubits(1);
        let (i, o) = (g.inputs()[0], g.outputs()[0]);
        let s = g.add_spider(Color::Green, 0);
        g.add_edge(s, s).unwrap();
        let h = g.add_hadamard();

        g.insert_node(h, i, o).unwrap();
        assert_eq!(g.neighbors(i), Ok(&[h][..]));
        assert_eq!(g.neighbors(o), Ok(&[h][..]));
        assert_eq!(g.neighbors(h), Ok(&[i, o][..]));

        let h1 = g.add_hadamard();
        g.insert_node(h1, s, s).unwrap();
        assert_eq!(g.neighbors(s), Ok(&[h1, h1][..]));
        assert_eq!(g.neighbors(h1), Ok(&[s, s][..]));

        assert_eq!(g.insert_node(h1, i, o), Err(GraphError::MissingEdge(i, o)));
    }

    #[test]
    fn remove_node() {
        let mut g = Graph::with_qubits(1);
        let (i, o) = (g.inputs()[0], g.outputs()[0]);
        let h = g.add_hadamard();
        g.insert_node(h, i, o).unwrap();
        g.remove_node(h).unwrap();

        assert_eq!(g.num_nodes(), 2);
        assert_eq!(g.id_counter(), 3);
        assert!(!g.contains(h));
        assert_eq!(g.degree(i), Ok(0));
        assert_eq!(g.degree(o), Ok(0));
        assert_eq!(g.remove_node(h), Err(GraphError::MissingNode(h)));

        // fresh ids keep counting up
        assert_eq!(g.add_hadamard(), NodeId(3));
    }

    #[test]
    fn remove_node_with_loops_and_parallel_edges() {
        let mut g = Graph::new();
        let a = g.add_spider(Color::Green, 0);
        let b = g.add_spider(Color::Green, 0);
        g.add_edge(a, a).unwrap();
        g.add_edge(a, b).unwrap();
        g.add_edge(a, b).unwrap();
        g.remove_node(a).unwrap();
        assert_eq!(g.degree(b), Ok(0));
        assert_eq!(g.num_nodes(), 1);
    }

    #[test]
    fn display() {
        let g = Graph::with_qubits(1);
        assert_eq!(
            g.to_string(),
            "graph with 1 qubits, 2 nodes\n  0: input -- [1]\n  1: output -- [0]\n"
        );
    }
}
