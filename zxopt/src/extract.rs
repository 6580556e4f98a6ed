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

use crate::basic_rules::{identity_insert, remove_id};
use crate::circuit::*;
use crate::gate::*;
use crate::graph::*;
use crate::linalg::*;
use itertools::Itertools;
use num::Zero;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("boundary {0} is not wired to exactly one node")]
    MalformedBoundary(NodeId),

    #[error("frontier spider {spider} has a bad neighbour {neighbor}")]
    BadNeighbor { spider: NodeId, neighbor: NodeId },

    #[error("graph has {inputs} inputs but {outputs} outputs")]
    BoundaryMismatch { inputs: usize, outputs: usize },

    #[error("no extractable vertex found")]
    NoExtractableVertex,

    #[error("extraction did not finish within {0} rounds")]
    IterationLimit(usize),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error(transparent)]
    Circuit(#[from] CircuitError),
}

pub trait ToCircuit: GraphLike {
    fn into_circuit(&mut self) -> Result<Circuit, ExtractError>;
    fn to_circuit(&self) -> Result<Circuit, ExtractError> {
        self.clone().into_circuit()
    }

    fn extractor(&mut self) -> Extractor<'_, Self> {
        Extractor::new(self)
    }
}

/// Pulls a circuit out of a graph-like graph, from the inputs forward
///
/// The frontier holds `(qubit, spider)` pairs for the spiders currently
/// wired to the inputs. Every gate is appended to the circuit as soon as it
/// is taken off the graph, so the first gate extracted is the first gate
/// applied.
pub struct Extractor<'a, G: GraphLike> {
    g: &'a mut G,
    frontier: Vec<(usize, NodeId)>,
    up_to_perm: bool,
    max_iterations: usize,
}

impl<'a, G: GraphLike> Extractor<'a, G> {
    pub fn new(g: &'a mut G) -> Extractor<'a, G> {
        Extractor {
            g,
            frontier: Vec::new(),
            up_to_perm: false,
            max_iterations: 1_000_000,
        }
    }

    /// Leave the final permutation of the wires in the graph
    pub fn up_to_perm(&mut self) -> &mut Self {
        self.up_to_perm = true;
        self
    }

    pub fn max_iterations(&mut self, n: usize) -> &mut Self {
        self.max_iterations = n;
        self
    }

    fn sole_neighbor(&self, b: NodeId) -> Result<NodeId, ExtractError> {
        match *self.g.neighbors(b)? {
            [n] => Ok(n),
            _ => Err(ExtractError::MalformedBoundary(b)),
        }
    }

    /// Build a biadjacency matrix of frontier with its neighbors
    ///
    /// Frontier elements are rows and their Hadamard-neighbours, in order of
    /// first appearance, are columns.
    fn frontier_biadj(&self) -> Result<(Vec<NodeId>, Mat2), ExtractError> {
        let nhds = self
            .frontier
            .iter()
            .map(|&(_, v)| self.g.hadamard_neighbors(v))
            .collect::<Result<Vec<_>, _>>()?;
        let neighbors: Vec<NodeId> = nhds.iter().flatten().copied().unique().collect();
        let m = Mat2::build(nhds.len(), neighbors.len(), |i, j| {
            nhds[i].contains(&neighbors[j])
        });
        Ok((neighbors, m))
    }

    /// Set Hadamard edges between frontier and given neighbors to match
    /// the biadjacency matrix
    fn update_frontier_biadj(&mut self, neighbors: &[NodeId], m: &Mat2) -> Result<(), ExtractError> {
        for (i, &(_, v)) in self.frontier.iter().enumerate() {
            for (j, &w) in neighbors.iter().enumerate() {
                match (m[(i, j)] == 1, self.g.hadamard_between(v, w)?) {
                    (true, None) => {
                        let h = self.g.add_hadamard();
                        self.g.add_edge(v, h)?;
                        self.g.add_edge(h, w)?;
                    }
                    (false, Some(h)) => self.g.remove_node(h)?,
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Prepare the frontier for circuit extraction
    ///
    /// Pulls Hadamards and phases next to the inputs into the circuit and
    /// checks that every frontier spider only has Hadamard edges to other
    /// Green spiders, besides its input and possibly an output.
    fn prepare_frontier(&mut self, c: &mut Circuit) -> Result<(), ExtractError> {
        self.frontier.clear();

        for q in 0..self.g.num_qubits() {
            let i = self.g.inputs()[q];
            let mut v = self.sole_neighbor(i)?;

            // replace a Hadamard box on the input wire with a Hadamard gate
            if self.g.is_hadamard(v) {
                let w = self.g.across(v, i)?;
                self.g.remove_node(v)?;
                self.g.add_edge(i, w)?;
                c.add_gate(HAD, q)?;
                v = w;
            }

            // input connects to an output, so skip. When extraction is done,
            // every qubit is skipped this way.
            if self.g.is_boundary(v) {
                if self.g.inputs().contains(&v) {
                    return Err(ExtractError::MalformedBoundary(i));
                }
                continue;
            }
            if self.g.color(v) != Ok(Color::Green) {
                return Err(ExtractError::BadNeighbor {
                    spider: i,
                    neighbor: v,
                });
            }

            let p = self.g.phase(v)?;
            if !p.is_zero() {
                c.add_gate_with_phase(ZPhase, q, p)?;
                self.g.set_phase(v, 0)?;
            }

            for n in self.g.neighbor_vec(v)? {
                if n == i {
                    continue;
                }
                let bad = ExtractError::BadNeighbor {
                    spider: v,
                    neighbor: n,
                };
                if self.g.is_boundary(n) {
                    if self.g.inputs().contains(&n) {
                        return Err(bad);
                    }
                } else if self.g.is_hadamard(n) {
                    let w = self.g.across(n, v)?;
                    if self.g.is_boundary(w) {
                        if self.g.inputs().contains(&w) {
                            return Err(bad);
                        }
                    } else if self.g.color(w) != Ok(Color::Green) {
                        return Err(ExtractError::BadNeighbor {
                            spider: v,
                            neighbor: w,
                        });
                    }
                } else {
                    return Err(bad);
                }
            }

            self.frontier.push((q, v));
        }

        Ok(())
    }

    /// Turn Hadamard edges inside the frontier into CZ gates
    fn extract_czs(&mut self, c: &mut Circuit) -> Result<(), ExtractError> {
        for (a, b) in (0..self.frontier.len()).tuple_combinations() {
            let ((q, v), (r, w)) = (self.frontier[a], self.frontier[b]);
            while let Some(h) = self.g.hadamard_between(v, w)? {
                self.g.remove_node(h)?;
                c.add_controlled_gate(CZ, q, r)?;
            }
        }
        Ok(())
    }

    /// Pad the outputs of frontier spiders that still have other legs
    ///
    /// An output wired straight to the spider gets `box - s - box` in
    /// between, and an output behind a box gets a spider after the box. Then
    /// every leg beyond the input is a Hadamard edge to a spider, so it shows
    /// up in the biadjacency matrix.
    fn pad_outputs(&mut self) -> Result<(), ExtractError> {
        for &(_, v) in &self.frontier {
            for n in self.g.neighbor_vec(v)? {
                if self.g.degree(v)? <= 2 {
                    break;
                }
                if self.g.outputs().contains(&n) {
                    let h0 = self.g.add_hadamard();
                    self.g.insert_node(h0, v, n)?;
                    let s = identity_insert(&mut *self.g, h0, n, Color::Green)?;
                    let h1 = self.g.add_hadamard();
                    self.g.insert_node(h1, s, n)?;
                } else if self.g.is_hadamard(n) {
                    let w = self.g.across(n, v)?;
                    if self.g.outputs().contains(&w) {
                        identity_insert(&mut *self.g, n, w, Color::Green)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Extract vertices from the frontier
    ///
    /// Look for frontier elements that are phase-free and degree 2, and
    /// replace them with identity. Returns true if we got any.
    fn extract_from_frontier(&mut self) -> Result<bool, ExtractError> {
        let mut found = false;
        for &(_, v) in &self.frontier {
            if remove_id(&mut *self.g, v)? {
                found = true;
            }
        }
        Ok(found)
    }

    /// Reduce the frontier with CNOT gates
    ///
    /// A square, invertible biadjacency matrix is synthesised directly, which
    /// frees the whole frontier at once. Anything else goes through Gaussian
    /// elimination. A row operation adding row `r0` to row `r1` becomes a
    /// CNOT controlled on the qubit of `r1` and targeting the qubit of `r0`.
    fn extract_cnots(&mut self, c: &mut Circuit) -> Result<(), ExtractError> {
        let (neighbors, mut m) = self.frontier_biadj()?;
        let mut ops: Vec<(usize, usize)> = Vec::new();

        match synthesise_linear_circuit(&m) {
            Ok(pairs) => {
                for &(r0, r1) in pairs.iter().rev() {
                    m.row_add(r0, r1);
                    ops.row_add(r0, r1);
                }
            }
            Err(e) => {
                if matches!(e, SynthesisError::Singular) {
                    log::warn!("{e}, falling back to gaussian elimination");
                } else {
                    log::debug!("{e}, using gaussian elimination");
                }
                m.gauss_x(true, 3, &mut ops);
            }
        }

        for &(r0, r1) in &ops {
            let (ctrl, tgt) = (self.frontier[r1].0, self.frontier[r0].0);
            c.add_controlled_gate(CNOT, ctrl, tgt)?;
        }
        self.update_frontier_biadj(&neighbors, &m)
    }

    /// Converts the remaining permutation of the wires to CNOT gates
    ///
    /// Afterwards each input is wired straight to its own output.
    fn perm_to_cnots(&mut self, c: &mut Circuit) -> Result<(), ExtractError> {
        let n = self.g.num_qubits();
        let wires = (0..n)
            .map(|q| self.sole_neighbor(self.g.inputs()[q]))
            .collect::<Result<Vec<_>, _>>()?;
        let mut m = Mat2::build(n, n, |i, j| wires[j] == self.g.outputs()[i]);

        let mut ops: Vec<(usize, usize)> = Vec::new();
        m.gauss_x(true, 3, &mut ops);
        for &(r0, r1) in ops.iter().rev() {
            c.add_controlled_gate(CNOT, r0, r1)?;
        }

        for q in 0..n {
            let i = self.g.inputs()[q];
            self.g.remove_edge(i, wires[q])?;
        }
        for q in 0..n {
            let (i, o) = (self.g.inputs()[q], self.g.outputs()[q]);
            self.g.add_edge(i, o)?;
        }
        Ok(())
    }

    pub fn extract(&mut self) -> Result<Circuit, ExtractError> {
        let n = self.g.num_qubits();
        if self.g.outputs().len() != n {
            return Err(ExtractError::BoundaryMismatch {
                inputs: n,
                outputs: self.g.outputs().len(),
            });
        }
        let mut c = Circuit::new(n);

        let mut rounds = 0;
        loop {
            rounds += 1;
            if rounds > self.max_iterations {
                return Err(ExtractError::IterationLimit(self.max_iterations));
            }

            // Pull Hadamards and phases off the inputs. If the frontier is
            // empty afterwards, we are done.
            self.prepare_frontier(&mut c)?;
            if self.frontier.is_empty() {
                break;
            }
            self.extract_czs(&mut c)?;
            self.pad_outputs()?;

            // Look for extractible vertices. If we found some, loop. If not,
            // reduce the frontier with CNOTs and look again.
            if self.extract_from_frontier()? {
                continue;
            }
            self.extract_cnots(&mut c)?;
            if self.extract_from_frontier()? {
                continue;
            }

            return Err(ExtractError::NoExtractableVertex);
        }

        if !self.up_to_perm {
            self.perm_to_cnots(&mut c)?;
        }

        log::info!("extracted {} gates on {n} qubits", c.num_gates());
        Ok(c)
    }
}

impl<G: GraphLike> ToCircuit for G {
    fn into_circuit(&mut self) -> Result<Circuit, ExtractError> {
        Extractor::new(self).extract()
    }
}

pub fn extract_circuit(g: &mut impl GraphLike) -> Result<Circuit, ExtractError> {
    Extractor::new(g).extract()
}

/// The biadjacency matrix of a two-layer graph
///
/// Row `i` is the spider on input `i`, column `j` the spider on output `j`,
/// with a 1 for every Hadamard edge between them.
pub fn biadjacency_matrix(g: &impl GraphLike) -> Result<Mat2, ExtractError> {
    let layer = |bs: &[NodeId]| -> Result<Vec<NodeId>, ExtractError> {
        bs.iter()
            .map(|&b| match *g.neighbors(b)? {
                [s] if g.is_spider(s) => Ok(s),
                _ => Err(ExtractError::MalformedBoundary(b)),
            })
            .collect()
    };
    let ins = layer(g.inputs())?;
    let outs = layer(g.outputs())?;

    let mut m = Mat2::zeros(ins.len(), outs.len());
    for (i, &v) in ins.iter().enumerate() {
        for w in g.hadamard_neighbors(v)? {
            if ins.contains(&w) {
                continue;
            }
            let Some(j) = outs.iter().position(|&o| o == w) else {
                return Err(ExtractError::BadNeighbor {
                    spider: v,
                    neighbor: w,
                });
            };
            m[(i, j)] ^= 1;
        }
    }
    Ok(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simplify::*;
    use crate::tensor::scalar_compare;
    use crate::vec_graph::Graph;
    use rstest::{fixture, rstest};

    /// Inputs on spiders `a`, outputs on spiders `b`, with Hadamard edges
    /// `a[i] - b[j]` wherever `m` has a 1, plus CZs inside each layer
    fn two_layer(m: &[[u8; 3]; 3], cz_in: &[(usize, usize)], cz_out: &[(usize, usize)]) -> Graph {
        let mut g = Graph::with_qubits(3);
        let mut a = Vec::new();
        let mut b = Vec::new();
        for q in 0..3 {
            let (i, o) = (g.inputs()[q], g.outputs()[q]);
            let s = identity_insert(&mut g, i, o, Color::Green).unwrap();
            let h = g.add_hadamard();
            g.insert_node(h, s, o).unwrap();
            a.push(s);
            b.push(identity_insert(&mut g, h, o, Color::Green).unwrap());
        }
        for i in 0..3 {
            for j in 0..3 {
                // the construction above already gave a[q] - b[q]
                if m[i][j] != u8::from(i == j) {
                    toggle(&mut g, a[i], b[j]);
                }
            }
        }
        for &(x, y) in cz_in {
            toggle(&mut g, a[x], a[y]);
        }
        for &(x, y) in cz_out {
            toggle(&mut g, b[x], b[y]);
        }
        g
    }

    fn toggle(g: &mut Graph, v: NodeId, w: NodeId) {
        crate::basic_rules::toggle_hadamard_edge(g, v, w).unwrap();
    }

    #[fixture]
    fn layered_graph() -> Graph {
        two_layer(&[[1, 1, 0], [0, 1, 1], [1, 1, 1]], &[(0, 2)], &[(1, 2)])
    }

    #[rstest]
    fn biadjacency_of_two_layers(layered_graph: Graph) {
        let m = biadjacency_matrix(&layered_graph).unwrap();
        assert_eq!(
            m,
            Mat2::new(vec![vec![1, 1, 0], vec![0, 1, 1], vec![1, 1, 1]]).unwrap()
        );
    }

    #[test]
    fn biadjacency_errors() {
        let g = Graph::with_qubits(1);
        assert_eq!(
            biadjacency_matrix(&g),
            Err(ExtractError::MalformedBoundary(NodeId(0)))
        );
    }

    #[rstest]
    fn extract_two_layers(layered_graph: Graph) {
        let mut g = layered_graph;
        let orig = g.clone();
        let c = extract_circuit(&mut g).unwrap();

        assert_eq!(g.num_spiders(), 0);
        assert!(g.is_identity());
        assert!(c.gates().all(|gate| matches!(gate.t, HAD | ZPhase | CNOT | CZ)));
        assert_eq!(c.num_gates_of_type(CZ), 2);
        assert_eq!(c.num_gates_of_type(HAD), 3);

        let kinds: Vec<GType> = c.gates().map(|gate| gate.t).dedup().collect();
        assert_eq!(kinds, vec![CZ, CNOT, HAD, CZ]);
        assert!(scalar_compare(&orig, &c).unwrap());
    }

    #[test]
    fn extract_h() {
        let mut c = Circuit::new(1);
        c.add_gate(HAD, 0).unwrap();
        let mut g: Graph = c.to_graph().unwrap();
        to_graph_like(&mut g).unwrap();
        clifford_simp(&mut g).unwrap();

        let c1 = g.to_circuit().unwrap();
        assert!(scalar_compare(&c, &c1).unwrap());
    }

    #[test]
    fn extract_swap() {
        let mut c = Circuit::new(2);
        c.add_controlled_gate(CNOT, 0, 1).unwrap();
        c.add_controlled_gate(CNOT, 1, 0).unwrap();
        c.add_controlled_gate(CNOT, 0, 1).unwrap();
        let mut g: Graph = c.to_graph().unwrap();
        to_graph_like(&mut g).unwrap();
        clifford_simp(&mut g).unwrap();

        let c1 = extract_circuit(&mut g).unwrap();
        assert!(scalar_compare(&c, &c1).unwrap());
        assert!(g.is_identity());
    }

    #[test]
    fn extract_up_to_perm_leaves_wires() {
        let mut c = Circuit::new(2);
        c.add_controlled_gate(CNOT, 0, 1).unwrap();
        c.add_controlled_gate(CNOT, 1, 0).unwrap();
        c.add_controlled_gate(CNOT, 0, 1).unwrap();
        let mut g: Graph = c.to_graph().unwrap();
        to_graph_like(&mut g).unwrap();
        clifford_simp(&mut g).unwrap();

        let c1 = g.extractor().up_to_perm().extract().unwrap();
        assert_eq!(c1.num_gates_of_type(CNOT), 0);
        assert_eq!(g.num_spiders(), 0);
        assert_eq!(g.is_connected(g.inputs()[0], g.outputs()[1]), Ok(true));
    }

    #[test]
    fn perm_to_cnots_cycle() {
        let mut g = Graph::with_qubits(3);
        let (ins, outs) = (g.inputs().to_vec(), g.outputs().to_vec());
        for q in 0..3 {
            g.remove_edge(ins[q], outs[q]).unwrap();
        }
        for q in 0..3 {
            g.add_edge(ins[q], outs[(q + 1) % 3]).unwrap();
        }
        let orig = g.clone();

        let c = extract_circuit(&mut g).unwrap();
        assert!(c.gates().all(|gate| gate.t == CNOT));
        assert!(g.is_identity());
        assert!(scalar_compare(&orig, &c).unwrap());
    }

    #[test]
    fn bad_frontier() {
        let mut g = Graph::with_qubits(1);
        let s = identity_insert(&mut g, NodeId(0), NodeId(1), Color::Red).unwrap();
        assert_eq!(
            extract_circuit(&mut g),
            Err(ExtractError::BadNeighbor {
                spider: NodeId(0),
                neighbor: s
            })
        );

        let mut g = Graph::with_qubits(1);
        g.remove_edge(NodeId(0), NodeId(1)).unwrap();
        assert_eq!(
            extract_circuit(&mut g),
            Err(ExtractError::MalformedBoundary(NodeId(0)))
        );
    }

    #[test]
    fn extract_regression() {
        // frontier only covers some of the qubits towards the end
        let mut c = Circuit::new(5);
        c.add_controlled_gate(CNOT, 3, 4).unwrap();
        c.add_gate(Tdg, 4).unwrap();
        c.add_controlled_gate(CNOT, 0, 3).unwrap();
        c.add_gate(Tdg, 3).unwrap();
        c.add_controlled_gate(CNOT, 0, 3).unwrap();
        c.add_controlled_gate(CNOT, 1, 4).unwrap();
        c.add_controlled_gate(CNOT, 0, 4).unwrap();
        c.add_controlled_gate(CNOT, 1, 4).unwrap();
        c.add_gate(Tdg, 4).unwrap();
        c.add_gate(T, 0).unwrap();

        let mut g: Graph = c.to_graph().unwrap();
        to_graph_like(&mut g).unwrap();
        clifford_simp(&mut g).unwrap();
        let c1 = g.to_circuit().unwrap();
        assert!(scalar_compare(&c, &c1).unwrap());
    }
}
