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

use crate::circuit::{CircuitError, TranslateError};
use crate::graph::*;
use num::Zero;
use std::fmt;

#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum GType {
    XPhase,
    NOT,
    ZPhase,
    Z,
    S,
    T,
    Sdg,
    Tdg,
    CNOT,
    CZ,
    HAD,
    UnknownGate,
}

pub use GType::*;

impl GType {
    pub fn name(&self) -> &'static str {
        match self {
            ZPhase => "rz",
            NOT => "x",
            XPhase => "rx",
            Z => "z",
            S => "s",
            T => "t",
            Sdg => "sdg",
            Tdg => "tdg",
            HAD => "h",
            CNOT => "cx",
            CZ => "cz",
            UnknownGate => "UNKNOWN",
        }
    }

    /// number of qubits the gate acts on
    ///
    /// Returns None for [UnknownGate], which has no fixed arity.
    pub fn num_qubits(&self) -> Option<usize> {
        match self {
            CNOT | CZ => Some(2),
            UnknownGate => None,
            _ => Some(1),
        }
    }

    /// The fixed phase of a named Z-rotation, if this is one
    pub fn z_phase(&self) -> Option<Phase> {
        match self {
            Z => Some(Phase::from(1)),
            S => Some(Phase::from((1, 2))),
            Sdg => Some(Phase::from((-1, 2))),
            T => Some(Phase::from((1, 4))),
            Tdg => Some(Phase::from((-1, 4))),
            _ => None,
        }
    }
}

/// A gate on one or two qubits
///
/// `qs` holds the target for one-qubit gates, and `[control, target]` for
/// [CNOT] and [CZ]. The phase is only read for [ZPhase] and [XPhase].
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Gate {
    pub t: GType,
    pub qs: Vec<usize>,
    pub phase: Phase,
}

impl Default for Gate {
    fn default() -> Self {
        Gate {
            t: UnknownGate,
            qs: vec![],
            phase: Phase::zero(),
        }
    }
}

impl Gate {
    pub fn new(t: GType, qs: Vec<usize>) -> Gate {
        Gate {
            t,
            qs,
            ..Default::default()
        }
    }

    pub fn new_with_phase(t: GType, qs: Vec<usize>, phase: impl Into<Phase>) -> Gate {
        Gate {
            t,
            qs,
            phase: phase.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.t.name()
    }

    /// Splice node `n` into the wire of qubit `q`, just after the frontier
    fn splice(
        graph: &mut impl GraphLike,
        frontier: &mut [NodeId],
        q: usize,
        n: NodeId,
    ) -> Result<(), TranslateError> {
        let num_qubits = frontier.len();
        let (Some(&f), Some(&o)) = (frontier.get(q), graph.outputs().get(q)) else {
            return Err(CircuitError::QubitOutOfRange {
                qubit: q,
                num_qubits,
            }
            .into());
        };
        graph.insert_node(n, f, o)?;
        frontier[q] = n;
        Ok(())
    }

    /// Translate this gate into nodes on the wires of `graph`
    ///
    /// `frontier[q]` is the last node placed on qubit `q`, still wired to the
    /// output of `q`. New nodes go between the two, and the frontier moves
    /// onto them.
    pub fn add_to_graph(
        &self,
        graph: &mut impl GraphLike,
        frontier: &mut [NodeId],
    ) -> Result<(), TranslateError> {
        let unsupported = || TranslateError::UnsupportedGate(self.t);
        match (self.t, &self.qs[..]) {
            (HAD, &[q]) => {
                let h = graph.add_hadamard();
                Gate::splice(graph, frontier, q, h)
            }
            (NOT, &[q]) => {
                let s = graph.add_spider(Color::Red, 1);
                Gate::splice(graph, frontier, q, s)
            }
            (XPhase, &[q]) => {
                let s = graph.add_spider(Color::Red, self.phase);
                Gate::splice(graph, frontier, q, s)
            }
            (ZPhase, &[q]) => {
                let s = graph.add_spider(Color::Green, self.phase);
                Gate::splice(graph, frontier, q, s)
            }
            (t, &[q]) => {
                let p = t.z_phase().ok_or_else(unsupported)?;
                let s = graph.add_spider(Color::Green, p);
                Gate::splice(graph, frontier, q, s)
            }
            (CNOT, &[c, t]) => {
                let x = graph.add_spider(Color::Red, 0);
                Gate::splice(graph, frontier, t, x)?;
                let z = graph.add_spider(Color::Green, 0);
                Gate::splice(graph, frontier, c, z)?;
                graph.add_edge(z, x)?;
                Ok(())
            }
            (CZ, &[c, t]) => {
                let z0 = graph.add_spider(Color::Green, 0);
                Gate::splice(graph, frontier, c, z0)?;
                let z1 = graph.add_spider(Color::Green, 0);
                Gate::splice(graph, frontier, t, z1)?;
                let h = graph.add_hadamard();
                graph.add_edge(z0, h)?;
                graph.add_edge(h, z1)?;
                Ok(())
            }
            _ => Err(unsupported()),
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        if let ZPhase | XPhase = self.t {
            write!(f, "({})", self.phase)?;
        }
        let qs: Vec<String> = self.qs.iter().map(|i| format!("q[{i}]")).collect();
        write!(f, " {}", qs.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec_graph::Graph;
    use rstest::rstest;

    #[rstest]
    #[case(HAD, "h", Some(1))]
    #[case(CNOT, "cx", Some(2))]
    #[case(Tdg, "tdg", Some(1))]
    #[case(UnknownGate, "UNKNOWN", None)]
    fn names(#[case] t: GType, #[case] name: &str, #[case] arity: Option<usize>) {
        assert_eq!(t.name(), name);
        assert_eq!(t.num_qubits(), arity);
    }

    #[test]
    fn display() {
        let g = Gate::new_with_phase(ZPhase, vec![2], (1, 4));
        assert_eq!(g.to_string(), "rz(1/4) q[2]");
        assert_eq!(Gate::new(Sdg, vec![0]).to_string(), "sdg q[0]");

        let cx = Gate::new(CNOT, vec![0, 1]);
        assert_eq!(cx.to_string(), "cx q[0], q[1]");
    }

    #[test]
    fn cz_to_graph() {
        let mut g = Graph::with_qubits(2);
        let mut frontier = g.inputs().to_vec();
        Gate::new(CZ, vec![0, 1])
            .add_to_graph(&mut g, &mut frontier)
            .unwrap();
        let (z0, z1) = (frontier[0], frontier[1]);
        assert_eq!(g.kind(z0).unwrap(), NodeKind::green(0));
        assert_eq!(g.kind(z1).unwrap(), NodeKind::green(0));
        assert!(g.hadamard_between(z0, z1).unwrap().is_some());
        assert_eq!(g.num_nodes(), 7);
    }

    #[test]
    fn bad_arity_is_unsupported() {
        let mut g = Graph::with_qubits(2);
        let mut frontier = g.inputs().to_vec();
        let r = Gate::new(CNOT, vec![0]).add_to_graph(&mut g, &mut frontier);
        assert!(matches!(r, Err(TranslateError::UnsupportedGate(CNOT))));
        let r = Gate::new(UnknownGate, vec![1]).add_to_graph(&mut g, &mut frontier);
        assert!(matches!(r, Err(TranslateError::UnsupportedGate(UnknownGate))));
    }
}
