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

//! Layered quantum circuits and their translation into ZX-graphs.
//!
//! A [Circuit] is a queue of layers. Each layer has one [Slot] per qubit, so
//! gates in the same layer act on disjoint qubits. Gates are always added to
//! the last layer, and a new layer is opened only when a slot the gate needs
//! is already taken.

use crate::gate::*;
use crate::graph::*;
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircuitError {
    #[error("qubit {qubit} is out of range for a circuit on {num_qubits} qubits")]
    QubitOutOfRange { qubit: usize, num_qubits: usize },

    #[error("target and control are both qubit {0}")]
    SameTargetAndControl(usize),

    #[error("gate {t:?} cannot act on {count} qubits")]
    WrongArity { t: GType, count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("gate {0:?} has no ZX translation")]
    UnsupportedGate(GType),

    #[error(transparent)]
    Circuit(#[from] CircuitError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// One qubit's slot in a layer
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Slot {
    Empty,
    /// The acting part of a gate, on its target qubit
    Gate(Gate),
    /// The control of a two-qubit gate whose acting part is on the given qubit
    Control(usize),
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }
}

pub type Layer = Vec<Slot>;

/// A type for quantum circuits
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Circuit {
    nqubits: usize,
    layers: VecDeque<Layer>,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct CircuitStats {
    pub qubits: usize,
    pub layers: usize,
    pub total: usize,
    pub oneq: usize,
    pub twoq: usize,
    pub had: usize,
    pub cnot: usize,
    pub cliff: usize,
    pub non_cliff: usize,
}

impl CircuitStats {
    pub fn make(c: &Circuit) -> Self {
        let mut s = CircuitStats {
            qubits: c.num_qubits(),
            layers: c.num_layers(),
            total: 0,
            oneq: 0,
            twoq: 0,
            had: 0,
            cnot: 0,
            cliff: 0,
            non_cliff: 0,
        };
        for g in c.gates() {
            s.total += 1;
            if g.qs.len() == 2 {
                s.twoq += 1;
            } else {
                s.oneq += 1;
            }

            match g.t {
                HAD => {
                    s.had += 1;
                    s.cliff += 1;
                }
                CNOT => {
                    s.cnot += 1;
                    s.cliff += 1;
                }
                NOT | Z | S | Sdg | CZ => {
                    s.cliff += 1;
                }
                ZPhase | XPhase if g.phase.is_clifford() => {
                    s.cliff += 1;
                }
                _ => {
                    s.non_cliff += 1;
                }
            }
        }
        s
    }
}

impl fmt::Display for CircuitStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Circuit with {} qubits, {} gates in {} layers\n  1-qubit: {}\n  2-qubit: {}\n  h: {}\n  cnot: {}\n  clifford: {}\n  non-clifford: {}",
            self.qubits,
            self.total,
            self.layers,
            self.oneq,
            self.twoq,
            self.had,
            self.cnot,
            self.cliff,
            self.non_cliff
        )
    }
}

impl Circuit {
    /// A circuit on `nqubits` qubits with a single empty layer
    pub fn new(nqubits: usize) -> Circuit {
        let mut c = Circuit {
            nqubits,
            layers: VecDeque::new(),
        };
        c.append_layer();
        c
    }

    pub fn num_qubits(&self) -> usize {
        self.nqubits
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &VecDeque<Layer> {
        &self.layers
    }

    /// Open a new empty layer at the end of the circuit
    pub fn append_layer(&mut self) {
        self.layers.push_back(vec![Slot::Empty; self.nqubits]);
    }

    /// Pop the first layer, if there is one
    pub fn remove_first_layer(&mut self) -> Option<Layer> {
        self.layers.pop_front()
    }

    /// Every gate, layer by layer and in qubit order within a layer
    pub fn gates(&self) -> impl Iterator<Item = &Gate> + '_ {
        self.layers.iter().flatten().filter_map(|s| match s {
            Slot::Gate(g) => Some(g),
            _ => None,
        })
    }

    pub fn num_gates(&self) -> usize {
        self.gates().count()
    }

    pub fn num_gates_of_type(&self, t: GType) -> usize {
        self.gates().filter(|g| g.t == t).count()
    }

    fn check_qubit(&self, q: usize) -> Result<(), CircuitError> {
        if q < self.nqubits {
            Ok(())
        } else {
            Err(CircuitError::QubitOutOfRange {
                qubit: q,
                num_qubits: self.nqubits,
            })
        }
    }

    /// The last layer, opening a fresh one if any of `qs` is occupied there
    fn free_layer(&mut self, qs: &[usize]) -> &mut Layer {
        let full = match self.layers.back() {
            Some(l) => qs.iter().any(|&q| !l[q].is_empty()),
            None => true,
        };
        if full {
            self.append_layer();
        }
        let n = self.layers.len() - 1;
        &mut self.layers[n]
    }

    /// Add a gate, validating its qubits against the circuit
    ///
    /// One-qubit gates act on `qs[0]`; two-qubit gates on `qs = [control,
    /// target]`, with the gate stored on the target and a [Slot::Control]
    /// marker on the control.
    pub fn push(&mut self, g: Gate) -> Result<(), CircuitError> {
        let qs = g.qs.clone();
        match qs[..] {
            [t] => {
                self.check_qubit(t)?;
                self.free_layer(&[t])[t] = Slot::Gate(g);
            }
            [c, t] => {
                self.check_qubit(t)?;
                self.check_qubit(c)?;
                if c == t {
                    return Err(CircuitError::SameTargetAndControl(t));
                }
                let layer = self.free_layer(&[c, t]);
                layer[c] = Slot::Control(t);
                layer[t] = Slot::Gate(g);
            }
            _ => {
                return Err(CircuitError::WrongArity {
                    t: g.t,
                    count: g.qs.len(),
                })
            }
        }
        Ok(())
    }

    pub fn add_gate(&mut self, t: GType, target: usize) -> Result<(), CircuitError> {
        self.push(Gate::new(t, vec![target]))
    }

    pub fn add_gate_with_phase(
        &mut self,
        t: GType,
        target: usize,
        phase: impl Into<Phase>,
    ) -> Result<(), CircuitError> {
        self.push(Gate::new_with_phase(t, vec![target], phase))
    }

    pub fn add_controlled_gate(
        &mut self,
        t: GType,
        control: usize,
        target: usize,
    ) -> Result<(), CircuitError> {
        self.push(Gate::new(t, vec![control, target]))
    }

    /// Translate the circuit into a ZX-graph on the same number of qubits
    ///
    /// Layers are consumed front to back from a working copy. Each gate is
    /// spliced into its wire by [Gate::add_to_graph]; control markers are
    /// skipped, as their gate already covers both qubits.
    pub fn to_graph<G: GraphLike>(&self) -> Result<G, TranslateError> {
        let mut graph = G::with_qubits(self.nqubits);
        let mut frontier = graph.inputs().to_vec();
        let mut work = self.clone();

        while let Some(layer) = work.remove_first_layer() {
            for slot in layer {
                if let Slot::Gate(g) = slot {
                    g.add_to_graph(&mut graph, &mut frontier)?;
                }
            }
        }

        log::debug!(
            "translated {} gates into {} nodes",
            self.num_gates(),
            graph.num_nodes()
        );
        Ok(graph)
    }

    pub fn stats(&self) -> CircuitStats {
        CircuitStats::make(self)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "qreg q[{}];", self.num_qubits())?;

        for g in self.gates() {
            writeln!(f, "{g};")?;
        }

        Ok(())
    }
}
