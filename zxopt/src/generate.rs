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

use crate::circuit::*;
use crate::gate::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Builds random circuits gate by gate
///
/// Each of the `depth` steps draws one gate, with the given probabilities
/// for CNOT, CZ, H, S and T. Whatever probability is left over produces no
/// gate for that step.
pub struct RandomCircuitBuilder {
    pub rng: SmallRng,
    pub qubits: usize,
    pub depth: usize,
    pub p_cnot: f32,
    pub p_cz: f32,
    pub p_h: f32,
    pub p_s: f32,
    pub p_t: f32,
}

impl Circuit {
    pub fn random() -> RandomCircuitBuilder {
        RandomCircuitBuilder {
            rng: SmallRng::from_os_rng(),
            qubits: 0,
            depth: 0,
            p_cnot: 0.0,
            p_cz: 0.0,
            p_h: 0.0,
            p_s: 0.0,
            p_t: 0.0,
        }
    }
}

impl RandomCircuitBuilder {
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    pub fn qubits(&mut self, qubits: usize) -> &mut Self {
        self.qubits = qubits;
        self
    }

    pub fn depth(&mut self, depth: usize) -> &mut Self {
        self.depth = depth;
        self
    }

    pub fn p_cnot(&mut self, p_cnot: f32) -> &mut Self {
        self.p_cnot = p_cnot;
        self
    }

    pub fn p_cz(&mut self, p_cz: f32) -> &mut Self {
        self.p_cz = p_cz;
        self
    }

    pub fn p_h(&mut self, p_h: f32) -> &mut Self {
        self.p_h = p_h;
        self
    }

    pub fn p_s(&mut self, p_s: f32) -> &mut Self {
        self.p_s = p_s;
        self
    }

    pub fn p_t(&mut self, p_t: f32) -> &mut Self {
        self.p_t = p_t;
        self
    }

    /// Distribute the remaining probability evenly among CNOT, H and S
    pub fn with_cliffords(&mut self) -> &mut Self {
        let p = (1.0 - self.p_t - self.p_cz) / 3.0;
        self.p_cnot = p;
        self.p_h = p;
        self.p_s = p;
        self
    }

    /// Clifford+T circuits with T gates drawn with probability `p_t`
    pub fn clifford_t(&mut self, p_t: f32) -> &mut Self {
        self.p_t(p_t).with_cliffords()
    }

    pub fn uniform(&mut self) -> &mut Self {
        self.p_cnot = 0.2;
        self.p_cz = 0.2;
        self.p_h = 0.2;
        self.p_s = 0.2;
        self.p_t = 0.2;
        self
    }

    /// Draw the circuit
    ///
    /// On a single qubit there is no room for CNOT or CZ, so those draws
    /// are dropped and the circuit comes out shorter than `depth`.
    pub fn build(&mut self) -> Result<Circuit, CircuitError> {
        let mut c = Circuit::new(self.qubits);
        if self.qubits == 0 {
            return Ok(c);
        }

        for _ in 0..self.depth {
            let p: f32 = self.rng.random();
            let q0 = self.rng.random_range(0..self.qubits);
            let q1 = if self.qubits > 1 {
                let q = self.rng.random_range(0..self.qubits - 1);
                Some(if q >= q0 { q + 1 } else { q })
            } else {
                None
            };

            let two = [(self.p_cnot, CNOT), (self.p_cz, CZ)];
            let one = [(self.p_h, HAD), (self.p_s, S), (self.p_t, T)];
            let mut p0 = 0.0;
            let mut gate = None;
            for (pg, t) in two {
                p0 += pg;
                if gate.is_none() && p < p0 {
                    gate = Some(q1.map(|q1| Gate::new(t, vec![q0, q1])));
                }
            }
            for (pg, t) in one {
                p0 += pg;
                if gate.is_none() && p < p0 {
                    gate = Some(Some(Gate::new(t, vec![q0])));
                }
            }

            if let Some(Some(g)) = gate {
                c.push(g)?;
            }
        }

        log::debug!("random circuit: {}", c.stats());
        Ok(c)
    }
}
