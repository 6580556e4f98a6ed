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

//! Dense tensor semantics for circuits and graphs
//!
//! Both [`Circuit`] and any [`GraphLike`] can be turned into a tensor with
//! one axis per input followed by one axis per output. Entry `[x, y]` is the
//! amplitude `<y|U|x>` of the linear map, so a circuit and a graph denote the
//! same map exactly when their tensors agree. Graphs carry no global scalar,
//! so tensors are compared up to a non-zero factor with [`CompareTensors`].

use crate::circuit::*;
use crate::gate::*;
use crate::graph::*;
use approx::AbsDiffEq;
use itertools::Itertools;
use ndarray::prelude::*;
use ndarray::{azip, ShapeError};
use num::complex::Complex64;
use num::One;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use std::f64::consts::{FRAC_1_SQRT_2, PI};
use thiserror::Error;

/// Tensors over floating point complex numbers
pub type Tensor = Array<Complex64, IxDyn>;

/// Entries closer than this, relative to the largest entry, are equal
pub const EPSILON: f64 = 1e-8;

#[derive(Debug, Error)]
pub enum TensorError {
    #[error("no tensor for gate {0:?}")]
    UnsupportedGate(GType),

    #[error("boundary {0} is neither an input nor an output")]
    StrayBoundary(NodeId),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

pub trait ToTensor {
    fn to_tensor(&self) -> Result<Tensor, TensorError>;
}

pub trait QubitOps {
    fn ident(q: usize) -> Self;
    fn delta_at(&mut self, qs: &[usize]);
    fn cphase_at(&mut self, p: impl Into<Phase>, qs: &[usize]);
    fn hadamard_at(&mut self, q: usize);
}

pub trait CompareTensors {
    /// Equal up to a non-zero scalar factor
    fn scalar_eq(&self, other: &Self) -> bool;
}

fn phase_factor(p: Phase) -> Complex64 {
    Complex64::from_polar(1.0, PI * p.to_f64())
}

/// Shape with a 2 on each axis in `qs` and 1 elsewhere, for broadcasting
fn broadcast_shape(ndim: usize, qs: &[usize]) -> Vec<usize> {
    let mut shape = vec![1; ndim];
    for &q in qs {
        shape[q] = 2;
    }
    shape
}

impl QubitOps for Tensor {
    fn ident(q: usize) -> Self {
        Tensor::from_shape_fn(vec![2; 2 * q], |ix| {
            if (0..q).all(|i| ix[i] == ix[q + i]) {
                Complex64::one()
            } else {
                Complex64::new(0.0, 0.0)
            }
        })
    }

    fn delta_at(&mut self, qs: &[usize]) {
        let Some(&q0) = qs.first() else { return };
        let d = Tensor::from_shape_fn(broadcast_shape(self.ndim(), qs), |ix| {
            if qs.iter().all(|&q| ix[q] == ix[q0]) {
                Complex64::one()
            } else {
                Complex64::new(0.0, 0.0)
            }
        });
        *self *= &d;
    }

    fn cphase_at(&mut self, p: impl Into<Phase>, qs: &[usize]) {
        let f = phase_factor(p.into());
        let d = Tensor::from_shape_fn(broadcast_shape(self.ndim(), qs), |ix| {
            if qs.iter().all(|&q| ix[q] == 1) {
                f
            } else {
                Complex64::one()
            }
        });
        *self *= &d;
    }

    fn hadamard_at(&mut self, q: usize) {
        let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
        let (mut zero, mut one) = self.view_mut().split_at(Axis(q), 1);
        azip!((x in &mut zero, y in &mut one) {
            let (a, b) = (*x, *y);
            *x = (a + b) * s;
            *y = (a - b) * s;
        });
    }
}

fn close(a: Complex64, b: Complex64, eps: f64) -> bool {
    a.re.abs_diff_eq(&b.re, eps) && a.im.abs_diff_eq(&b.im, eps)
}

impl CompareTensors for Tensor {
    fn scalar_eq(&self, other: &Tensor) -> bool {
        if self.shape() != other.shape() {
            return false;
        }

        // the largest entry of self fixes the scalar, then we cross-multiply
        let Some((i, &b0)) = self
            .iter()
            .enumerate()
            .max_by(|(_, x), (_, y)| x.norm().total_cmp(&y.norm()))
        else {
            return true;
        };
        let b1 = other.iter().nth(i).copied().unwrap_or_default();
        let m1 = other.iter().map(|x| x.norm()).fold(0.0, f64::max);

        match (b0.norm() > EPSILON, m1 > EPSILON) {
            (true, true) => {
                if b1.norm() <= EPSILON * m1 {
                    return false;
                }
                let eps = EPSILON * b0.norm() * m1;
                self.iter()
                    .zip(other.iter())
                    .all(|(&x, &y)| close(x * b1, y * b0, eps))
            }
            (false, false) => true,
            _ => false,
        }
    }
}

/// Compare the tensors of two circuits or graphs up to a scalar
pub fn scalar_compare(x0: &impl ToTensor, x1: &impl ToTensor) -> Result<bool, TensorError> {
    Ok(x0.to_tensor()?.scalar_eq(&x1.to_tensor()?))
}

/// Apply a gate to the input axes of a tensor, i.e. precompose with it
fn apply_gate(a: &mut Tensor, gate: &Gate) -> Result<(), TensorError> {
    match (gate.t, &gate.qs[..]) {
        (HAD, &[q]) => a.hadamard_at(q),
        (NOT, &[q]) => {
            a.hadamard_at(q);
            a.cphase_at(1, &[q]);
            a.hadamard_at(q);
        }
        (XPhase, &[q]) => {
            a.hadamard_at(q);
            a.cphase_at(gate.phase, &[q]);
            a.hadamard_at(q);
        }
        (ZPhase, &[q]) => a.cphase_at(gate.phase, &[q]),
        (CNOT, &[c, t]) => {
            a.hadamard_at(t);
            a.cphase_at(1, &[c, t]);
            a.hadamard_at(t);
        }
        (CZ, &[c, t]) => a.cphase_at(1, &[c, t]),
        (t, &[q]) => match t.z_phase() {
            Some(p) => a.cphase_at(p, &[q]),
            None => return Err(TensorError::UnsupportedGate(t)),
        },
        (t, _) => return Err(TensorError::UnsupportedGate(t)),
    }
    Ok(())
}

impl ToTensor for Circuit {
    fn to_tensor(&self) -> Result<Tensor, TensorError> {
        let mut a = Tensor::ident(self.num_qubits());
        // every gate matrix is symmetric, so precomposing in reverse order
        // leaves the inputs on the first half of the axes
        let gates = self.gates().collect_vec();
        for gate in gates.into_iter().rev() {
            apply_gate(&mut a, gate)?;
        }
        Ok(a)
    }
}

/// Every wire of a graph once, as `(v, w, hadamard)` between two nodes that
/// are not Hadamard boxes
///
/// A chain of boxes folds into one wire, which is a Hadamard wire when the
/// chain has odd length. A Red end flips it once more, since a Red spider is
/// a Green one with a Hadamard on every leg. Plain self-loops are dropped,
/// and closed chains of boxes with no spider on them only change the scalar.
fn tensor_edges(g: &impl GraphLike) -> Result<Vec<(NodeId, NodeId, bool)>, TensorError> {
    let red = |v: NodeId| g.color(v) == Ok(Color::Red);
    let mut walked: FxHashSet<NodeId> = FxHashSet::default();
    let mut edges = Vec::new();

    for v in g.nodes().filter(|&v| !g.is_hadamard(v)) {
        for &w in g.neighbors(v)? {
            if !g.is_hadamard(w) {
                if v < w {
                    edges.push((v, w, red(v) ^ red(w)));
                }
                continue;
            }
            if !walked.insert(w) {
                continue;
            }

            let (mut prev, mut cur, mut h) = (v, w, false);
            while g.is_hadamard(cur) {
                h = !h;
                let next = g.across(cur, prev)?;
                (prev, cur) = (cur, next);
                if g.is_hadamard(cur) && !walked.insert(cur) {
                    return Err(GraphError::MissingEdge(prev, cur).into());
                }
            }
            edges.push((v, cur, h ^ red(v) ^ red(cur)));
        }
    }
    Ok(edges)
}

/// Inputs, then spiders in breadth-first order from the inputs, then
/// outputs
///
/// Spiders the sweep does not reach follow in id order, each starting a
/// sweep of its own.
fn contraction_order(
    g: &impl GraphLike,
    incident: &FxHashMap<NodeId, Vec<(NodeId, bool)>>,
) -> Vec<NodeId> {
    let mut order = g.inputs().to_vec();
    let mut seen: FxHashSet<NodeId> = order.iter().copied().collect();
    let mut queue: VecDeque<NodeId> = VecDeque::new();

    let starts = g
        .inputs()
        .iter()
        .copied()
        .chain(g.nodes().filter(|&v| g.is_spider(v)))
        .collect_vec();
    for s in starts {
        if g.is_spider(s) {
            if !seen.insert(s) {
                continue;
            }
            order.push(s);
        }
        queue.push_back(s);
        while let Some(v) = queue.pop_front() {
            for &(w, _) in incident.get(&v).map_or(&[][..], Vec::as_slice) {
                if g.is_spider(w) && seen.insert(w) {
                    order.push(w);
                    queue.push_back(w);
                }
            }
        }
    }

    order.extend(g.outputs().iter().copied());
    order
}

impl<G: GraphLike> ToTensor for G {
    fn to_tensor(&self) -> Result<Tensor, TensorError> {
        let g = self;
        if let Some(b) = g.find_node(|v| {
            g.is_boundary(v) && !g.inputs().contains(&v) && !g.outputs().contains(&v)
        }) {
            return Err(TensorError::StrayBoundary(b));
        }

        let mut incident: FxHashMap<NodeId, Vec<(NodeId, bool)>> = FxHashMap::default();
        let mut h_loops: FxHashMap<NodeId, i64> = FxHashMap::default();
        for (v, w, h) in tensor_edges(g)? {
            if v == w {
                // a Hadamard self-loop is a phase of pi
                if h {
                    *h_loops.entry(v).or_default() += 1;
                }
                continue;
            }
            incident.entry(v).or_default().push((w, h));
            incident.entry(w).or_default().push((v, h));
        }
        let degree = |v: NodeId| incident.get(&v).map_or(0, Vec::len);
        let order = contraction_order(g, &incident);

        let half = Complex64::new(FRAC_1_SQRT_2, 0.0);
        let mut a = Tensor::from_elem(IxDyn(&[]), Complex64::one());
        let mut indexv: VecDeque<NodeId> = VecDeque::new();
        let mut seenv: FxHashMap<NodeId, usize> = FxHashMap::default();

        // Each node gets a new axis 0, which is summed out once all of its
        // edges have been plugged in. Boundary axes stay open, and since we
        // go in reverse and push to the front, they end up in input, output
        // order.
        for &v in order.iter().rev() {
            let f = match g.kind(v)? {
                NodeKind::Spider { phase, .. } => {
                    let loops = h_loops.get(&v).copied().unwrap_or(0);
                    phase_factor(phase + Phase::from(loops))
                }
                _ => Complex64::one(),
            };
            let a1 = &a * f;
            a = ndarray::stack(Axis(0), &[a.view(), a1.view()])?;
            indexv.push_front(v);

            let mut deg_v = 0;
            for &(w, h) in incident.get(&v).map_or(&[][..], Vec::as_slice) {
                let Some(deg_w) = seenv.get_mut(&w) else {
                    continue;
                };
                deg_v += 1;
                *deg_w += 1;

                let wi = indexv
                    .iter()
                    .position(|&x| x == w)
                    .ok_or(GraphError::MissingEdge(v, w))?;
                if h {
                    a.cphase_at(1, &[0, wi]);
                    a *= half;
                } else {
                    a.delta_at(&[0, wi]);
                }

                if !g.is_boundary(w) && *deg_w == degree(w) {
                    a = a.sum_axis(Axis(wi));
                    indexv.remove(wi);
                }
            }

            if !g.is_boundary(v) && deg_v == degree(v) {
                a = a.sum_axis(Axis(0));
                indexv.pop_front();
            }
            seenv.insert(v, deg_v);
        }

        Ok(a)
    }
}
