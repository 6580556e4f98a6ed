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

//! Normalisation into graph-like form, and Clifford simplification
//!
//! [to_graph_like] brings a freshly translated circuit into the shape the
//! rest of the pipeline expects: only Green spiders, spiders joined only
//! by Hadamard edges, and every boundary on its own spider. [clifford_simp]
//! then removes interior Clifford spiders by local complementation and
//! pivoting.

use crate::basic_rules::*;
use crate::graph::*;
use rustc_hash::FxHashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimplifyError {
    #[error("{pass} did not reach a fixed point within {limit} steps")]
    IterationLimit { pass: &'static str, limit: usize },

    #[error("boundary {0} does not have exactly one neighbour")]
    DanglingBoundary(NodeId),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpOptions {
    /// The maximum number of successful steps any single loop may take
    /// before giving up.
    ///
    /// Defaults to 1 000 000.
    pub max_iterations: usize,
}

impl Default for SimpOptions {
    fn default() -> Self {
        SimpOptions {
            max_iterations: 1_000_000,
        }
    }
}

impl SimpOptions {
    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }
}

/// Run `step` until it reports no progress
///
/// Returns whether any step made progress. More than `limit` successful
/// steps is an [SimplifyError::IterationLimit] for `pass`.
pub fn fixed_point<G: GraphLike>(
    g: &mut G,
    limit: usize,
    pass: &'static str,
    mut step: impl FnMut(&mut G) -> Result<bool, SimplifyError>,
) -> Result<bool, SimplifyError> {
    let mut n = 0;
    while step(g)? {
        n += 1;
        if n > limit {
            return Err(SimplifyError::IterationLimit { pass, limit });
        }
    }
    Ok(n > 0)
}

/// First node, together with one of its neighbours, for which `check` holds
fn find_pair(
    g: &impl GraphLike,
    check: impl Fn(NodeId, NodeId) -> bool,
) -> Option<(NodeId, NodeId)> {
    g.nodes().find_map(|v| {
        let w = g.neighbors(v).ok()?.iter().copied().find(|&w| check(v, w))?;
        Some((v, w))
    })
}

fn sole_neighbor(g: &impl GraphLike, b: NodeId) -> Result<NodeId, SimplifyError> {
    match *g.neighbors(b)? {
        [n] => Ok(n),
        _ => Err(SimplifyError::DanglingBoundary(b)),
    }
}

/// Put a box and then a fresh Green spider on the `a`–`b` edge, returning
/// the spider, which ends up next to `b`
fn pad(g: &mut impl GraphLike, a: NodeId, b: NodeId) -> Result<NodeId, GraphError> {
    let h = g.add_hadamard();
    g.insert_node(h, a, b)?;
    identity_insert(g, h, b, Color::Green)
}

/// Color-change every Red spider
pub fn remove_red_spiders(g: &mut impl GraphLike) -> Result<bool, SimplifyError> {
    let red: Vec<NodeId> = g
        .nodes()
        .filter(|&v| g.color(v) == Ok(Color::Red))
        .collect();
    for &v in &red {
        color_change_unchecked(g, v)?;
    }
    Ok(!red.is_empty())
}

/// Cancel adjacent pairs of boxes, then fuse spiders sharing a plain edge
pub fn add_hadamard_edges<G: GraphLike>(
    g: &mut G,
    opts: &SimpOptions,
) -> Result<bool, SimplifyError> {
    let limit = opts.max_iterations;
    let pairs = fixed_point(g, limit, "remove_hadamard_pairs", |g| {
        let Some((h0, h1)) = find_pair(g, |a, b| check_remove_hadamard_pair(g, a, b)) else {
            return Ok(false);
        };
        remove_hadamard_pair_unchecked(g, h0, h1)?;
        Ok(true)
    })?;
    let fused = fixed_point(g, limit, "spider_fusion", |g| {
        let Some((v0, v1)) = find_pair(g, |a, b| check_spider_fusion(g, a, b)) else {
            return Ok(false);
        };
        spider_fusion_unchecked(g, v0, v1)?;
        Ok(true)
    })?;
    Ok(pairs || fused)
}

/// Two distinct boxes joining the same pair of distinct spiders
fn find_parallel_hadamards(g: &impl GraphLike) -> Option<(NodeId, NodeId)> {
    for v in g.nodes().filter(|&v| g.is_spider(v)) {
        let mut seen: FxHashMap<NodeId, NodeId> = FxHashMap::default();
        for &h in g.neighbors(v).ok()? {
            if !g.is_hadamard(h) {
                continue;
            }
            match g.across(h, v) {
                Ok(w) if w != v && g.is_spider(w) => match seen.get(&w) {
                    Some(&h0) if h0 != h => return Some((h0, h)),
                    Some(_) => {}
                    None => {
                        seen.insert(w, h);
                    }
                },
                _ => {}
            }
        }
    }
    None
}

/// Remove self-loops, Hadamard self-loops and parallel Hadamard edges
///
/// A Hadamard self-loop adds 1 to the phase of its spider. Two Hadamard
/// edges between the same spiders cancel.
pub fn clean_edges<G: GraphLike>(g: &mut G, opts: &SimpOptions) -> Result<bool, SimplifyError> {
    let limit = opts.max_iterations;
    let loops = fixed_point(g, limit, "remove_self_loops", |g| {
        let Some(v) = g.find_node(|v| g.is_spider(v) && g.is_connected(v, v).unwrap_or(false))
        else {
            return Ok(false);
        };
        g.remove_edge(v, v)?;
        log::debug!("remove_self_loop {v}");
        Ok(true)
    })?;

    let h_loops = fixed_point(g, limit, "remove_hadamard_self_loops", |g| {
        let Some(h) = g.find_node(|h| {
            g.is_hadamard(h)
                && matches!(g.neighbors(h), Ok(&[a, b]) if a == b && g.is_spider(a))
        }) else {
            return Ok(false);
        };
        let s = g.neighbors(h)?[0];
        g.add_to_phase(s, 1)?;
        g.remove_node(h)?;
        log::debug!("remove_hadamard_self_loop {h} on {s}");
        Ok(true)
    })?;

    let parallel = fixed_point(g, limit, "remove_parallel_hadamards", |g| {
        let Some((h0, h1)) = find_parallel_hadamards(g) else {
            return Ok(false);
        };
        g.remove_node(h0)?;
        g.remove_node(h1)?;
        log::debug!("remove_parallel_hadamards {h0} {h1}");
        Ok(true)
    })?;

    Ok(loops || h_loops || parallel)
}

/// Give every boundary a spider of its own
///
/// Per qubit, in order: a bare wire gets `s - box - s - box - s`, a box next
/// to a boundary gets a spider spliced in front of it, and a spider shared
/// by the input and the output is moved away from both by a `box - s - box
/// - s` chain on either side.
pub fn clean_io(g: &mut impl GraphLike) -> Result<bool, SimplifyError> {
    let mut changed = false;
    for q in 0..g.num_qubits() {
        let (Some(&i), Some(&o)) = (g.inputs().get(q), g.outputs().get(q)) else {
            break;
        };

        if sole_neighbor(g, i)? == o {
            let s = identity_insert(g, i, o, Color::Green)?;
            let s = pad(g, s, o)?;
            pad(g, s, o)?;
            log::debug!("clean_io: bare wire on qubit {q}");
            changed = true;
            continue;
        }

        let ni = sole_neighbor(g, i)?;
        if g.is_hadamard(ni) {
            identity_insert(g, i, ni, Color::Green)?;
            changed = true;
        }
        let no = sole_neighbor(g, o)?;
        if g.is_hadamard(no) {
            identity_insert(g, o, no, Color::Green)?;
            changed = true;
        }

        let (ni, no) = (sole_neighbor(g, i)?, sole_neighbor(g, o)?);
        if ni == no && g.is_spider(ni) {
            for b in [i, o] {
                let s = pad(g, ni, b)?;
                pad(g, s, b)?;
            }
            log::debug!("clean_io: {ni} shared by both ends of qubit {q}");
            changed = true;
        }
    }
    Ok(changed)
}

pub fn to_graph_like(g: &mut impl GraphLike) -> Result<(), SimplifyError> {
    to_graph_like_with(g, &SimpOptions::default())
}

/// Run the normalisation passes, in order, once each
pub fn to_graph_like_with(
    g: &mut impl GraphLike,
    opts: &SimpOptions,
) -> Result<(), SimplifyError> {
    let before = g.num_nodes();
    remove_red_spiders(g)?;
    add_hadamard_edges(g, opts)?;
    clean_edges(g, opts)?;
    clean_io(g)?;
    log::info!("to_graph_like: {before} -> {} nodes", g.num_nodes());
    Ok(())
}

/// A spider with exactly two legs: one boundary, one box
pub fn is_boundary_stub(g: &impl GraphLike, v: NodeId) -> bool {
    g.is_spider(v)
        && matches!(g.neighbors(v), Ok(&[a, b])
            if (g.is_boundary(a) && g.is_hadamard(b)) || (g.is_hadamard(a) && g.is_boundary(b)))
}

/// A spider with no boundary among its neighbours
pub fn is_interior(g: &impl GraphLike, v: NodeId) -> bool {
    g.is_spider(v) && g.is_connected_to_boundary(v) == Ok(false)
}

/// An interior spider with no boundary stub among its Hadamard-neighbours
///
/// These are the only partners [remove_boundary_pauli] pivots with. The
/// zero-phase spider that pass leaves next to each new stub is never one of
/// them.
pub fn is_away_from_stubs(g: &impl GraphLike, v: NodeId) -> bool {
    is_interior(g, v)
        && g
            .hadamard_neighbors(v)
            .is_ok_and(|ns| !ns.iter().any(|&w| is_boundary_stub(g, w)))
}

/// Local complementation on the first interior proper-Clifford spider
pub fn remove_proper_clifford<G: GraphLike>(g: &mut G) -> Result<bool, SimplifyError> {
    let Some(v) = g.find_node(|v| is_interior(g, v) && check_local_comp(g, v)) else {
        return Ok(false);
    };
    local_comp_unchecked(g, v)?;
    Ok(true)
}

/// Pivot on the first pair of Hadamard-adjacent interior Pauli spiders
pub fn remove_adjacent_pauli<G: GraphLike>(g: &mut G) -> Result<bool, SimplifyError> {
    let found = g.nodes().find_map(|v| {
        if !is_interior(g, v) {
            return None;
        }
        let w = g
            .hadamard_neighbors(v)
            .ok()?
            .into_iter()
            .find(|&w| is_interior(g, w) && check_pivot(g, v, w))?;
        Some((v, w))
    });
    let Some((v, w)) = found else {
        return Ok(false);
    };
    pivot_unchecked(g, v, w)?;
    Ok(true)
}

/// Pivot a boundary spider against an interior Pauli neighbour
///
/// The boundary spider first has its boundary legs pushed out with
/// [extract_boundary_unchecked], which leaves it with phase 0. The neighbour
/// must satisfy [is_away_from_stubs].
pub fn remove_boundary_pauli<G: GraphLike>(g: &mut G) -> Result<bool, SimplifyError> {
    let found = g.nodes().find_map(|v| {
        if !g.is_spider(v) || g.is_connected_to_boundary(v) != Ok(true) {
            return None;
        }
        let w = g.hadamard_neighbors(v).ok()?.into_iter().find(|&w| {
            is_away_from_stubs(g, w) && g.phase(w).is_ok_and(|p| p.is_pauli())
        })?;
        Some((v, w))
    });
    let Some((v, w)) = found else {
        return Ok(false);
    };

    while g.is_connected_to_boundary(v)? {
        extract_boundary_unchecked(g, v)?;
    }
    // v is interior now, so a failed check here is picked up by
    // remove_adjacent_pauli on the next round
    if !pivot(g, v, w)? {
        log::debug!("remove_boundary_pauli: {v} {w} left for the interior pass");
    }
    Ok(true)
}

pub fn clifford_simp(g: &mut impl GraphLike) -> Result<bool, SimplifyError> {
    clifford_simp_with(g, &SimpOptions::default())
}

/// Remove interior Clifford spiders until none of the passes applies
///
/// Each pass runs to a fixed point, followed by [clean_edges] if it changed
/// anything. The whole sequence repeats until a round changes nothing.
pub fn clifford_simp_with<G: GraphLike>(
    g: &mut G,
    opts: &SimpOptions,
) -> Result<bool, SimplifyError> {
    type Pass<G> = fn(&mut G) -> Result<bool, SimplifyError>;
    let passes: [(&'static str, Pass<G>); 3] = [
        ("remove_proper_clifford", remove_proper_clifford),
        ("remove_adjacent_pauli", remove_adjacent_pauli),
        ("remove_boundary_pauli", remove_boundary_pauli),
    ];

    let before = g.num_nodes();
    let limit = opts.max_iterations;
    let got_match = fixed_point(g, limit, "clifford_simp", |g| {
        let mut m = false;
        for (pass, step) in passes {
            if fixed_point(g, limit, pass, step)? {
                clean_edges(g, opts)?;
                m = true;
            }
        }
        Ok(m)
    })?;
    log::info!("clifford_simp: {before} -> {} nodes", g.num_nodes());
    Ok(got_match)
}
