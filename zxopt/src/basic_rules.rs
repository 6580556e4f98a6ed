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

//! # Basic ZX-calculus rules
//!
//! These rules come in triples of functions. For a rule X, there is a
//! function `check_X(&g, ...) -> bool` which checks whether the rule is
//! applicable at the given node or nodes, `X_unchecked(&mut g, ...)` which
//! applies the rule trusting the caller, and `X(&mut g, ...) ->
//! Result<bool, GraphError>` which is the composition of the first two.
//!
//! Calling `X_unchecked` when `check_X` does not hold may make an unsound
//! rewrite. It never panics: kind and color mismatches it can see come back
//! as [`GraphError::WrongKind`].
//!
//! Hadamard edges are explicit here. A Hadamard edge between spiders `a` and
//! `b` is a [`NodeKind::HadamardBox`] adjacent to both, and the rules create
//! and delete those boxes as needed.

use crate::graph::*;
use itertools::Itertools;
use num::Zero;
use rustc_hash::FxHashSet;

/// Define a checked rule that takes 1 node
macro_rules! checked_rule1 {
    ( $check:ident, $unchecked:ident, $name:ident ) => {
        /// A checked implementation of the rule
        ///
        /// Returns `Ok(true)` if the rule applied. See e.g. [spider_fusion].
        pub fn $name(g: &mut impl GraphLike, v: NodeId) -> Result<bool, GraphError> {
            if $check(g, v) {
                $unchecked(g, v)?;
                Ok(true)
            } else {
                Ok(false)
            }
        }
    };
}

/// Define a checked rule that takes 2 nodes
macro_rules! checked_rule2 {
    ( $check:ident, $unchecked:ident, $name:ident ) => {
        /// A checked implementation of the rule
        ///
        /// Returns `Ok(true)` if the rule applied. See e.g. [spider_fusion].
        pub fn $name(g: &mut impl GraphLike, v0: NodeId, v1: NodeId) -> Result<bool, GraphError> {
            if $check(g, v0, v1) {
                $unchecked(g, v0, v1)?;
                Ok(true)
            } else {
                Ok(false)
            }
        }
    };
}

fn wrong_kind(g: &impl GraphLike, rule: &'static str, v: NodeId) -> GraphError {
    match g.kind(v) {
        Ok(found) => GraphError::WrongKind {
            rule,
            node: v,
            found,
        },
        Err(e) => e,
    }
}

/// Add a Hadamard edge between `a` and `b`, or remove one if it is already
/// there
pub fn toggle_hadamard_edge(
    g: &mut impl GraphLike,
    a: NodeId,
    b: NodeId,
) -> Result<(), GraphError> {
    if let Some(h) = g.hadamard_between(a, b)? {
        g.remove_node(h)
    } else {
        let h = g.add_hadamard();
        g.add_edge(a, h)?;
        g.add_edge(h, b)
    }
}

/// Toggle Hadamard edges between every pair of Hadamard-neighbours of `v`
fn complement(g: &mut impl GraphLike, v: NodeId) -> Result<(), GraphError> {
    let ns = g.hadamard_neighbors(v)?;
    for (a, b) in ns.into_iter().tuple_combinations() {
        toggle_hadamard_edge(g, a, b)?;
    }
    Ok(())
}

/// Delete `v` together with the boxes hanging off it
fn remove_with_boxes(g: &mut impl GraphLike, v: NodeId) -> Result<(), GraphError> {
    for h in g.neighbor_vec(v)? {
        if g.is_hadamard(h) && g.contains(h) {
            g.remove_node(h)?;
        }
    }
    g.remove_node(v)
}

/// True if every leg of `v` is a box to a distinct Green spider other than
/// `v` itself
fn only_hadamard_legs(g: &impl GraphLike, v: NodeId) -> bool {
    let Ok(nhd) = g.neighbors(v) else {
        return false;
    };
    let mut seen = FxHashSet::default();
    nhd.iter().all(|&h| {
        g.is_hadamard(h)
            && g.across(h, v).is_ok_and(|w| {
                w != v && g.color(w) == Ok(Color::Green) && seen.insert(w)
            })
    })
}

/// Check [spider_fusion_unchecked] applies
///
/// Both nodes must be spiders of the same color, connected by a plain edge.
///
/// ```
/// # use zxopt::graph::*;
/// # use zxopt::vec_graph::Graph;
/// # use zxopt::basic_rules::check_spider_fusion;
/// let mut g = Graph::new();
/// let v0 = g.add_spider(Color::Green, 0);
/// let v1 = g.add_spider(Color::Green, (1, 2));
/// let v2 = g.add_spider(Color::Red, 0);
/// g.add_edge(v0, v1).unwrap();
/// g.add_edge(v1, v2).unwrap();
///
/// assert!(check_spider_fusion(&g, v0, v1));
/// assert!(!check_spider_fusion(&g, v1, v2));
/// ```
pub fn check_spider_fusion(g: &impl GraphLike, v0: NodeId, v1: NodeId) -> bool {
    v0 != v1
        && g.is_connected(v0, v1).unwrap_or(false)
        && match (g.color(v0), g.color(v1)) {
            (Ok(c0), Ok(c1)) => c0 == c1,
            _ => false,
        }
}

/// Apply spider fusion
///
/// The first node is kept and the second is deleted. Every other edge of the
/// deleted spider moves onto the kept one, so a parallel edge between the two
/// becomes a self-loop.
pub fn spider_fusion_unchecked(
    g: &mut impl GraphLike,
    v0: NodeId,
    v1: NodeId,
) -> Result<(), GraphError> {
    let (c0, p0) = g.spider_data(v0, "spider_fusion")?;
    let (c1, p1) = g.spider_data(v1, "spider_fusion")?;
    if c0 != c1 {
        return Err(wrong_kind(g, "spider_fusion", v1));
    }

    g.remove_edge(v0, v1)?;
    let nhd = g.neighbor_vec(v1)?;
    for &w in nhd.iter().filter(|&&w| w != v1) {
        g.add_edge(v0, w)?;
    }
    for _ in 0..nhd.iter().filter(|&&w| w == v1).count() / 2 {
        g.add_edge(v0, v0)?;
    }

    g.set_phase(v0, p0 + p1)?;
    g.remove_node(v1)?;
    log::debug!("spider_fusion {v0} <- {v1}");
    Ok(())
}

checked_rule2!(check_spider_fusion, spider_fusion_unchecked, spider_fusion);

pub fn check_color_change(g: &impl GraphLike, v: NodeId) -> bool {
    g.is_spider(v)
}

/// Flip the color of a spider, putting a Hadamard box on each of its legs
///
/// A self-loop has two legs and so gets two boxes.
pub fn color_change_unchecked(g: &mut impl GraphLike, v: NodeId) -> Result<(), GraphError> {
    let c = g.spider_data(v, "color_change")?.0;
    let mut loop_ends = 0;
    for w in g.neighbor_vec(v)? {
        if w == v {
            loop_ends += 1;
            if loop_ends % 2 == 0 {
                continue;
            }
            let h0 = g.add_hadamard();
            g.insert_node(h0, v, v)?;
            let h1 = g.add_hadamard();
            g.insert_node(h1, v, h0)?;
        } else {
            let h = g.add_hadamard();
            g.insert_node(h, v, w)?;
        }
    }
    g.set_color(v, c.flipped())?;
    log::debug!("color_change {v}");
    Ok(())
}

checked_rule1!(check_color_change, color_change_unchecked, color_change);

/// Splice a new zero-phase spider of the given color into the `a`–`b` edge
///
/// Returns the new spider. Fails with `MissingEdge` if there is no such
/// edge.
pub fn identity_insert(
    g: &mut impl GraphLike,
    a: NodeId,
    b: NodeId,
    color: Color,
) -> Result<NodeId, GraphError> {
    if !g.is_connected(a, b)? {
        return Err(GraphError::MissingEdge(a, b));
    }
    let s = g.add_spider(color, 0);
    g.insert_node(s, a, b)?;
    Ok(s)
}

/// Check [remove_hadamard_pair_unchecked] applies
///
/// Both nodes must be distinct, adjacent boxes that are not joined twice.
pub fn check_remove_hadamard_pair(g: &impl GraphLike, h0: NodeId, h1: NodeId) -> bool {
    h0 != h1
        && g.is_hadamard(h0)
        && g.is_hadamard(h1)
        && g.across(h0, h1).is_ok_and(|a| a != h1)
}

/// Cancel two adjacent Hadamard boxes, wiring their outer neighbours together
pub fn remove_hadamard_pair_unchecked(
    g: &mut impl GraphLike,
    h0: NodeId,
    h1: NodeId,
) -> Result<(), GraphError> {
    if !g.is_hadamard(h0) {
        return Err(wrong_kind(g, "remove_hadamard_pair", h0));
    }
    if !g.is_hadamard(h1) {
        return Err(wrong_kind(g, "remove_hadamard_pair", h1));
    }
    let a = g.across(h0, h1)?;
    let b = g.across(h1, h0)?;
    g.remove_node(h0)?;
    g.remove_node(h1)?;
    g.add_edge(a, b)?;
    log::debug!("remove_hadamard_pair {h0} {h1}");
    Ok(())
}

checked_rule2!(
    check_remove_hadamard_pair,
    remove_hadamard_pair_unchecked,
    remove_hadamard_pair
);

/// Check [local_comp_unchecked] applies
///
/// The node must be a Green spider with phase 1/2 or -1/2, not adjacent to a
/// boundary, and surrounded by Hadamard boxes leading to other Green spiders.
pub fn check_local_comp(g: &impl GraphLike, v: NodeId) -> bool {
    g.spider_data(v, "local_comp")
        .is_ok_and(|(c, p)| c == Color::Green && p.is_proper_clifford())
        && only_hadamard_legs(g, v)
}

/// Apply a local complementation
///
/// This is the version that deletes the targeted node: the neighbourhood
/// of `v` is complemented, each neighbour gets `-phase(v)`, and `v` goes away
/// with its boxes.
pub fn local_comp_unchecked(g: &mut impl GraphLike, v: NodeId) -> Result<(), GraphError> {
    let p = g.spider_data(v, "local_comp")?.1;
    let ns = g.hadamard_neighbors(v)?;
    for &n in &ns {
        g.add_to_phase(n, -p)?;
    }
    complement(g, v)?;
    remove_with_boxes(g, v)?;
    log::debug!("local_comp {v} ({} neighbours)", ns.len());
    Ok(())
}

checked_rule1!(check_local_comp, local_comp_unchecked, local_comp);

/// Check [pivot_unchecked] applies
///
/// Both nodes must be Green spiders with phase 0 or 1, joined by a Hadamard
/// edge, and surrounded by Hadamard boxes leading to other Green spiders.
pub fn check_pivot(g: &impl GraphLike, v0: NodeId, v1: NodeId) -> bool {
    let pauli = |v| {
        g.spider_data(v, "pivot")
            .is_ok_and(|(c, p)| c == Color::Green && p.is_pauli())
    };
    v0 != v1
        && pauli(v0)
        && pauli(v1)
        && g.hadamard_between(v0, v1).is_ok_and(|h| h.is_some())
        && only_hadamard_legs(g, v0)
        && only_hadamard_legs(g, v1)
}

/// Apply pivoting to a pair of nodes
///
/// This is the version that deletes both nodes. Neighbours of `v0` pick up
/// the phase of `v1` (plus 1 if they also neighbour `v1`), neighbours of `v1`
/// pick up the phase of `v0`, and the graph is complemented at `v0`, `v1`,
/// `v0` in turn.
pub fn pivot_unchecked(g: &mut impl GraphLike, v0: NodeId, v1: NodeId) -> Result<(), GraphError> {
    let p0 = g.spider_data(v0, "pivot")?.1;
    let p1 = g.spider_data(v1, "pivot")?.1;

    let ns0: Vec<NodeId> = g
        .hadamard_neighbors(v0)?
        .into_iter()
        .filter(|&n| n != v1)
        .collect();
    let ns1: Vec<NodeId> = g
        .hadamard_neighbors(v1)?
        .into_iter()
        .filter(|&n| n != v0)
        .collect();

    for &n in &ns0 {
        g.add_to_phase(n, p1)?;
        if ns1.contains(&n) {
            g.add_to_phase(n, 1)?;
        }
    }
    for &n in &ns1 {
        g.add_to_phase(n, p0)?;
    }

    complement(g, v0)?;
    complement(g, v1)?;
    complement(g, v0)?;

    remove_with_boxes(g, v0)?;
    remove_with_boxes(g, v1)?;
    log::debug!("pivot {v0} {v1}");
    Ok(())
}

checked_rule2!(check_pivot, pivot_unchecked, pivot);

pub fn check_extract_boundary(g: &impl GraphLike, v: NodeId) -> bool {
    g.is_spider(v) && g.is_connected_to_boundary(v).unwrap_or(false)
}

/// Move a spider's phase one step away from a boundary
///
/// The edge to the last boundary `b` in the adjacency of `v` is replaced by
/// the chain `v - box - s(0) - box - s'(phase(v)) - b`, and `v` is zeroed.
/// Returns the new spider `s'`, which now holds the boundary.
pub fn extract_boundary_unchecked(
    g: &mut impl GraphLike,
    v: NodeId,
) -> Result<NodeId, GraphError> {
    let (c, p) = g.spider_data(v, "extract_boundary")?;
    let Some(&b) = g.neighbors(v)?.iter().rev().find(|&&w| g.is_boundary(w)) else {
        return Err(wrong_kind(g, "extract_boundary", v));
    };

    let h0 = g.add_hadamard();
    g.insert_node(h0, v, b)?;
    let s0 = g.add_spider(c, 0);
    g.insert_node(s0, h0, b)?;
    let h1 = g.add_hadamard();
    g.insert_node(h1, s0, b)?;
    let s1 = g.add_spider(c, p);
    g.insert_node(s1, h1, b)?;

    g.set_phase(v, 0)?;
    log::debug!("extract_boundary {v} -> {s1} (boundary {b})");
    Ok(s1)
}

checked_rule1!(
    check_extract_boundary,
    extract_boundary_unchecked,
    extract_boundary
);

/// Check [remove_id_unchecked] applies
///
/// The node must be a zero-phase spider with two legs, neither of them a
/// self-loop.
pub fn check_remove_id(g: &impl GraphLike, v: NodeId) -> bool {
    g.phase(v).is_ok_and(|p| p.is_zero())
        && g
            .neighbors(v)
            .is_ok_and(|nhd| nhd.len() == 2 && !nhd.contains(&v))
}

/// Remove an identity spider, connecting its two neighbours
pub fn remove_id_unchecked(g: &mut impl GraphLike, v: NodeId) -> Result<(), GraphError> {
    let (a, b) = match *g.neighbors(v)? {
        [a, b] => (a, b),
        _ => return Err(wrong_kind(g, "remove_id", v)),
    };
    g.remove_node(v)?;
    g.add_edge(a, b)?;
    log::debug!("remove_id {v}");
    Ok(())
}

checked_rule1!(check_remove_id, remove_id_unchecked, remove_id);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec_graph::Graph;
    use num::One;
    use rstest::{fixture, rstest};

    fn hedge(g: &mut Graph, a: NodeId, b: NodeId) -> NodeId {
        let h = g.add_hadamard();
        g.add_edge(a, h).unwrap();
        g.add_edge(h, b).unwrap();
        h
    }

    /// Splice `items` one after another into the wire from `l` to `r`
    fn chain(g: &mut Graph, mut l: NodeId, r: NodeId, items: &[NodeId]) {
        for &n in items {
            g.insert_node(n, l, r).unwrap();
            l = n;
        }
    }

    #[test]
    fn spider_fusion_two_wires() {
        let mut g = Graph::with_qubits(2);
        let (i0, o0, i1, o1) = (g.inputs()[0], g.outputs()[0], g.inputs()[1], g.outputs()[1]);
        let s0 = g.add_spider(Color::Red, 0.8);
        let s1 = g.add_spider(Color::Red, 1.3);
        g.insert_node(s0, i0, o0).unwrap();
        g.insert_node(s1, i1, o1).unwrap();
        g.add_edge(s0, s1).unwrap();

        assert!(spider_fusion(&mut g, s0, s1).unwrap());
        assert_eq!(g.num_nodes(), 5);
        assert_eq!(g.id_counter(), 6);
        assert_eq!(g.neighbor_vec(s0).unwrap(), vec![i0, o0, i1, o1]);
        assert_eq!(g.phase(s0).unwrap(), Phase::from((1, 10)));
        assert!(!g.contains(s1));
        assert_eq!(g.neighbor_vec(i1).unwrap(), vec![s0]);
    }

    #[test]
    fn spider_fusion_parallel_edge_makes_loop() {
        let mut g = Graph::new();
        let a = g.add_spider(Color::Green, 0);
        let b = g.add_spider(Color::Green, 0);
        g.add_edge(a, b).unwrap();
        g.add_edge(a, b).unwrap();
        spider_fusion(&mut g, a, b).unwrap();
        assert_eq!(g.neighbor_vec(a).unwrap(), vec![a, a]);
    }

    #[test]
    fn spider_fusion_mismatch() {
        let mut g = Graph::new();
        let a = g.add_spider(Color::Green, 0);
        let b = g.add_spider(Color::Red, 0);
        let h = g.add_hadamard();
        g.add_edge(a, b).unwrap();
        g.add_edge(a, h).unwrap();
        assert!(!spider_fusion(&mut g, a, b).unwrap());
        assert!(matches!(
            spider_fusion_unchecked(&mut g, a, b),
            Err(GraphError::WrongKind { node, .. }) if node == b
        ));
        assert!(matches!(
            spider_fusion_unchecked(&mut g, a, h),
            Err(GraphError::WrongKind { rule: "spider_fusion", .. })
        ));
    }

    #[test]
    fn color_change_boxes_every_leg() {
        let mut g = Graph::with_qubits(1);
        let (i, o) = (g.inputs()[0], g.outputs()[0]);
        let s = g.add_spider(Color::Red, 1.2);
        g.insert_node(s, i, o).unwrap();

        assert!(color_change(&mut g, s).unwrap());
        assert_eq!(g.color(s).unwrap(), Color::Green);
        assert_eq!(g.phase(s).unwrap(), Phase::from((-4, 5)));
        assert_eq!(g.neighbor_vec(s).unwrap(), vec![NodeId(3), NodeId(4)]);
        assert_eq!(g.neighbor_vec(NodeId(3)).unwrap(), vec![s, i]);
        assert_eq!(g.neighbor_vec(NodeId(4)).unwrap(), vec![s, o]);
        assert!(!color_change(&mut g, NodeId(3)).unwrap());
    }

    #[test]
    fn color_change_twice_restores() {
        let mut g = Graph::with_qubits(1);
        let (i, o) = (g.inputs()[0], g.outputs()[0]);
        let s = g.add_spider(Color::Green, (1, 4));
        g.insert_node(s, i, o).unwrap();

        color_change(&mut g, s).unwrap();
        color_change(&mut g, s).unwrap();
        for h in g.neighbor_vec(s).unwrap() {
            let outer = g.across(h, s).unwrap();
            assert!(remove_hadamard_pair(&mut g, h, outer).unwrap());
        }
        assert_eq!(g.color(s).unwrap(), Color::Green);
        assert_eq!(g.phase(s).unwrap(), Phase::from((1, 4)));
        assert_eq!(g.neighbor_vec(s).unwrap(), vec![i, o]);
        assert_eq!(g.num_nodes(), 3);
    }

    #[test]
    fn color_change_self_loop() {
        let mut g = Graph::new();
        let s = g.add_spider(Color::Red, 0);
        g.add_edge(s, s).unwrap();
        color_change(&mut g, s).unwrap();
        assert_eq!(g.num_nodes(), 3);
        assert_eq!(g.degree(s).unwrap(), 2);
        assert!(g.neighbors(s).unwrap().iter().all(|&h| g.is_hadamard(h)));
    }

    #[test]
    fn identity_insert_between_boundaries() {
        let mut g = Graph::with_qubits(1);
        let (i, o) = (g.inputs()[0], g.outputs()[0]);
        let s = identity_insert(&mut g, i, o, Color::Red).unwrap();
        assert_eq!(s, NodeId(2));
        assert_eq!(g.kind(s).unwrap(), NodeKind::red(0));
        assert_eq!(g.neighbor_vec(s).unwrap(), vec![i, o]);
        assert_eq!(
            identity_insert(&mut g, i, o, Color::Red),
            Err(GraphError::MissingEdge(i, o))
        );
    }

    #[test]
    fn hadamard_pair_cancels() {
        let mut g = Graph::with_qubits(1);
        let (i, o) = (g.inputs()[0], g.outputs()[0]);
        let h0 = g.add_hadamard();
        let h1 = g.add_hadamard();
        chain(&mut g, i, o, &[h0, h1]);

        assert!(!remove_hadamard_pair(&mut g, h0, h0).unwrap());
        assert!(remove_hadamard_pair(&mut g, h0, h1).unwrap());
        assert_eq!(g.num_nodes(), 2);
        assert!(g.is_identity());
    }

    #[fixture]
    fn lc_graph() -> (Graph, [NodeId; 5]) {
        let mut g = Graph::with_qubits(2);
        let (i0, o0, i1, o1) = (g.inputs()[0], g.outputs()[0], g.inputs()[1], g.outputs()[1]);
        let s1 = g.add_spider(Color::Green, 0);
        let h0 = g.add_hadamard();
        let s2 = g.add_spider(Color::Green, (1, 2));
        chain(&mut g, i0, o0, &[s1, h0, s2]);
        let s3 = g.add_spider(Color::Green, 1);
        let h1 = g.add_hadamard();
        let s4 = g.add_spider(Color::Green, (3, 2));
        chain(&mut g, i1, o1, &[s3, h1, s4]);

        let s0 = g.add_spider(Color::Green, (1, 2));
        for s in [s1, s2, s3, s4] {
            hedge(&mut g, s0, s);
        }
        (g, [s0, s1, s2, s3, s4])
    }

    #[rstest]
    fn local_comp_fixture(lc_graph: (Graph, [NodeId; 5])) {
        let (mut g, [s0, s1, s2, s3, s4]) = lc_graph;
        assert_eq!(g.num_nodes(), 15);
        assert!(!check_local_comp(&g, s1));
        assert!(local_comp(&mut g, s0).unwrap());

        assert_eq!(g.num_nodes(), 12);
        assert!(!g.contains(s0));
        assert_eq!(g.phase(s1).unwrap(), Phase::from((-1, 2)));
        assert_eq!(g.phase(s2).unwrap(), Phase::from(0));
        assert_eq!(g.phase(s3).unwrap(), Phase::from((1, 2)));
        assert_eq!(g.phase(s4).unwrap(), Phase::from(1));

        for (a, b) in [(s1, s3), (s1, s4), (s2, s3), (s2, s4)] {
            assert!(g.hadamard_between(a, b).unwrap().is_some(), "{a}-{b}");
        }
        assert_eq!(g.hadamard_between(s1, s2).unwrap(), None);
        assert_eq!(g.hadamard_between(s3, s4).unwrap(), None);
    }

    #[test]
    fn local_comp_needs_hadamard_legs() {
        let mut g = Graph::new();
        let v = g.add_spider(Color::Green, (1, 2));
        let w = g.add_spider(Color::Green, 0);
        g.add_edge(v, w).unwrap();
        assert!(!local_comp(&mut g, v).unwrap());
    }

    #[fixture]
    fn pivot_graph() -> (Graph, [NodeId; 6]) {
        let mut g = Graph::with_qubits(2);
        let (i0, o0, i1, o1) = (g.inputs()[0], g.outputs()[0], g.inputs()[1], g.outputs()[1]);
        let s2 = g.add_spider(Color::Green, 1);
        let ha = g.add_hadamard();
        let s0 = g.add_spider(Color::Green, 1);
        let hb = g.add_hadamard();
        let s1 = g.add_spider(Color::Green, 2);
        let hc = g.add_hadamard();
        let s3 = g.add_spider(Color::Green, 1);
        chain(&mut g, i0, o0, &[s2, ha, s0, hb, s1, hc, s3]);

        let s4 = g.add_spider(Color::Green, 0);
        let hd = g.add_hadamard();
        let s5 = g.add_spider(Color::Green, 1);
        chain(&mut g, i1, o1, &[s4, hd, s5]);

        for (a, b) in [(s2, s4), (s0, s4), (s1, s5), (s3, s5), (s4, s1), (s5, s0)] {
            hedge(&mut g, a, b);
        }
        (g, [s0, s1, s2, s3, s4, s5])
    }

    #[rstest]
    fn pivot_fixture(pivot_graph: (Graph, [NodeId; 6])) {
        let (mut g, [s0, s1, s2, s3, s4, s5]) = pivot_graph;
        assert_eq!(g.num_nodes(), 20);
        assert!(!check_pivot(&g, s2, s0));
        assert!(pivot(&mut g, s0, s1).unwrap());

        assert_eq!(g.num_nodes(), 12);
        assert_eq!(g.phase(s2).unwrap(), Phase::from(3));
        assert_eq!(g.phase(s3).unwrap(), Phase::from(2));
        assert_eq!(g.phase(s4).unwrap(), Phase::from(4));
        assert_eq!(g.phase(s5).unwrap(), Phase::from(5));

        for (a, b) in [(s2, s5), (s2, s3), (s4, s5), (s3, s4)] {
            assert!(g.hadamard_between(a, b).unwrap().is_some(), "{a}-{b}");
        }
        assert_eq!(g.hadamard_between(s2, s4).unwrap(), None);
        assert_eq!(g.hadamard_between(s3, s5).unwrap(), None);
        assert_eq!(g.nodes().filter(|&v| g.is_hadamard(v)).count(), 4);
    }

    #[test]
    fn extract_boundary_chain() {
        let mut g = Graph::with_qubits(2);
        let (i0, o0, i1, o1) = (g.inputs()[0], g.outputs()[0], g.inputs()[1], g.outputs()[1]);
        let s0 = g.add_spider(Color::Green, 1);
        let s1 = g.add_spider(Color::Green, 0);
        g.insert_node(s0, i0, o0).unwrap();
        g.insert_node(s1, i1, o1).unwrap();
        g.add_edge(s0, s1).unwrap();

        let s3 = extract_boundary_unchecked(&mut g, s0).unwrap();
        let (h0, s2, h1) = (NodeId(6), NodeId(7), NodeId(8));
        assert_eq!(s3, NodeId(9));
        assert_eq!(g.num_nodes(), 10);
        assert_eq!(g.phase(s0).unwrap(), Phase::zero());
        assert_eq!(g.neighbor_vec(s0).unwrap(), vec![i0, h0, s1]);
        assert_eq!(g.neighbor_vec(h0).unwrap(), vec![s0, s2]);
        assert_eq!(g.neighbor_vec(s2).unwrap(), vec![h0, h1]);
        assert_eq!(g.neighbor_vec(h1).unwrap(), vec![s2, s3]);
        assert_eq!(g.neighbor_vec(s3).unwrap(), vec![h1, o0]);
        assert_eq!(g.phase(s3).unwrap(), Phase::one());
        assert_eq!(g.neighbor_vec(o0).unwrap(), vec![s3]);

        assert!(extract_boundary(&mut g, s0).unwrap());
        assert!(!g.is_connected_to_boundary(s0).unwrap());
        assert!(!extract_boundary(&mut g, s0).unwrap());
    }

    #[test]
    fn remove_id_joins_neighbours() {
        let mut g = Graph::with_qubits(1);
        let (i, o) = (g.inputs()[0], g.outputs()[0]);
        let s = g.add_spider(Color::Green, 0);
        let t = g.add_spider(Color::Green, (1, 4));
        chain(&mut g, i, o, &[s, t]);

        assert!(!remove_id(&mut g, t).unwrap());
        assert!(remove_id(&mut g, s).unwrap());
        assert_eq!(g.neighbor_vec(i).unwrap(), vec![t]);
        assert_eq!(g.neighbor_vec(t).unwrap(), vec![o, i]);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut g = Graph::new();
        let a = g.add_spider(Color::Green, 0);
        let b = g.add_spider(Color::Green, 0);
        toggle_hadamard_edge(&mut g, a, b).unwrap();
        assert!(g.hadamard_between(a, b).unwrap().is_some());
        toggle_hadamard_edge(&mut g, b, a).unwrap();
        assert_eq!(g.hadamard_between(a, b).unwrap(), None);
        assert_eq!(g.num_nodes(), 2);
    }
}
