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

//! Quantum circuit optimisation with the ZX-calculus
//!
//! A [`circuit::Circuit`] is translated to a ZX-graph, normalised to
//! graph-like form and simplified with local complementation and pivoting
//! ([`simplify`]), then turned back into a circuit ([`extract`]).

pub mod phase;
pub mod graph;
pub mod vec_graph;
pub mod gate;
pub mod circuit;
pub mod generate;
pub mod tensor;
pub mod linalg;
pub mod basic_rules;
pub mod simplify;
pub mod extract;
