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

//! Matrices and linear algebra over F2, and synthesis of CNOT circuits from
//! invertible matrices

use rustc_hash::FxHashMap;
use std::cmp::min;
use std::fmt;
use std::ops::Range;
use thiserror::Error;

/// A type for matrices over F2
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Mat2 {
    d: Vec<Vec<u8>>,
}

pub trait RowOps {
    /// Add r0 to r1
    fn row_add(&mut self, r0: usize, r1: usize);
    /// Swap r0 and r1
    fn row_swap(&mut self, r0: usize, r1: usize);
}

/// Make unit implement RowOps to allow optional args
impl RowOps for () {
    fn row_add(&mut self, _: usize, _: usize) {}
    fn row_swap(&mut self, _: usize, _: usize) {}
}

/// Record row operations as `(source, target)` additions
///
/// A swap is recorded as the three additions that implement it.
impl RowOps for Vec<(usize, usize)> {
    fn row_add(&mut self, r0: usize, r1: usize) {
        self.push((r0, r1));
    }

    fn row_swap(&mut self, r0: usize, r1: usize) {
        self.push((r0, r1));
        self.push((r1, r0));
        self.push((r0, r1));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("cannot synthesise a circuit from a {rows}x{cols} matrix")]
    NotSquare { rows: usize, cols: usize },

    #[error("matrix is singular")]
    Singular,

    #[error("row {row} has {len} entries, expected {cols}")]
    RaggedRows { row: usize, len: usize, cols: usize },

    #[error("entry ({row}, {col}) is {value}, not a bit")]
    NotBinary { row: usize, col: usize, value: u8 },
}

impl Mat2 {
    /// A matrix from its rows, which must all have the same length and hold
    /// only 0s and 1s
    pub fn new(d: Vec<Vec<u8>>) -> Result<Mat2, SynthesisError> {
        let cols = d.first().map_or(0, Vec::len);
        for (row, r) in d.iter().enumerate() {
            if r.len() != cols {
                return Err(SynthesisError::RaggedRows {
                    row,
                    len: r.len(),
                    cols,
                });
            }
            if let Some(col) = r.iter().position(|&b| b > 1) {
                return Err(SynthesisError::NotBinary {
                    row,
                    col,
                    value: r[col],
                });
            }
        }
        Ok(Mat2 { d })
    }

    /// Build a matrix with the given number of rows and columns. Place a 1
    /// wherever f(i,j) is true.
    pub fn build<F>(rows: usize, cols: usize, f: F) -> Mat2
    where
        F: Fn(usize, usize) -> bool,
    {
        Mat2 {
            d: (0..rows)
                .map(|i| (0..cols).map(|j| u8::from(f(i, j))).collect())
                .collect(),
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Mat2 {
        Mat2::build(rows, cols, |_, _| false)
    }

    /// The identity matrix of a given size
    pub fn id(dim: usize) -> Mat2 {
        Mat2::build(dim, dim, |i, j| i == j)
    }

    pub fn num_rows(&self) -> usize {
        self.d.len()
    }

    pub fn num_cols(&self) -> usize {
        self.d.first().map_or(0, |r| r.len())
    }

    pub fn is_square(&self) -> bool {
        self.num_rows() == self.num_cols()
    }

    /// Return the transpose as a copy
    pub fn transpose(&self) -> Mat2 {
        Mat2::build(self.num_cols(), self.num_rows(), |i, j| self.d[j][i] == 1)
    }

    /// Within the columns `cols`, add to each row the first earlier row (in
    /// the order of `rows`) with the same non-zero sub-row, clearing it there
    fn clear_repeated_chunks<T: RowOps>(
        &mut self,
        rows: impl Iterator<Item = usize>,
        cols: Range<usize>,
        x: &mut T,
    ) {
        let mut seen: FxHashMap<Vec<u8>, usize> = FxHashMap::default();
        for r in rows {
            let chunk = self.d[r][cols.clone()].to_vec();
            if chunk.iter().all(|&b| b == 0) {
                continue;
            }
            match seen.get(&chunk) {
                Some(&r0) => {
                    self.row_add(r0, r);
                    x.row_add(r0, r);
                }
                None => {
                    seen.insert(chunk, r);
                }
            }
        }
    }

    /// Main function for computing the echelon form.
    ///
    /// Returns the number of non-zero rows in the result, i.e. the rank of
    /// the matrix. If `full_reduce` is set, the result is in reduced row
    /// echelon form, as needed for inversion and CNOT circuit synthesis.
    ///
    /// Columns are processed in blocks of `blocksize`, eliminating repeated
    /// sub-rows within each block first, as in:
    ///
    /// K. Patel, I. Markov, J. Hayes. Optimal Synthesis of Linear Reversible
    /// Circuits. QIC 2008
    ///
    /// Every row operation is replayed on `x`. If the elimination computes
    /// `g * m = m'`, then `x` becomes `g * x`; for invertible `m` and a full
    /// reduction, that is `m^-1 * x`.
    fn gauss_helper<T: RowOps>(&mut self, full_reduce: bool, blocksize: usize, x: &mut T) -> usize {
        let rows = self.num_rows();
        let cols = self.num_cols();
        let blocksize = blocksize.max(1);
        let num_blocks = cols.div_ceil(blocksize);
        let block = |b: usize| b * blocksize..min(cols, (b + 1) * blocksize);
        let mut pivots = Vec::new();
        let mut pivot_row = 0;

        for b in 0..num_blocks {
            self.clear_repeated_chunks(pivot_row..rows, block(b), x);

            for p in block(b) {
                let Some(r0) = (pivot_row..rows).find(|&r| self.d[r][p] != 0) else {
                    continue;
                };
                if r0 != pivot_row {
                    self.row_add(r0, pivot_row);
                    x.row_add(r0, pivot_row);
                }
                for r1 in pivot_row + 1..rows {
                    if self.d[r1][p] != 0 {
                        self.row_add(pivot_row, r1);
                        x.row_add(pivot_row, r1);
                    }
                }
                pivots.push(p);
                pivot_row += 1;
            }
        }

        let rank = pivot_row;
        if !full_reduce || rank == 0 {
            return rank;
        }

        // back substitution, block by block from the right
        let mut last = rank - 1;
        for b in (0..num_blocks).rev() {
            self.clear_repeated_chunks((0..=last).rev(), block(b), x);

            while let Some(&p) = pivots.last() {
                if !block(b).contains(&p) {
                    break;
                }
                pivots.pop();
                for r in 0..last {
                    if self.d[r][p] != 0 {
                        self.row_add(last, r);
                        x.row_add(last, r);
                    }
                }
                last = last.saturating_sub(1);
            }
        }
        rank
    }

    pub fn gauss(&mut self, full_reduce: bool) -> usize {
        self.gauss_helper(full_reduce, 3, &mut ())
    }

    pub fn gauss_x(&mut self, full_reduce: bool, blocksize: usize, x: &mut impl RowOps) -> usize {
        self.gauss_helper(full_reduce, blocksize, x)
    }

    pub fn rank(&self) -> usize {
        self.clone().gauss(false)
    }

    pub fn inverse(&self) -> Option<Mat2> {
        if !self.is_square() {
            return None;
        }

        let mut m = self.clone();
        let mut inv = Mat2::id(self.num_rows());
        if m.gauss_helper(true, 3, &mut inv) < self.num_rows() {
            None
        } else {
            Some(inv)
        }
    }

    /// Return the hamming weight of the given row
    pub fn row_weight(&self, i: usize) -> usize {
        self.d[i].iter().filter(|&&b| b == 1).count()
    }
}

impl RowOps for Mat2 {
    fn row_add(&mut self, r0: usize, r1: usize) {
        for i in 0..self.num_cols() {
            self.d[r1][i] ^= self.d[r0][i];
        }
    }

    fn row_swap(&mut self, r0: usize, r1: usize) {
        self.d.swap(r0, r1);
    }
}

impl fmt::Display for Mat2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.d {
            write!(f, "[")?;
            for b in row {
                write!(f, " {b}")?;
            }
            writeln!(f, " ]")?;
        }
        Ok(())
    }
}

impl std::ops::Index<(usize, usize)> for Mat2 {
    type Output = u8;
    fn index(&self, idx: (usize, usize)) -> &Self::Output {
        &self.d[idx.0][idx.1]
    }
}

impl std::ops::IndexMut<(usize, usize)> for Mat2 {
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut Self::Output {
        &mut self.d[idx.0][idx.1]
    }
}

impl std::ops::Index<usize> for Mat2 {
    type Output = Vec<u8>;
    fn index(&self, idx: usize) -> &Self::Output {
        &self.d[idx]
    }
}

/// Matrix product over F2
///
/// # Panics
///
/// If the number of columns of the left factor differs from the number of
/// rows of the right one.
impl std::ops::Mul<&Mat2> for &Mat2 {
    type Output = Mat2;

    fn mul(self, rhs: &Mat2) -> Mat2 {
        assert_eq!(
            self.num_cols(),
            rhs.num_rows(),
            "cannot multiply matrices with mismatched dimensions"
        );
        let k = self.num_cols();
        Mat2::build(self.num_rows(), rhs.num_cols(), |i, j| {
            (0..k).fold(0, |b, l| b ^ (self.d[i][l] & rhs.d[l][j])) == 1
        })
    }
}

/// Read a window of bits as a big-endian binary number
pub fn bin_to_int(bits: &[u8]) -> usize {
    bits.iter().fold(0, |n, &b| (n << 1) | usize::from(b & 1))
}

/// Clear the lower triangle of a square matrix, two columns at a time
///
/// For each section of two columns, rows from the top of the section down
/// are first deduplicated by their two-bit pattern in that section: a row
/// whose non-zero pattern was already seen gets the earlier row added to it.
/// Then, column by column, a zero diagonal is fixed by adding the first lower
/// row with a 1, and every lower 1 is cleared by adding the diagonal row.
///
/// Each row operation `row_t += row_c` is recorded as `(c, t)` in `pairs`.
pub fn synthesise_lower_triangle(
    a: &mut Mat2,
    pairs: &mut Vec<(usize, usize)>,
) -> Result<(), SynthesisError> {
    const SECTION: usize = 2;
    if !a.is_square() {
        return Err(SynthesisError::NotSquare {
            rows: a.num_rows(),
            cols: a.num_cols(),
        });
    }
    let n = a.num_rows();

    for sec in 0..n / SECTION {
        let c0 = sec * SECTION;
        let mut patterns: FxHashMap<usize, usize> = FxHashMap::default();
        for r in c0..n {
            let p = bin_to_int(&a[r][c0..c0 + SECTION]);
            match patterns.get(&p) {
                Some(&r0) if p != 0 => {
                    a.row_add(r0, r);
                    pairs.push((r0, r));
                }
                _ => {
                    patterns.insert(p, r);
                }
            }
        }

        for c in c0..c0 + SECTION {
            let mut diag_set = a[(c, c)] == 1;
            for r in c + 1..n {
                if a[(r, c)] == 0 {
                    continue;
                }
                if !diag_set {
                    a.row_add(r, c);
                    pairs.push((r, c));
                    diag_set = true;
                }
                a.row_add(c, r);
                pairs.push((c, r));
            }
        }
    }
    Ok(())
}

/// Synthesise a CNOT circuit for an invertible matrix
///
/// The lower triangle is cleared first, then the lower triangle of the
/// transpose, whose operations become column operations: control and target
/// swapped, in reverse order. The result is the reverse of the whole
/// sequence, so replaying it from last to first as `row_t += row_c` turns
/// `a` into the identity.
///
/// ```
/// # use zxopt::linalg::*;
/// let a = Mat2::new(vec![vec![1, 1], vec![0, 1]]).unwrap();
/// assert_eq!(synthesise_linear_circuit(&a), Ok(vec![(1, 0)]));
/// ```
pub fn synthesise_linear_circuit(a: &Mat2) -> Result<Vec<(usize, usize)>, SynthesisError> {
    if !a.is_square() {
        return Err(SynthesisError::NotSquare {
            rows: a.num_rows(),
            cols: a.num_cols(),
        });
    }

    let mut m = a.clone();
    let mut lower = Vec::new();
    synthesise_lower_triangle(&mut m, &mut lower)?;

    let mut mt = m.transpose();
    let mut upper = Vec::new();
    synthesise_lower_triangle(&mut mt, &mut upper)?;

    let mut pairs = lower;
    pairs.extend(upper.into_iter().rev().map(|(c, t)| (t, c)));
    pairs.reverse();

    let mut check = a.clone();
    for &(c, t) in pairs.iter().rev() {
        check.row_add(c, t);
    }
    if check == Mat2::id(a.num_rows()) {
        Ok(pairs)
    } else {
        Err(SynthesisError::Singular)
    }
}
