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

//! Rational approximation helpers for phases.

use num::rational::Rational64;
use num::{FromPrimitive, Integer};

/// The fraction closest to `fraction` whose denominator is at most
/// `max_denom`, or `None` when `max_denom` is not positive.
///
/// Walks the continued fraction of `fraction` until the next convergent's
/// denominator would exceed the bound, then picks between the last
/// convergent and the best semiconvergent. Intermediate products are taken
/// in `i128`, so large denominators do not overflow.
///
/// # Example
/// ```
/// # use zxopt::phase::utils::limit_denominator;
/// # use num::rational::Rational64;
/// # use num::FromPrimitive;
/// let pi = Rational64::from_f64(std::f64::consts::PI).unwrap();
/// assert_eq!(limit_denominator(pi, 10), Some(Rational64::new(22, 7)));
/// assert_eq!(limit_denominator(pi, 100), Some(Rational64::new(311, 99)));
/// assert_eq!(
///     limit_denominator(Rational64::new(4321, 8765), 10000),
///     Some(Rational64::new(4321, 8765))
/// );
/// ```
pub fn limit_denominator(fraction: Rational64, max_denom: i64) -> Option<Rational64> {
    if max_denom < 1 {
        return None;
    }
    if *fraction.denom() <= max_denom {
        return Some(fraction);
    }

    let bound = i128::from(max_denom);
    let (mut n, mut d) = (i128::from(*fraction.numer()), i128::from(*fraction.denom()));
    // lower convergent p0/q0 and upper convergent p1/q1
    let (mut p0, mut q0, mut p1, mut q1) = (0i128, 1i128, 1i128, 0i128);
    while d != 0 {
        let a = n.div_floor(&d);
        let q2 = q0 + a * q1;
        if q2 > bound {
            break;
        }
        (p0, q0, p1, q1) = (p1, q1, p0 + a * p1, q2);
        (n, d) = (d, n - a * d);
    }

    let k = (bound - q0).div_floor(&q1);
    let semi = (p0 + k * p1, q0 + k * q1);
    let best = if 2 * d * (q0 + k * q1) <= i128::from(*fraction.denom()) {
        (p1, q1)
    } else {
        semi
    };
    Some(Rational64::new(
        i64::try_from(best.0).ok()?,
        i64::try_from(best.1).ok()?,
    ))
}

/// Convert a float to a fraction with denominator at most `max_denom`
///
/// `None` for non-finite input, or input too large for an `i64` numerator.
pub fn approximate_f64(f: f64, max_denom: i64) -> Option<Rational64> {
    limit_denominator(Rational64::from_f64(f)?, max_denom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.25, 1 << 20, (1, 4))]
    #[case(0.8, 1 << 20, (4, 5))]
    #[case(-1.3, 1 << 20, (-13, 10))]
    #[case(0.333, 10, (1, 3))]
    #[case(2.0, 1, (2, 1))]
    fn floats_to_fractions(#[case] f: f64, #[case] max_denom: i64, #[case] expected: (i64, i64)) {
        assert_eq!(
            approximate_f64(f, max_denom),
            Some(Rational64::new(expected.0, expected.1))
        );
    }

    #[test]
    fn bad_input() {
        assert_eq!(approximate_f64(f64::NAN, 100), None);
        assert_eq!(approximate_f64(f64::INFINITY, 100), None);
        assert_eq!(limit_denominator(Rational64::new(1, 3), 0), None);
    }
}
