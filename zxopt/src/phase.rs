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

//! Spider phases, encoded as rational numbers of half-turns.

pub mod utils;

use std::fmt::{self, Display};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use num::{One, Rational64, ToPrimitive, Zero};

/// Largest denominator produced when converting a float to a phase.
const MAX_DENOM: i64 = 1 << 20;

/// A phase, expressed in half-turns (units of pi).
///
/// The phase is always normalized to be in the range (-1,1], so two phases
/// compare equal exactly when they denote the same angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Phase {
    r: Rational64,
}

impl Phase {
    /// Creates a new phase, normalized to (-1,1].
    pub fn new(r: impl Into<Rational64>) -> Self {
        Self { r: r.into() }.normalize()
    }

    /// Returns the phase as a rational number of half-turns.
    pub fn to_rational(&self) -> Rational64 {
        self.r
    }

    /// Creates a phase from a floating point number of half-turns.
    ///
    /// The float is rounded to the closest simple fraction, so `0.25` becomes
    /// exactly `1/4`. Non-finite inputs give the zero phase.
    pub fn from_f64(f: f64) -> Self {
        utils::approximate_f64(f, MAX_DENOM)
            .map(Self::new)
            .unwrap_or_else(Self::zero)
    }

    /// Returns the phase as a floating point number of half-turns.
    pub fn to_f64(&self) -> f64 {
        self.r.to_f64().unwrap_or(0.0)
    }

    /// Normalizes the phase to be in the range (-1,1] by adding or subtracting multiples of 2.
    pub fn normalize(&self) -> Phase {
        let denom = *self.r.denom();
        let mut num = *self.r.numer();
        if -denom < num && num <= denom {
            return *self;
        }
        num = num.rem_euclid(2 * denom);
        if num > denom {
            num -= 2 * denom;
        }
        Phase {
            r: Rational64::new(num, denom),
        }
    }

    /// Returns `true` if the phase is a multiple of 1/2.
    pub fn is_clifford(&self) -> bool {
        *self.r.denom() <= 2
    }

    /// Returns `true` if the phase is an odd multiple of 1/2, i.e. 1/2 or -1/2.
    pub fn is_proper_clifford(&self) -> bool {
        *self.r.denom() == 2
    }

    /// Returns `true` if the phase is 0 or 1.
    pub fn is_pauli(&self) -> bool {
        *self.r.denom() == 1
    }

    /// Returns `true` if the phase is a non-Clifford multiple of 1/4.
    pub fn is_t(&self) -> bool {
        *self.r.denom() == 4
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::zero()
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.r)
    }
}

impl From<Rational64> for Phase {
    fn from(r: Rational64) -> Phase {
        Phase::new(r)
    }
}

impl From<f64> for Phase {
    fn from(f: f64) -> Phase {
        Phase::from_f64(f)
    }
}

impl From<i64> for Phase {
    fn from(i: i64) -> Phase {
        Phase::new(Rational64::from_integer(i))
    }
}

impl From<i32> for Phase {
    fn from(i: i32) -> Phase {
        Phase::from(i as i64)
    }
}

impl From<(i32, i32)> for Phase {
    fn from(i: (i32, i32)) -> Phase {
        Phase::from((i.0 as i64, i.1 as i64))
    }
}

impl From<(i64, i64)> for Phase {
    fn from(i: (i64, i64)) -> Phase {
        Phase::new(Rational64::new(i.0, i.1))
    }
}

impl From<Phase> for Rational64 {
    fn from(phase: Phase) -> Rational64 {
        phase.to_rational()
    }
}

impl From<Phase> for f64 {
    fn from(phase: Phase) -> f64 {
        phase.to_f64()
    }
}

impl Zero for Phase {
    fn zero() -> Self {
        Phase {
            r: Rational64::zero(),
        }
    }

    fn is_zero(&self) -> bool {
        self.r.is_zero()
    }
}

impl One for Phase {
    fn one() -> Self {
        Phase {
            r: Rational64::one(),
        }
    }

    fn is_one(&self) -> bool {
        self.r.is_one()
    }
}

impl Neg for Phase {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.r)
    }
}

impl Add for Phase {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.r + other.r)
    }
}

impl AddAssign for Phase {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Mul for Phase {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Self::new(self.r * other.r)
    }
}

impl Sub for Phase {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.r - other.r)
    }
}

impl SubAssign for Phase {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}
