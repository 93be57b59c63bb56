//! Arbitrary-precision fractions.
//!
//! `Rational` is always kept in lowest terms with a positive denominator, so
//! equality and hashing are structural. Multiplication and division cancel
//! common factors across the operands before multiplying, which keeps the
//! intermediate integers small along the long product chains the analyzer
//! builds.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::Serialize;

/// Exact fraction `numer / denom` in lowest terms.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Rational {
    numer: BigInt,
    denom: BigInt,
}

impl Rational {
    /// Create a rational from machine integers, reducing it.
    ///
    /// # Panics
    ///
    /// Panics if `denom` is not strictly positive.
    #[must_use]
    pub fn new(numer: i64, denom: i64) -> Self {
        Self::from_bigints(BigInt::from(numer), BigInt::from(denom))
    }

    /// Create a rational from big integers, reducing it.
    ///
    /// # Panics
    ///
    /// Panics if `denom` is not strictly positive.
    #[must_use]
    pub fn from_bigints(numer: BigInt, denom: BigInt) -> Self {
        assert!(denom.is_positive(), "Rational denominator must be positive, got {denom}");

        if numer.is_zero() {
            return Self::zero();
        }

        let gcd = numer.gcd(&denom);
        Self {
            numer: numer / &gcd,
            denom: denom / &gcd,
        }
    }

    /// Create a rational equal to the integer `n`.
    #[must_use]
    pub fn from_integer(n: impl Into<BigInt>) -> Self {
        Self {
            numer: n.into(),
            denom: BigInt::one(),
        }
    }

    /// Build from parts already known to be in lowest terms.
    fn reduced(numer: BigInt, denom: BigInt) -> Self {
        debug_assert!(denom.is_positive());
        if numer.is_zero() {
            return Self::zero();
        }
        Self { numer, denom }
    }

    /// The canonical zero, `0 / 1`.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            numer: BigInt::zero(),
            denom: BigInt::one(),
        }
    }

    /// The canonical one, `1 / 1`.
    #[must_use]
    pub fn one() -> Self {
        Self {
            numer: BigInt::one(),
            denom: BigInt::one(),
        }
    }

    /// The numerator (sign carrier).
    #[must_use]
    pub fn numer(&self) -> &BigInt {
        &self.numer
    }

    /// The denominator (always positive).
    #[must_use]
    pub fn denom(&self) -> &BigInt {
        &self.denom
    }

    /// Whether this is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.numer.is_zero()
    }

    /// Whether this is exactly one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.numer.is_one() && self.denom.is_one()
    }

    /// Raise to a non-negative integer power.
    #[must_use]
    pub fn pow(&self, exponent: u32) -> Self {
        if exponent == 0 {
            return Self::one();
        }
        // Powers of coprime integers stay coprime.
        Self::reduced(self.numer.pow(exponent), self.denom.pow(exponent))
    }

    /// `1 - self`.
    #[must_use]
    pub fn one_minus(&self) -> Self {
        // gcd(q - p, q) == gcd(p, q) == 1
        Self::reduced(&self.denom - &self.numer, self.denom.clone())
    }

    /// Multiply by a big integer, cancelling against the denominator first.
    #[must_use]
    pub fn mul_integer(&self, factor: &BigInt) -> Self {
        if self.is_zero() || factor.is_zero() {
            return Self::zero();
        }
        let gcd = self.denom.gcd(factor);
        let (numer, denom) = (&self.numer * (factor / &gcd), &self.denom / &gcd);
        if denom.is_negative() {
            Self::reduced(-numer, -denom)
        } else {
            Self::reduced(numer, denom)
        }
    }

    /// Lossy conversion for display and reporting.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        match (self.numer.to_f64(), self.denom.to_f64()) {
            (Some(n), Some(d)) if d.is_finite() && n.is_finite() => n / d,
            _ => {
                // Both parts too large for f64: shift them down together.
                let shift = self.denom.bits().saturating_sub(960);
                let n = (&self.numer >> shift).to_f64().unwrap_or(f64::NAN);
                let d = (&self.denom >> shift).to_f64().unwrap_or(f64::NAN);
                n / d
            }
        }
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom.is_one() {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        // Denominators are positive, so cross-multiplying preserves order.
        (&self.numer * &other.denom).cmp(&(&other.numer * &self.denom))
    }
}

impl<'a, 'b> Add<&'b Rational> for &'a Rational {
    type Output = Rational;

    fn add(self, rhs: &'b Rational) -> Rational {
        if self.is_zero() {
            return rhs.clone();
        }
        if rhs.is_zero() {
            return self.clone();
        }
        if self.denom == rhs.denom {
            return Rational::from_bigints(&self.numer + &rhs.numer, self.denom.clone());
        }
        Rational::from_bigints(
            &self.numer * &rhs.denom + &rhs.numer * &self.denom,
            &self.denom * &rhs.denom,
        )
    }
}

impl<'a, 'b> Sub<&'b Rational> for &'a Rational {
    type Output = Rational;

    fn sub(self, rhs: &'b Rational) -> Rational {
        if rhs.is_zero() {
            return self.clone();
        }
        Rational::from_bigints(
            &self.numer * &rhs.denom - &rhs.numer * &self.denom,
            &self.denom * &rhs.denom,
        )
    }
}

impl<'a, 'b> Mul<&'b Rational> for &'a Rational {
    type Output = Rational;

    fn mul(self, rhs: &'b Rational) -> Rational {
        if self.is_zero() || rhs.is_zero() {
            return Rational::zero();
        }
        let gcd1 = self.numer.gcd(&rhs.denom);
        let gcd2 = self.denom.gcd(&rhs.numer);
        Rational::reduced(
            (&self.numer / &gcd1) * (&rhs.numer / &gcd2),
            (&self.denom / &gcd2) * (&rhs.denom / &gcd1),
        )
    }
}

impl<'a, 'b> Div<&'b Rational> for &'a Rational {
    type Output = Rational;

    /// # Panics
    ///
    /// Panics on division by zero.
    fn div(self, rhs: &'b Rational) -> Rational {
        assert!(!rhs.is_zero(), "Rational division by zero");
        if self.is_zero() {
            return Rational::zero();
        }
        let gcd1 = self.numer.gcd(&rhs.numer);
        let gcd2 = self.denom.gcd(&rhs.denom);
        let numer = (&self.numer / &gcd1) * (&rhs.denom / &gcd2);
        let denom = (&self.denom / &gcd2) * (&rhs.numer / &gcd1);
        if denom.is_negative() {
            Rational::reduced(-numer, -denom)
        } else {
            Rational::reduced(numer, denom)
        }
    }
}

macro_rules! forward_owned_binop {
    ($imp:ident, $method:ident) => {
        impl $imp<Rational> for Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Rational {
                (&self).$method(&rhs)
            }
        }

        impl<'a> $imp<&'a Rational> for Rational {
            type Output = Rational;

            fn $method(self, rhs: &'a Rational) -> Rational {
                (&self).$method(rhs)
            }
        }

        impl<'a> $imp<Rational> for &'a Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Rational {
                self.$method(&rhs)
            }
        }
    };
}

forward_owned_binop!(Add, add);
forward_owned_binop!(Sub, sub);
forward_owned_binop!(Mul, mul);
forward_owned_binop!(Div, div);

impl<'a> AddAssign<&'a Rational> for Rational {
    fn add_assign(&mut self, rhs: &'a Rational) {
        *self = &*self + rhs;
    }
}

impl AddAssign<Rational> for Rational {
    fn add_assign(&mut self, rhs: Rational) {
        *self = &*self + &rhs;
    }
}

impl Sum for Rational {
    fn sum<I: Iterator<Item = Rational>>(iter: I) -> Self {
        iter.fold(Rational::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Rational> for Rational {
    fn sum<I: Iterator<Item = &'a Rational>>(iter: I) -> Self {
        iter.fold(Rational::zero(), |acc, x| acc + x)
    }
}
