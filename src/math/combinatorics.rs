//! Factorials and the exact binomial probability mass function.

use num_bigint::BigInt;
use num_traits::One;

use super::Rational;

/// `n!` as an arbitrary-precision integer.
#[must_use]
pub fn factorial(n: u32) -> BigInt {
    (2..=n).fold(BigInt::one(), |acc, k| acc * k)
}

/// `n! / k!`, computed as `(k+1) * (k+2) * ... * n`.
///
/// # Panics
///
/// Panics if `n < k`.
#[must_use]
pub fn factorial_from(n: u32, k: u32) -> BigInt {
    assert!(n >= k, "factorial_from requires n >= k (n = {n}, k = {k})");
    (k + 1..=n).fold(BigInt::one(), |acc, j| acc * j)
}

/// Probability of exactly `k` successes in `n` independent trials that each
/// succeed with probability `p`.
///
/// Zero when `k > n`.
///
/// ```
/// use battle_odds::math::{binomial, Rational};
///
/// let half = Rational::new(1, 2);
/// assert_eq!(binomial(&half, 5, 2), Rational::new(10, 32));
/// ```
#[must_use]
pub fn binomial(p: &Rational, n: u32, k: u32) -> Rational {
    if k > n {
        return Rational::zero();
    }
    if k == 0 {
        return p.one_minus().pow(n);
    }
    if k == n {
        return p.pow(n);
    }

    let coefficient = factorial_from(n, k.max(n - k)) / factorial(k.min(n - k));
    (p.pow(k) * p.one_minus().pow(n - k)).mul_integer(&coefficient)
}
