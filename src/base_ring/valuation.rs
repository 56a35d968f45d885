use core::fmt;
use num::{BigInt, BigRational, Integer, Zero};

use super::field_generals::Field;

/// a rational prime, the point at which every group is localized
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Prime(u64);

impl Prime {
    /// `None` unless `candidate` is prime
    #[must_use]
    pub fn new(candidate: u64) -> Option<Self> {
        if candidate < 2 {
            return None;
        }
        let mut divisor = 2_u64;
        while divisor.saturating_mul(divisor) <= candidate {
            if candidate % divisor == 0 {
                return None;
            }
            divisor += 1;
        }
        Some(Self(candidate))
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }

    /// `p^exponent` as an arbitrary precision integer
    #[must_use]
    pub fn power(self, exponent: u32) -> BigInt {
        num::pow(BigInt::from(self.0), exponent as usize)
    }
}

impl fmt::Display for Prime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A field containing the integers localized at a prime.
/// Every nonzero element factors as `p^valuation * unit_part`
/// where the unit part is invertible in the local ring.
#[allow(clippy::module_name_repetitions)]
pub trait PAdicValuation: Field {
    /// `None` for zero
    fn valuation(&self, prime: Prime) -> Option<i64>;

    /// the factor left after removing every power of `prime`
    /// zero stays zero
    #[must_use]
    fn unit_part(&self, prime: Prime) -> Self;

    /// `p^exponent`, negative exponents allowed
    #[must_use]
    fn prime_power(prime: Prime, exponent: i64) -> Self;

    /// lies in the localized integers
    fn is_integral(&self, prime: Prime) -> bool {
        self.valuation(prime).map_or(true, |v| v >= 0)
    }

    /// is zero in `Z/p^exponent`
    fn vanishes_modulo(&self, prime: Prime, exponent: u32) -> bool {
        self.valuation(prime)
            .map_or(true, |v| v >= i64::from(exponent))
    }
}

/// strip every factor `prime` out of `value`
fn split_prime_factor(value: &BigInt, prime: &BigInt) -> (i64, BigInt) {
    let mut count = 0;
    let mut rest = value.clone();
    loop {
        let (quotient, remainder) = rest.div_rem(prime);
        if !remainder.is_zero() {
            break;
        }
        rest = quotient;
        count += 1;
    }
    (count, rest)
}

impl PAdicValuation for BigRational {
    fn valuation(&self, prime: Prime) -> Option<i64> {
        if self.is_zero() {
            return None;
        }
        let prime = BigInt::from(prime.get());
        let (numer_count, _) = split_prime_factor(self.numer(), &prime);
        let (denom_count, _) = split_prime_factor(self.denom(), &prime);
        Some(numer_count - denom_count)
    }

    fn unit_part(&self, prime: Prime) -> Self {
        if self.is_zero() {
            return self.clone();
        }
        let prime = BigInt::from(prime.get());
        let (_, numer_rest) = split_prime_factor(self.numer(), &prime);
        let (_, denom_rest) = split_prime_factor(self.denom(), &prime);
        BigRational::new(numer_rest, denom_rest)
    }

    fn prime_power(prime: Prime, exponent: i64) -> Self {
        let magnitude = BigRational::from(num::pow(
            BigInt::from(prime.get()),
            exponent.unsigned_abs() as usize,
        ));
        if exponent < 0 {
            magnitude.recip()
        } else {
            magnitude
        }
    }
}

/// order of a generator in a p-local group, `None` meaning infinite
pub(crate) fn vanishes_in<F: PAdicValuation>(value: &F, prime: Prime, order: Option<u32>) -> bool {
    match order {
        None => value.is_zero(),
        Some(exponent) => value.vanishes_modulo(prime, exponent),
    }
}

/// inverse of the unit part, `value` must be nonzero
pub(crate) fn unit_inverse<F: PAdicValuation>(value: &F, prime: Prime) -> F {
    let unit = value.unit_part(prime);
    if unit.is_one() {
        return unit;
    }
    F::one() / unit
}
