use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub};
use num::{BigInt, BigRational, One, Zero};

pub trait Commutative: Mul<Output = Self> + Sized {}

pub type IntegerType = i64;

pub trait Ring:
    Add<Output = Self>
    + AddAssign<Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Mul<Output = Self>
    + PartialEq
    + Zero
    + One
    + Clone
    + Sized
{
    /// the image of an ordinary integer
    #[must_use]
    fn from_integer(value: IntegerType) -> Self;

    /// `x *= y`
    /// but not `MulAssign` because `other` is not owned
    fn mul_assign_borrow(&mut self, other: &Self);
}

pub trait Field: Ring + Div<Output = Self> + Commutative {
    /// if implement Field, every nonzero element has an inverse
    /// and it will just use the `Div` implementation
    fn inverse(&self) -> Option<Self> {
        if self.is_zero() {
            None
        } else {
            Some(Self::one() / self.clone())
        }
    }
}

impl Commutative for BigRational {}

impl Ring for BigRational {
    fn from_integer(value: IntegerType) -> Self {
        BigRational::from(BigInt::from(value))
    }

    fn mul_assign_borrow(&mut self, other: &Self) {
        *self *= other;
    }
}

impl Field for BigRational {}
