use crate::error::{Error, Result};
use rug::Integer;
use std::ops;

/// `r + i*I` with arbitrary-precision integer parts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GaussianInt {
  pub r: Integer,
  pub i: Integer,
}

impl GaussianInt {
  pub fn new(r: Integer, i: Integer) -> Self {
    GaussianInt { r, i }
  }

  pub fn from_ints<T>(r: T, i: T) -> Self
  where
    Integer: From<T>,
  {
    GaussianInt::new(Integer::from(r), Integer::from(i))
  }

  pub fn zero() -> Self {
    Self::default()
  }

  pub fn one() -> Self {
    GaussianInt::from_ints(1, 0)
  }

  pub fn is_zero(&self) -> bool {
    self.r == 0 && self.i == 0
  }

  pub fn conj(&self) -> Self {
    GaussianInt::new(self.r.clone(), Integer::from(-&self.i))
  }

  pub fn norm(&self) -> Integer {
    Integer::from(self.r.square_ref()) + Integer::from(self.i.square_ref())
  }

  /// Euclidean division `self = q * other + rem` with `N(rem) <= N(other) / 2`. The quotient is
  /// `self * conj(other) / N(other)` rounded per component to the nearest integer.
  pub fn div_rem(&self, other: &GaussianInt) -> Result<(GaussianInt, GaussianInt)> {
    if other.is_zero() {
      return Err(Error::precondition("Gaussian division by zero"));
    }
    Ok(self.div_rem_nonzero(other))
  }

  fn div_rem_nonzero(&self, other: &GaussianInt) -> (GaussianInt, GaussianInt) {
    let norm = other.norm();
    let numerator = self * &other.conj();
    let q = GaussianInt::new(
      numerator.r.div_rem_round(norm.clone()).0,
      numerator.i.div_rem_round(norm).0,
    );
    let rem = self - &(&q * other);
    (q, rem)
  }

  /// A greatest common divisor, unique up to the units `1, -1, i, -i`. `gcd(0, 0) = 0`.
  pub fn gcd(&self, other: &GaussianInt) -> GaussianInt {
    let mut a = self.clone();
    let mut b = other.clone();
    while !b.is_zero() {
      let (_, rem) = a.div_rem_nonzero(&b);
      a = b;
      b = rem;
    }
    a
  }

  /// True if `self` divides `other`. Zero divides only zero.
  pub fn divides(&self, other: &GaussianInt) -> bool {
    if self.is_zero() {
      return other.is_zero();
    }
    other.div_rem_nonzero(self).1.is_zero()
  }
}

impl ops::Add for &GaussianInt {
  type Output = GaussianInt;
  fn add(self, rhs: &GaussianInt) -> GaussianInt {
    GaussianInt::new(
      Integer::from(&self.r + &rhs.r),
      Integer::from(&self.i + &rhs.i),
    )
  }
}

impl ops::Sub for &GaussianInt {
  type Output = GaussianInt;
  fn sub(self, rhs: &GaussianInt) -> GaussianInt {
    GaussianInt::new(
      Integer::from(&self.r - &rhs.r),
      Integer::from(&self.i - &rhs.i),
    )
  }
}

impl ops::Mul for &GaussianInt {
  type Output = GaussianInt;
  fn mul(self, rhs: &GaussianInt) -> GaussianInt {
    let r = Integer::from(&self.r * &rhs.r) - Integer::from(&self.i * &rhs.i);
    let i = Integer::from(&self.r * &rhs.i) + Integer::from(&self.i * &rhs.r);
    GaussianInt::new(r, i)
  }
}

impl ops::Neg for &GaussianInt {
  type Output = GaussianInt;
  fn neg(self) -> GaussianInt {
    GaussianInt::new(Integer::from(-&self.r), Integer::from(-&self.i))
  }
}
