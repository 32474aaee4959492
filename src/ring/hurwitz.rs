use crate::error::{Error, Result};
use rug::{Integer, Rational};
use std::ops;

/// Hurwitz quaternion `r + i*I + j*J + k*K`, stored doubled so that half-integer coordinates stay
/// integral. The four doubled coordinates are either all even (a Lipschitz quaternion) or all odd.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct HurwitzInt {
  dbl_r: Integer,
  dbl_i: Integer,
  dbl_j: Integer,
  dbl_k: Integer,
}

impl HurwitzInt {
  pub fn from_ints<T>(r: T, i: T, j: T, k: T) -> Self
  where
    Integer: From<T>,
  {
    HurwitzInt {
      dbl_r: Integer::from(r) << 1u32,
      dbl_i: Integer::from(i) << 1u32,
      dbl_j: Integer::from(j) << 1u32,
      dbl_k: Integer::from(k) << 1u32,
    }
  }

  /// Builds from doubled coordinates, which must share one parity.
  pub fn from_doubled(
    dbl_r: Integer,
    dbl_i: Integer,
    dbl_j: Integer,
    dbl_k: Integer,
  ) -> Result<Self> {
    let parity = dbl_r.is_odd();
    if dbl_i.is_odd() != parity || dbl_j.is_odd() != parity || dbl_k.is_odd() != parity {
      return Err(Error::precondition(
        "Hurwitz coordinates must be all integers or all halves",
      ));
    }
    Ok(HurwitzInt {
      dbl_r,
      dbl_i,
      dbl_j,
      dbl_k,
    })
  }

  pub fn zero() -> Self {
    Self::default()
  }

  pub fn one() -> Self {
    HurwitzInt::from_ints(1, 0, 0, 0)
  }

  pub fn doubled(&self) -> [&Integer; 4] {
    [&self.dbl_r, &self.dbl_i, &self.dbl_j, &self.dbl_k]
  }

  /// The true coordinates `[r, i, j, k]`.
  pub fn value(&self) -> [Rational; 4] {
    let half = |x: &Integer| Rational::from((x.clone(), Integer::from(2)));
    [
      half(&self.dbl_r),
      half(&self.dbl_i),
      half(&self.dbl_j),
      half(&self.dbl_k),
    ]
  }

  /// Integer coordinates, if there are no halves.
  pub fn to_ints(&self) -> Option<[Integer; 4]> {
    if !self.is_lipschitz() {
      return None;
    }
    Some([
      Integer::from(&self.dbl_r >> 1u32),
      Integer::from(&self.dbl_i >> 1u32),
      Integer::from(&self.dbl_j >> 1u32),
      Integer::from(&self.dbl_k >> 1u32),
    ])
  }

  pub fn is_lipschitz(&self) -> bool {
    self.dbl_r.is_even()
  }

  pub fn is_zero(&self) -> bool {
    self.dbl_r == 0 && self.dbl_i == 0 && self.dbl_j == 0 && self.dbl_k == 0
  }

  pub fn conj(&self) -> Self {
    HurwitzInt {
      dbl_r: self.dbl_r.clone(),
      dbl_i: Integer::from(-&self.dbl_i),
      dbl_j: Integer::from(-&self.dbl_j),
      dbl_k: Integer::from(-&self.dbl_k),
    }
  }

  pub fn norm(&self) -> Integer {
    let sum: Integer = self
      .doubled()
      .iter()
      .map(|x| Integer::from(x.square_ref()))
      .sum();
    sum >> 2u32
  }

  /// The 24 units: `+-1, +-i, +-j, +-k` and `(+-1 +-i +-j +-k) / 2`.
  pub fn units() -> Vec<HurwitzInt> {
    let mut units = Vec::with_capacity(24);
    for axis in 0..4 {
      for sign in [2i32, -2] {
        let mut c = [0i32; 4];
        c[axis] = sign;
        units.push(Self::small_doubled(c));
      }
    }
    units.extend(Self::half_units());
    units
  }

  fn half_units() -> impl Iterator<Item = HurwitzInt> {
    (0..16u32).map(|bits| {
      let mut c = [1i32; 4];
      for (n, coord) in c.iter_mut().enumerate() {
        if bits >> n & 1 == 1 {
          *coord = -1;
        }
      }
      Self::small_doubled(c)
    })
  }

  fn small_doubled(c: [i32; 4]) -> HurwitzInt {
    HurwitzInt {
      dbl_r: Integer::from(c[0]),
      dbl_i: Integer::from(c[1]),
      dbl_j: Integer::from(c[2]),
      dbl_k: Integer::from(c[3]),
    }
  }

  /// Right-multiplies by a unit so that every coordinate is an integer. The norm is unchanged.
  pub fn to_lipschitz(&self) -> HurwitzInt {
    if self.is_lipschitz() {
      return self.clone();
    }
    // x * (1 +- i +- j +- k) / 2 is Lipschitz for exactly some sign choices; one always exists.
    Self::half_units()
      .map(|u| self * &u)
      .find(HurwitzInt::is_lipschitz)
      .unwrap_or_else(|| self.clone())
  }

  /// Right division `self = q * other + rem` with `N(rem) < N(other)`.
  ///
  /// `q` is whichever of the nearest Lipschitz point and the nearest all-halves point to
  /// `self * conj(other) / N(other)` leaves the smaller remainder.
  pub fn div_rem_right(&self, other: &HurwitzInt) -> Result<(HurwitzInt, HurwitzInt)> {
    if other.is_zero() {
      return Err(Error::precondition("Hurwitz division by zero"));
    }
    Ok(self.div_rem_right_nonzero(other))
  }

  fn div_rem_right_nonzero(&self, other: &HurwitzInt) -> (HurwitzInt, HurwitzInt) {
    let norm = other.norm();
    let twice_norm = Integer::from(&norm << 1u32);
    // Doubled coordinates of self * conj(other); the true quotient has doubled coordinates x / N.
    let numerator = self * &other.conj();

    let nearest_even = |x: &Integer| x.clone().div_rem_round(twice_norm.clone()).0 << 1u32;
    let nearest_odd = |x: &Integer| {
      let shifted = Integer::from(x - &norm);
      (shifted.div_rem_round(twice_norm.clone()).0 << 1u32) + 1u32
    };

    let [r, i, j, k] = numerator.doubled();
    let lipschitz = HurwitzInt {
      dbl_r: nearest_even(r),
      dbl_i: nearest_even(i),
      dbl_j: nearest_even(j),
      dbl_k: nearest_even(k),
    };
    let halves = HurwitzInt {
      dbl_r: nearest_odd(r),
      dbl_i: nearest_odd(i),
      dbl_j: nearest_odd(j),
      dbl_k: nearest_odd(k),
    };

    let rem_lipschitz = self - &(&lipschitz * other);
    let rem_halves = self - &(&halves * other);
    if rem_halves.norm() < rem_lipschitz.norm() {
      (halves, rem_halves)
    } else {
      (lipschitz, rem_lipschitz)
    }
  }

  /// Greatest common right divisor: every common right divisor of `self` and `other` right-divides
  /// the result. `gcrd(0, 0) = 0`.
  pub fn gcrd(&self, other: &HurwitzInt) -> HurwitzInt {
    let mut a = self.clone();
    let mut b = other.clone();
    while !b.is_zero() {
      let (_, rem) = a.div_rem_right_nonzero(&b);
      a = b;
      b = rem;
    }
    a
  }
}

impl ops::Add for &HurwitzInt {
  type Output = HurwitzInt;
  fn add(self, rhs: &HurwitzInt) -> HurwitzInt {
    HurwitzInt {
      dbl_r: Integer::from(&self.dbl_r + &rhs.dbl_r),
      dbl_i: Integer::from(&self.dbl_i + &rhs.dbl_i),
      dbl_j: Integer::from(&self.dbl_j + &rhs.dbl_j),
      dbl_k: Integer::from(&self.dbl_k + &rhs.dbl_k),
    }
  }
}

impl ops::Sub for &HurwitzInt {
  type Output = HurwitzInt;
  fn sub(self, rhs: &HurwitzInt) -> HurwitzInt {
    HurwitzInt {
      dbl_r: Integer::from(&self.dbl_r - &rhs.dbl_r),
      dbl_i: Integer::from(&self.dbl_i - &rhs.dbl_i),
      dbl_j: Integer::from(&self.dbl_j - &rhs.dbl_j),
      dbl_k: Integer::from(&self.dbl_k - &rhs.dbl_k),
    }
  }
}

/// Hamilton product. The product of two doubled quaternions is four times the true product, so
/// halving it gives the doubled result; the Hurwitz order is closed under multiplication, which
/// keeps the halving exact.
impl ops::Mul for &HurwitzInt {
  type Output = HurwitzInt;
  fn mul(self, rhs: &HurwitzInt) -> HurwitzInt {
    let [a1, b1, c1, d1] = self.doubled();
    let [a2, b2, c2, d2] = rhs.doubled();
    let p = |x: &Integer, y: &Integer| Integer::from(x * y);
    let r = p(a1, a2) - p(b1, b2) - p(c1, c2) - p(d1, d2);
    let i = p(a1, b2) + p(b1, a2) + p(c1, d2) - p(d1, c2);
    let j = p(a1, c2) - p(b1, d2) + p(c1, a2) + p(d1, b2);
    let k = p(a1, d2) + p(b1, c2) - p(c1, b2) + p(d1, a2);
    HurwitzInt {
      dbl_r: r >> 1u32,
      dbl_i: i >> 1u32,
      dbl_j: j >> 1u32,
      dbl_k: k >> 1u32,
    }
  }
}

impl From<&super::GaussianInt> for HurwitzInt {
  fn from(g: &super::GaussianInt) -> Self {
    HurwitzInt::from_ints(g.r.clone(), g.i.clone(), Integer::new(), Integer::new())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn h(r: i64, i: i64, j: i64, k: i64) -> HurwitzInt {
    HurwitzInt::from_ints(r, i, j, k)
  }

  fn half(r: i64, i: i64, j: i64, k: i64) -> HurwitzInt {
    HurwitzInt::from_doubled(r.into(), i.into(), j.into(), k.into()).unwrap()
  }

  #[test]
  fn test_hamilton_product() {
    let (one, i, j, k) = (h(1, 0, 0, 0), h(0, 1, 0, 0), h(0, 0, 1, 0), h(0, 0, 0, 1));
    assert_eq!(&i * &j, k);
    assert_eq!(&j * &k, i);
    assert_eq!(&k * &i, j);
    assert_eq!(&j * &i, h(0, 0, 0, -1));
    assert_eq!(&(&i * &i), &h(-1, 0, 0, 0));
    assert_eq!(&one * &k, k);
    let x = h(1, 2, 3, 4);
    assert_eq!(&x * &x.conj(), h(30, 0, 0, 0));
  }

  #[test]
  fn test_half_integer_product() {
    // ((1 + i + j + k) / 2)^3 = -1.
    let w = half(1, 1, 1, 1);
    assert_eq!(w.norm(), 1);
    let w3 = &(&w * &w) * &w;
    assert_eq!(w3, h(-1, 0, 0, 0));
    assert!(!w.is_lipschitz());
    assert_eq!(
      w.value()[0],
      Rational::from((Integer::from(1), Integer::from(2)))
    );
  }

  #[test]
  fn test_from_doubled_rejects_mixed_parity() {
    assert!(HurwitzInt::from_doubled(1.into(), 2.into(), 1.into(), 1.into()).is_err());
    assert!(HurwitzInt::from_doubled(2.into(), 4.into(), 0.into(), (-6).into()).is_ok());
  }

  #[test]
  fn test_norm_multiplicative() {
    let a = h(1, -2, 3, 5);
    let b = half(3, -1, 5, 7);
    assert_eq!((&a * &b).norm(), Integer::from(a.norm() * b.norm()));
  }

  #[test]
  fn test_units() {
    let units = HurwitzInt::units();
    assert_eq!(units.len(), 24);
    for u in &units {
      assert_eq!(u.norm(), 1);
    }
  }

  #[test]
  fn test_div_rem_right() {
    let cases = [
      (h(17, -4, 9, 2), h(3, 1, -1, 2)),
      (half(21, 7, -3, 5), h(2, 0, 1, 0)),
      (h(100, 0, 0, 0), half(1, 3, 5, 7)),
    ];
    for (a, b) in cases.iter() {
      let (q, rem) = a.div_rem_right(b).unwrap();
      assert_eq!(&(&q * b) + &rem, *a);
      assert!(rem.norm() < b.norm());
    }
    assert!(h(1, 0, 0, 0).div_rem_right(&HurwitzInt::zero()).is_err());
  }

  #[test]
  fn test_gcrd_right_divides() {
    let d = h(1, 1, 1, 0);
    let a = &h(2, -1, 0, 3) * &d;
    let b = &h(0, 4, 1, 1) * &d;
    let g = a.gcrd(&b);
    assert!(a.div_rem_right(&g).unwrap().1.is_zero());
    assert!(b.div_rem_right(&g).unwrap().1.is_zero());
    assert!(g.div_rem_right(&d).unwrap().1.is_zero());
  }

  #[test]
  fn test_to_lipschitz() {
    let x = half(3, 1, -1, 5);
    let y = x.to_lipschitz();
    assert!(y.is_lipschitz());
    assert_eq!(y.norm(), x.norm());
    let sum: Integer = y
      .to_ints()
      .unwrap()
      .iter()
      .map(|c| Integer::from(c.square_ref()))
      .sum();
    assert_eq!(sum, x.norm());
  }
}
