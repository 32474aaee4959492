use super::{FourInt, SquareDecomposer};
use crate::error::{Error, Result};
use crate::hash::primality::{has_small_prime_factor, is_prob_prime};
use crate::race;
use crate::ring::{GaussianInt, HurwitzInt};
use crate::util::{exp, int, random_below, random_odd};
use rand::RngCore;
use rug::{Assign, Integer};
use tracing::{debug, trace};

/// In the unconditional variant `M = 2` and `k` has this many times as many bits as `n`.
pub const UNCONDITIONAL_K_EXPONENT: u32 = 5;

/// Lipschitz quaternions of norm 0..=8.
const SMALL_FOUR_SQUARES: [[i32; 4]; 9] = [
  [0, 0, 0, 0],
  [1, 0, 0, 0],
  [1, 1, 0, 0],
  [1, 1, 1, 0],
  [2, 0, 0, 0],
  [2, 1, 0, 0],
  [2, 1, 1, 0],
  [2, 1, 1, 1],
  [2, 2, 0, 0],
];

/// Attempts at finding a quadratic non-residue before a prime candidate is written off.
const NON_RESIDUE_ATTEMPTS: u32 = 128;

/// How the prime `p = M * n * k - 1` is drawn.
#[derive(Clone, Copy, Debug)]
enum PrimeShape {
  /// `M` is the primorial of `max(bits(n), 3)`, `k` has `bits(n)` bits.
  Primorial,
  /// `M = 2`, `k` has `UNCONDITIONAL_K_EXPONENT * bits(n)` bits.
  Unconditional,
}

/// `n = 2^e * odd` with `odd` odd.
fn split_twos(n: &Integer) -> (u32, Integer) {
  let e = n.find_one(0).unwrap_or(0);
  (e, Integer::from(n >> e))
}

/// `gamma * (1 + i)^e`, using `(1 + i)^2 = 2i`.
fn times_one_plus_i_pow(gamma: &HurwitzInt, e: u32) -> HurwitzInt {
  let half = e / 2;
  let scale = HurwitzInt::from_ints(Integer::from(1) << half, int(0), int(0), int(0));
  let mut result = gamma * &scale;
  let i = HurwitzInt::from_ints(0, 1, 0, 0);
  for _ in 0..half % 4 {
    result = &result * &i;
  }
  if e % 2 == 1 {
    result = &result * &HurwitzInt::from_ints(1, 1, 0, 0);
  }
  result
}

/// A square root of -1 modulo the prime `p`, from `u^((p - 1) / 4)` for a non-residue `u`.
pub(super) fn sqrt_minus_one<R: RngCore + ?Sized>(
  p: &Integer,
  rng: &mut R,
) -> Result<Option<Integer>> {
  let quarter = Integer::from(p - 1u32) >> 2u32;
  for _ in 0..NON_RESIDUE_ATTEMPTS {
    let u = random_below(rng, p)?;
    if u < 2 || u.jacobi(p) != -1 {
      continue;
    }
    let s = exp(&u, &quarter, p)?;
    let check = Integer::from(s.square_ref()) + 1u32;
    return Ok(if check.is_divisible(p) { Some(s) } else { None });
  }
  Ok(None)
}

/// `p = a^2 + b^2` as `a + b*i = gcd(s + i, p)`, or `None` if `p` does not split that way.
pub(super) fn split_prime(p: &Integer, s: &Integer) -> Option<GaussianInt> {
  let factor = GaussianInt::new(s.clone(), int(1)).gcd(&GaussianInt::new(p.clone(), int(0)));
  if factor.norm() == *p {
    Some(factor)
  } else {
    None
  }
}

impl SquareDecomposer {
  /// Four squares summing to `n`, searched on the calling thread.
  pub fn four_squares<R: RngCore + ?Sized>(&self, n: &Integer, rng: &mut R) -> Result<FourInt> {
    self.decompose(n, rng, PrimeShape::Primorial, false)
  }

  /// Like `four_squares`, with the prime search raced across `config.workers` workers.
  pub fn four_squares_large<R: RngCore + ?Sized>(
    &self,
    n: &Integer,
    rng: &mut R,
  ) -> Result<FourInt> {
    self.decompose(n, rng, PrimeShape::Primorial, true)
  }

  /// Uses `M = 2` and a much larger `k`, trading speed for a bound on the expected number of
  /// trials that holds without assuming GRH.
  pub fn four_squares_unconditional<R: RngCore + ?Sized>(
    &self,
    n: &Integer,
    rng: &mut R,
  ) -> Result<FourInt> {
    self.decompose(n, rng, PrimeShape::Unconditional, true)
  }

  fn decompose<R: RngCore + ?Sized>(
    &self,
    n: &Integer,
    rng: &mut R,
    shape: PrimeShape,
    raced: bool,
  ) -> Result<FourInt> {
    if *n < 0 {
      return Err(Error::precondition("cannot write a negative number as a sum of squares"));
    }
    if *n == 0 {
      return Ok(FourInt::zero());
    }
    let (e, odd) = split_twos(n);
    if odd <= 8 {
      let row = SMALL_FOUR_SQUARES[odd.to_usize().unwrap_or(0)];
      let gamma = HurwitzInt::from_ints(row[0], row[1], row[2], row[3]);
      return self
        .finish(&gamma, e, n)
        .ok_or(Error::VerificationFailed("small four-square table"));
    }

    let bits = odd.significant_bits();
    let (multiplier, k_bits) = match shape {
      PrimeShape::Primorial => ((*self.primes.primorial(bits.max(3))).clone(), bits),
      PrimeShape::Unconditional => (int(2), UNCONDITIONAL_K_EXPONENT * bits),
    };
    let mut base = self.pool.take();
    base.assign(&multiplier * &odd);

    let trial = |r: &mut dyn RngCore| -> Result<Option<FourInt>> {
      let gamma = match self.quaternion_of_norm(&odd, &base, k_bits, r)? {
        Some(gamma) => gamma,
        None => return Ok(None),
      };
      Ok(self.finish(&gamma, e, n))
    };
    let found = if raced {
      race::first_success(rng, self.config.workers, self.config.max_trials, |r| {
        trial(r as &mut dyn RngCore)
      })?
    } else {
      race::sequential(rng, self.config.max_trials, |mut r: &mut R| {
        trial(&mut r as &mut dyn RngCore)
      })?
    };
    debug!(bits = n.significant_bits(), ?shape, "four-square decomposition found");
    Ok(found)
  }

  /// One trial: a Hurwitz quaternion of norm `odd`, or `None` when the candidate prime fails.
  fn quaternion_of_norm(
    &self,
    odd: &Integer,
    base: &Integer,
    k_bits: u32,
    rng: &mut dyn RngCore,
  ) -> Result<Option<HurwitzInt>> {
    let k = random_odd(rng, k_bits)?;
    let mut p = self.pool.take();
    p.assign(base * &k);
    *p -= 1u32;
    if has_small_prime_factor(&p) || !is_prob_prime(&p, self.config.primality_reps) {
      trace!("four-square prime candidate rejected");
      return Ok(None);
    }
    let s = match sqrt_minus_one(&p, rng)? {
      Some(s) => s,
      None => return Ok(None),
    };
    let ab = match split_prime(&p, &s) {
      Some(ab) => ab,
      None => return Ok(None),
    };
    let alpha = &HurwitzInt::from(&ab) + &HurwitzInt::from_ints(0, 0, 1, 0);
    let gamma = alpha.gcrd(&HurwitzInt::from_ints(odd.clone(), int(0), int(0), int(0)));
    Ok(if gamma.norm() == *odd { Some(gamma) } else { None })
  }

  /// Lifts a quaternion of norm `n / 2^e` to norm `n` and checks the resulting squares.
  fn finish(&self, gamma: &HurwitzInt, e: u32, n: &Integer) -> Option<FourInt> {
    let values = times_one_plus_i_pow(gamma, e).to_lipschitz().to_ints()?;
    let four = FourInt::new(values);
    if four.sum_of_squares() == *n {
      Some(four)
    } else {
      trace!("four-square candidate failed its check");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Config;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn decomposer() -> SquareDecomposer {
    SquareDecomposer::new(Config::default())
  }

  #[test]
  fn test_small_values() {
    let d = decomposer();
    let mut rng = StdRng::seed_from_u64(40);
    for n in 0..=64u32 {
      let n = int(n);
      let f = d.four_squares(&n, &mut rng).unwrap();
      assert_eq!(f.sum_of_squares(), n);
    }
  }

  #[test]
  fn test_table_entries() {
    let d = decomposer();
    let mut rng = StdRng::seed_from_u64(41);
    assert_eq!(d.four_squares(&int(0), &mut rng).unwrap(), FourInt::zero());
    assert_eq!(
      d.four_squares(&int(7), &mut rng).unwrap().into_values(),
      [int(2), int(1), int(1), int(1)]
    );
    assert_eq!(
      d.four_squares(&int(8), &mut rng).unwrap().into_values(),
      [int(2), int(2), int(0), int(0)]
    );
  }

  #[test]
  fn test_negative_rejected() {
    let d = decomposer();
    let mut rng = StdRng::seed_from_u64(42);
    assert!(matches!(
      d.four_squares(&int(-1), &mut rng),
      Err(Error::PreconditionViolation(_))
    ));
  }

  #[test]
  fn test_large_prime_one_mod_four() {
    // 2^255 - 19 is prime and 1 mod 4.
    let d = decomposer();
    let mut rng = StdRng::seed_from_u64(43);
    let p = Integer::from(Integer::u_pow_u(2, 255)) - 19u32;
    assert!(is_prob_prime(&p, 30));
    let n = Integer::from(&p * 4u32) + 1u32;
    for target in [p, n] {
      let f = d.four_squares(&target, &mut rng).unwrap();
      assert_eq!(f.sum_of_squares(), target);
    }
    assert!(!d.primes().is_empty());
  }

  #[test]
  fn test_powers_of_two() {
    let d = decomposer();
    let mut rng = StdRng::seed_from_u64(44);
    for e in [1u32, 2, 3, 10, 101, 512] {
      let n = int(1) << e;
      assert_eq!(d.four_squares(&n, &mut rng).unwrap().sum_of_squares(), n);
      let m = Integer::from(&n * 1_000_003u32);
      assert_eq!(d.four_squares(&m, &mut rng).unwrap().sum_of_squares(), m);
    }
  }

  #[test]
  fn test_large_and_unconditional_variants() {
    let d = decomposer();
    let mut rng = StdRng::seed_from_u64(45);
    let n = (int(1) << 300u32) + 987_654_321u32;
    assert_eq!(d.four_squares_large(&n, &mut rng).unwrap().sum_of_squares(), n);
    let m = (int(1) << 120u32) + 77u32;
    assert_eq!(d.four_squares_unconditional(&m, &mut rng).unwrap().sum_of_squares(), m);
  }

  #[test]
  fn test_trial_budget_exhausted() {
    let d = SquareDecomposer::new(Config::default().with_max_trials(0));
    let mut rng = StdRng::seed_from_u64(46);
    let n = (int(1) << 200u32) + 1u32;
    assert!(matches!(
      d.four_squares(&n, &mut rng),
      Err(Error::TrialsExhausted(0))
    ));
    // The table path never consumes trials.
    assert!(d.four_squares(&int(6), &mut rng).is_ok());
  }

  #[test]
  fn test_split_prime() {
    let mut rng = StdRng::seed_from_u64(47);
    let p = int(1_000_000_009);
    let s = sqrt_minus_one(&p, &mut rng).unwrap().unwrap();
    assert_eq!((Integer::from(s.square_ref()) + 1u32) % &p, 0);
    let ab = split_prime(&p, &s).unwrap();
    assert_eq!(ab.norm(), p);
  }
}
