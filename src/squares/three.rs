use super::four::{split_prime, sqrt_minus_one};
use super::{SquareDecomposer, ThreeInt};
use crate::error::{Error, Result};
use crate::hash::primality::is_prob_prime;
use crate::race;
use crate::util::{int, random_below};
use rand::RngCore;
use rug::Integer;
use tracing::{debug, trace};

/// Below this, three-square decompositions are found by exhaustive search.
pub const SMALL_THREE_SQUARE_BOUND: u32 = 1 << 16;

fn brute_force_three_squares(n: u32) -> Option<ThreeInt> {
  let mut x = 0u32;
  while x * x <= n {
    let rest = n - x * x;
    let mut y = 0u32;
    while y <= x && y * y <= rest {
      let z2 = rest - y * y;
      let z = (z2 as f64).sqrt() as u32;
      for z in [z.saturating_sub(1), z, z + 1] {
        if z * z == z2 {
          return Some(ThreeInt::new([int(x), int(y), int(z)]));
        }
      }
      y += 1;
    }
    x += 1;
  }
  None
}

impl SquareDecomposer {
  /// `p = a^2 + b^2` for a prime `p = 1 mod 4` (or `p = 2`), returned as `(a, b)` with `a >= b`.
  pub fn two_squares_prime<R: RngCore + ?Sized>(
    &self,
    p: &Integer,
    rng: &mut R,
  ) -> Result<(Integer, Integer)> {
    if *p == 2 {
      return Ok((int(1), int(1)));
    }
    if p.mod_u(4) != 1 || !is_prob_prime(p, self.config.primality_reps) {
      return Err(Error::precondition("two squares needs a prime congruent to 1 mod 4"));
    }
    let ab = race::sequential(rng, self.config.max_trials, |r| {
      Ok(match sqrt_minus_one(p, r)? {
        Some(s) => split_prime(p, &s),
        None => None,
      })
    })?;
    let (a, b) = (ab.r.abs(), ab.i.abs());
    Ok(if a >= b { (a, b) } else { (b, a) })
  }

  /// Three squares summing to `n`, for `n = 1 mod 4`.
  pub fn three_squares<R: RngCore + ?Sized>(&self, n: &Integer, rng: &mut R) -> Result<ThreeInt> {
    if let Some(small) = self.three_squares_small(n)? {
      return Ok(small);
    }
    let root = n.clone().sqrt();
    let found = race::sequential(rng, self.config.max_trials, |r| {
      self.three_squares_trial(n, &root, r)
    })?;
    debug!(bits = n.significant_bits(), "three-square decomposition found");
    Ok(found)
  }

  /// `three_squares` with the search raced across `config.workers` workers.
  pub fn three_squares_racing<R: RngCore + ?Sized>(
    &self,
    n: &Integer,
    rng: &mut R,
  ) -> Result<ThreeInt> {
    if let Some(small) = self.three_squares_small(n)? {
      return Ok(small);
    }
    let root = n.clone().sqrt();
    let found = race::first_success(rng, self.config.workers, self.config.max_trials, |r| {
      self.three_squares_trial(n, &root, r)
    })?;
    debug!(bits = n.significant_bits(), "three-square decomposition found");
    Ok(found)
  }

  fn three_squares_small(&self, n: &Integer) -> Result<Option<ThreeInt>> {
    if *n < 0 || n.mod_u(4) != 1 {
      return Err(Error::precondition("three squares needs n congruent to 1 mod 4"));
    }
    match n.to_u32() {
      Some(small) if small < SMALL_THREE_SQUARE_BOUND => brute_force_three_squares(small)
        .map(Some)
        .ok_or(Error::VerificationFailed("exhaustive three-square search")),
      // n - x^2 = (y - x)(y + x) is almost never prime when n = y^2.
      _ if n.is_perfect_square() => Ok(Some(ThreeInt::new([n.clone().sqrt(), int(0), int(0)]))),
      _ => Ok(None),
    }
  }

  /// Picks an even `x` below `sqrt(n)`; if `p = n - x^2` (which is 1 mod 4) is prime, splits it.
  fn three_squares_trial<R: RngCore + ?Sized>(
    &self,
    n: &Integer,
    root: &Integer,
    rng: &mut R,
  ) -> Result<Option<ThreeInt>> {
    let halves = Integer::from(root >> 1u32) + 1u32;
    let x = random_below(rng, &halves)? << 1u32;
    let p = Integer::from(n - Integer::from(x.square_ref()));
    if p <= 2 || !is_prob_prime(&p, self.config.primality_reps) {
      trace!("three-square prime candidate rejected");
      return Ok(None);
    }
    let ab = match sqrt_minus_one(&p, rng)? {
      Some(s) => split_prime(&p, &s),
      None => None,
    };
    Ok(ab.map(|ab| ThreeInt::new([x, ab.r, ab.i])))
  }
}
