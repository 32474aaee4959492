//! Sums of two, three and four squares.
//!
//! Four-square decompositions follow Pollack and Trevino: find a prime `p = M*n*k - 1`, a square
//! root `s` of -1 modulo `p`, split `p = A^2 + B^2` in the Gaussian integers and take the greatest
//! common right divisor of `A + B*i + j` and `n` in the Hurwitz order. The result has norm `n`.
use crate::config::Config;
use crate::error::Result;
use crate::pool::{IntegerPool, PrimeProductCache};
use rug::Integer;

mod four;
mod three;

pub use four::UNCONDITIONAL_K_EXPONENT;
pub use three::SMALL_THREE_SQUARE_BOUND;

fn sorted_abs<const N: usize>(values: [Integer; N]) -> [Integer; N] {
  let mut values = values.map(Integer::abs);
  values.sort_unstable_by(|a, b| b.cmp(a));
  values
}

fn sum_of_squares(values: &[Integer]) -> Integer {
  values.iter().map(|x| Integer::from(x.square_ref())).sum()
}

/// `n = w^2 + x^2 + y^2 + z^2`, stored as absolute values in descending order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FourInt([Integer; 4]);

impl FourInt {
  pub fn new(values: [Integer; 4]) -> Self {
    FourInt(sorted_abs(values))
  }

  pub fn zero() -> Self {
    FourInt::new(Default::default())
  }

  pub fn values(&self) -> &[Integer; 4] {
    &self.0
  }

  pub fn into_values(self) -> [Integer; 4] {
    self.0
  }

  pub fn sum_of_squares(&self) -> Integer {
    sum_of_squares(&self.0)
  }
}

/// `n = x^2 + y^2 + z^2`, stored as absolute values in descending order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ThreeInt([Integer; 3]);

impl ThreeInt {
  pub fn new(values: [Integer; 3]) -> Self {
    ThreeInt(sorted_abs(values))
  }

  pub fn values(&self) -> &[Integer; 3] {
    &self.0
  }

  pub fn into_values(self) -> [Integer; 3] {
    self.0
  }

  pub fn sum_of_squares(&self) -> Integer {
    sum_of_squares(&self.0)
  }
}

/// Owns the scratch pool and the primorial cache shared by every decomposition it runs. Cheap to
/// create; keep one around to reuse its cache across calls.
#[derive(Debug, Default)]
pub struct SquareDecomposer {
  config: Config,
  primes: PrimeProductCache,
  pool: IntegerPool,
}

impl SquareDecomposer {
  pub fn new(config: Config) -> Self {
    SquareDecomposer {
      config,
      primes: PrimeProductCache::new(),
      pool: IntegerPool::new(),
    }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn primes(&self) -> &PrimeProductCache {
    &self.primes
  }
}

/// Four-square decomposition with a throwaway decomposer and the thread-local RNG.
pub fn lagrange_four_squares(n: &Integer) -> Result<FourInt> {
  SquareDecomposer::new(Config::default()).four_squares(n, &mut rand::thread_rng())
}
