//! Tunable parameters for setup, proofs and randomized searches.
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Statistical/computational security parameter (lambda), in bits.
pub const DEFAULT_SECURITY_BITS: u32 = 128;
/// Rounds handed to GMP's probable-prime test.
pub const DEFAULT_PRIMALITY_REPS: u32 = 30;
pub const DEFAULT_MODULUS_BITS: u32 = 2048;
/// Smallest modulus `setup` accepts. Anything below is only useful for toy tests anyway.
pub const MIN_MODULUS_BITS: u32 = 32;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  pub security_bits: u32,
  pub primality_reps: u32,
  pub modulus_bits: u32,
  /// Number of racing workers used by parallel randomized searches.
  pub workers: usize,
  /// Fork depth of the batch membership-proof tree. `None` derives it from the thread count.
  pub parallelism_depth: Option<u32>,
  /// Upper bound on randomized trials per search. `None` retries until success.
  pub max_trials: Option<u64>,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      security_bits: DEFAULT_SECURITY_BITS,
      primality_reps: DEFAULT_PRIMALITY_REPS,
      modulus_bits: DEFAULT_MODULUS_BITS,
      workers: rayon::current_num_threads().max(1),
      parallelism_depth: None,
      max_trials: None,
    }
  }
}

impl Config {
  pub fn from_json(json: &str) -> Result<Self> {
    let config: Config = serde_json::from_str(json)
      .map_err(|e| Error::precondition(format!("malformed config: {}", e)))?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<()> {
    if self.security_bits == 0 {
      return Err(Error::precondition("security_bits must be positive"));
    }
    if self.workers == 0 {
      return Err(Error::precondition("workers must be positive"));
    }
    if self.modulus_bits < MIN_MODULUS_BITS {
      return Err(Error::precondition(format!(
        "modulus_bits must be at least {}",
        MIN_MODULUS_BITS
      )));
    }
    Ok(())
  }

  pub fn depth(&self) -> u32 {
    self
      .parallelism_depth
      .unwrap_or_else(crate::accumulator::default_parallelism_depth)
  }

  /// Convenience for tests and drivers that want a small, fast group.
  pub fn with_modulus_bits(mut self, bits: u32) -> Self {
    self.modulus_bits = bits;
    self
  }

  pub fn with_max_trials(mut self, trials: u64) -> Self {
    self.max_trials = Some(trials);
    self
  }
}
