//! Randomized searches that retry until a trial succeeds, either on the calling thread or raced
//! across several rayon workers where the first success wins.
use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{trace, warn};

/// Raised once by the winning worker. Losers check it before every trial.
#[derive(Debug, Default)]
pub struct Cancellation(AtomicBool);

impl Cancellation {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cancel(&self) {
    self.0.store(true, Ordering::Release);
  }

  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::Acquire)
  }
}

/// Trial counter shared by every worker of one search.
#[derive(Debug)]
pub struct TrialBudget {
  limit: Option<u64>,
  remaining: AtomicU64,
}

impl TrialBudget {
  pub fn new(limit: Option<u64>) -> Self {
    TrialBudget {
      limit,
      remaining: AtomicU64::new(limit.unwrap_or(u64::MAX)),
    }
  }

  pub fn try_consume(&self) -> bool {
    if self.limit.is_none() {
      return true;
    }
    self
      .remaining
      .fetch_update(Ordering::AcqRel, Ordering::Acquire, |r| r.checked_sub(1))
      .is_ok()
  }

  pub fn limit(&self) -> Option<u64> {
    self.limit
  }
}

/// Runs `trial` until it yields a value, the budget runs out, or `cancel` is raised. `Ok(None)`
/// means "stopped without a result"; errors from `trial` are fatal and end the search.
pub fn search<T, R, F>(
  rng: &mut R,
  budget: &TrialBudget,
  cancel: &Cancellation,
  mut trial: F,
) -> Result<Option<T>>
where
  R: RngCore + ?Sized,
  F: FnMut(&mut R) -> Result<Option<T>>,
{
  let mut attempts = 0u64;
  loop {
    if cancel.is_cancelled() || !budget.try_consume() {
      return Ok(None);
    }
    attempts += 1;
    if let Some(found) = trial(rng)? {
      trace!(attempts, "randomized trial succeeded");
      return Ok(Some(found));
    }
  }
}

fn exhausted(budget: &TrialBudget) -> Error {
  let limit = budget.limit().unwrap_or(0);
  warn!(limit, "trial budget exhausted");
  Error::TrialsExhausted(limit)
}

/// Single-threaded search.
pub fn sequential<T, R, F>(rng: &mut R, max_trials: Option<u64>, trial: F) -> Result<T>
where
  R: RngCore + ?Sized,
  F: FnMut(&mut R) -> Result<Option<T>>,
{
  let budget = TrialBudget::new(max_trials);
  search(rng, &budget, &Cancellation::new(), trial)?.ok_or_else(|| exhausted(&budget))
}

/// Races `workers` copies of `trial`, each with its own RNG seeded from `rng`. The first worker to
/// succeed cancels the rest; exactly one result is ever reported.
pub fn first_success<T, R, F>(
  rng: &mut R,
  workers: usize,
  max_trials: Option<u64>,
  trial: F,
) -> Result<T>
where
  T: Send,
  R: RngCore + ?Sized,
  F: Fn(&mut StdRng) -> Result<Option<T>> + Sync,
{
  let rngs = (0..workers.max(1))
    .map(|_| StdRng::from_rng(&mut *rng))
    .collect::<std::result::Result<Vec<_>, _>>()?;
  let budget = TrialBudget::new(max_trials);
  let cancel = Cancellation::new();

  let winner = rngs.into_par_iter().find_map_any(|mut worker_rng| {
    match search(&mut worker_rng, &budget, &cancel, |r| trial(r)) {
      Ok(Some(found)) => {
        cancel.cancel();
        Some(Ok(found))
      }
      Ok(None) => None,
      Err(e) => {
        cancel.cancel();
        Some(Err(e))
      }
    }
  });

  winner.unwrap_or_else(|| Err(exhausted(&budget)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::Rng;
  use std::sync::atomic::AtomicUsize;

  #[test]
  fn test_budget_counts_down() {
    let budget = TrialBudget::new(Some(2));
    assert!(budget.try_consume());
    assert!(budget.try_consume());
    assert!(!budget.try_consume());
    assert!(TrialBudget::new(None).try_consume());
  }

  #[test]
  fn test_sequential_finds_value() {
    let mut rng = StdRng::seed_from_u64(1);
    let found = sequential(&mut rng, None, |r| {
      let x: u32 = r.gen_range(0..100);
      Ok(if x == 42 { Some(x) } else { None })
    })
    .unwrap();
    assert_eq!(found, 42);
  }

  #[test]
  fn test_sequential_exhausts_budget() {
    let mut rng = StdRng::seed_from_u64(1);
    let result: Result<()> = sequential(&mut rng, Some(5), |_| Ok(None));
    match result {
      Err(Error::TrialsExhausted(5)) => {}
      other => panic!("unexpected {:?}", other),
    }
  }

  #[test]
  fn test_first_success_single_winner() {
    let mut rng = StdRng::seed_from_u64(2);
    let trials = AtomicUsize::new(0);
    let found = first_success(&mut rng, 4, None, |r| {
      trials.fetch_add(1, Ordering::Relaxed);
      let x: u32 = r.gen_range(0..50);
      Ok(if x == 7 { Some(x) } else { None })
    })
    .unwrap();
    assert_eq!(found, 7);
    assert!(trials.load(Ordering::Relaxed) >= 1);
  }

  #[test]
  fn test_first_success_propagates_errors() {
    let mut rng = StdRng::seed_from_u64(3);
    let result: Result<u32> = first_success(&mut rng, 3, None, |_| {
      Err(Error::RandomnessExhausted("dead source".into()))
    });
    assert!(matches!(result, Err(Error::RandomnessExhausted(_))));
  }

  #[test]
  fn test_first_success_budget_shared() {
    let mut rng = StdRng::seed_from_u64(4);
    let trials = AtomicUsize::new(0);
    let result: Result<u32> = first_success(&mut rng, 4, Some(10), |_| {
      trials.fetch_add(1, Ordering::Relaxed);
      Ok(None)
    });
    assert!(matches!(result, Err(Error::TrialsExhausted(10))));
    assert_eq!(trials.load(Ordering::Relaxed), 10);
  }
}
