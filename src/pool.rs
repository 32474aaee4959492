//! Scratch-integer pool and small precomputed-product cache.
//!
//! Neither is global: a `SquareDecomposer` (or any other long-lived context) owns one of each, so
//! tests and independent callers never observe each other's state.
use rug::{Assign, Integer};
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
  m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A free list of big integers. Values are zeroed when checked out and again when returned, so no
/// residue of a previous computation can leak into the next one.
#[derive(Debug, Default)]
pub struct IntegerPool {
  free: Mutex<Vec<Integer>>,
}

pub struct Pooled<'a> {
  pool: &'a IntegerPool,
  value: Integer,
}

impl IntegerPool {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn take(&self) -> Pooled<'_> {
    let mut value = lock(&self.free).pop().unwrap_or_default();
    value.assign(0);
    Pooled { pool: self, value }
  }

  pub fn idle(&self) -> usize {
    lock(&self.free).len()
  }
}

impl Deref for Pooled<'_> {
  type Target = Integer;
  fn deref(&self) -> &Integer {
    &self.value
  }
}

impl DerefMut for Pooled<'_> {
  fn deref_mut(&mut self) -> &mut Integer {
    &mut self.value
  }
}

impl Drop for Pooled<'_> {
  fn drop(&mut self) {
    let mut value = std::mem::take(&mut self.value);
    value.assign(0);
    lock(&self.pool.free).push(value);
  }
}

/// Primorials (`product of all primes <= bound`), computed at most once per bound.
#[derive(Debug, Default)]
pub struct PrimeProductCache {
  products: Mutex<HashMap<u32, Arc<Integer>>>,
}

impl PrimeProductCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn primorial(&self, bound: u32) -> Arc<Integer> {
    let mut products = lock(&self.products);
    products
      .entry(bound)
      .or_insert_with(|| Arc::new(Integer::from(Integer::primorial(bound))))
      .clone()
  }

  pub fn len(&self) -> usize {
    lock(&self.products).len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
