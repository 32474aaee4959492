//! Hashing utilities and the two element encodings (hash-to-prime and division-intractable hash).
use crate::config::DEFAULT_PRIMALITY_REPS;
use blake2_rfc::blake2b::blake2b;
use lazy_static::lazy_static;
use rug::integer::Order;
use rug::Integer;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub mod primality;

// 32 bytes = 256 bits.
const HASH_LENGTH_IN_BYTES: usize = 32;

/// Bit position of the leading one in `DI_DELTA`.
pub const DI_DELTA_BITS: u32 = 2048;

lazy_static! {
  /// Offset added to every division-intractable hash: `2^2048 + 1`.
  pub static ref DI_DELTA: Integer = (Integer::from(1) << DI_DELTA_BITS) + 1u32;
}

// Optional key can be used as a nonce for data in hash function.
pub fn blake2(data: &[u8], key: Option<&[u8]>) -> Integer {
  let key: &[u8] = key.unwrap_or(&[]);
  let res = blake2b(HASH_LENGTH_IN_BYTES, key, data);
  Integer::from_digits(res.as_bytes(), Order::Msf)
}

pub fn sha256(data: &[u8], key: Option<&[u8]>) -> Integer {
  let mut hasher = Sha256::new();
  if let Some(bytes) = key {
    hasher.update(bytes);
  }
  hasher.update(data);
  Integer::from_digits(hasher.finalize().as_slice(), Order::Msf)
}

/// Iterated SHA-256 until the digest, read big-endian, is a probable prime. The first pass hashes
/// `data`; every later pass hashes the previous digest.
pub fn hash_to_prime(data: &[u8]) -> Integer {
  hash_to_prime_with_reps(data, DEFAULT_PRIMALITY_REPS)
}

pub fn hash_to_prime_with_reps(data: &[u8], reps: u32) -> Integer {
  let mut digest = Sha256::digest(data);
  loop {
    let candidate = Integer::from_digits(digest.as_slice(), Order::Msf);
    if primality::is_prob_prime(&candidate, reps) {
      return candidate;
    }
    digest = Sha256::digest(digest.as_slice());
  }
}

/// `DI_DELTA + SHA256(data)`.
pub fn di_hash(data: &[u8]) -> Integer {
  sha256(data, None) + &*DI_DELTA
}

/// How application elements become accumulator representatives. Whichever encoding built an
/// accumulator must also be used for its proofs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
  HashToPrime,
  DivisionIntractable,
}

impl Default for Encoding {
  fn default() -> Self {
    Encoding::HashToPrime
  }
}

impl Encoding {
  pub fn encode(self, data: &[u8]) -> Integer {
    match self {
      Encoding::HashToPrime => hash_to_prime(data),
      Encoding::DivisionIntractable => di_hash(data),
    }
  }

  pub fn encode_all<T: AsRef<[u8]>>(self, elems: &[T]) -> Vec<Integer> {
    elems.iter().map(|e| self.encode(e.as_ref())).collect()
  }
}
