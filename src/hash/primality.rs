//! Probable-primality helpers on top of GMP's Miller-Rabin / Baillie-PSW test.
use rug::integer::IsPrime;
use rug::Integer;

/// Odd primes below 600, used for trial division and safe-prime sieving.
pub const SMALL_PRIMES: [u32; 108] = [
  3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97, 101,
  103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193, 197, 199,
  211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293, 307, 311, 313, 317,
  331, 337, 347, 349, 353, 359, 367, 373, 379, 383, 389, 397, 401, 409, 419, 421, 431, 433, 439, 443,
  449, 457, 461, 463, 467, 479, 487, 491, 499, 503, 509, 521, 523, 541, 547, 557, 563, 569, 571, 577,
  587, 593, 599,
];

/// `reps` rounds of Miller-Rabin (after GMP's own trial division and BPSW). Values below 2 are
/// never prime.
pub fn is_prob_prime(n: &Integer, reps: u32) -> bool {
  *n > 1 && n.is_probably_prime(reps) != IsPrime::No
}

/// True if some entry of `SMALL_PRIMES` properly divides `n`.
pub fn has_small_prime_factor(n: &Integer) -> bool {
  for &divisor in SMALL_PRIMES.iter() {
    if *n == divisor {
      break;
    }
    if n.is_divisible_u(divisor) {
      return true;
    }
  }
  false
}

/// Cheap filter for safe-prime candidates: rejects `q` when `q` or `2q + 1` has a small odd
/// factor. `2q + 1 = 0 mod s` exactly when `q = (s - 1) / 2 mod s`.
pub fn passes_safe_prime_sieve(q: &Integer) -> bool {
  for &s in SMALL_PRIMES.iter() {
    if *q <= s {
      break;
    }
    let r = q.mod_u(s);
    if r == 0 || r == (s - 1) / 2 {
      return false;
    }
  }
  true
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::DEFAULT_PRIMALITY_REPS;
  use crate::util::int;

  #[test]
  fn test_small_prime_factor() {
    let n_prime = int(233);
    let n_composite = int(50_621);
    let n_composite_large = int(370_817);

    assert!(n_composite == int(223) * int(227));
    assert!(n_composite_large == int(601) * int(617));

    assert!(!has_small_prime_factor(&n_prime));
    assert!(has_small_prime_factor(&n_composite));
    assert!(!has_small_prime_factor(&n_composite_large));
  }

  #[test]
  fn test_is_prob_prime() {
    for p in [2, 3, 5, 7, 241, 7919, 48131, 75913, 76463, 115_547, 106_957] {
      assert!(is_prob_prime(&int(p), DEFAULT_PRIMALITY_REPS));
    }
    for n in [-7, 0, 1, 4, 561, 50_621, 370_817] {
      assert!(!is_prob_prime(&int(n), DEFAULT_PRIMALITY_REPS));
    }
  }

  #[test]
  fn test_safe_prime_sieve() {
    // 1019 = 2 * 509 + 1 and both are prime.
    assert!(passes_safe_prime_sieve(&int(509)));
    // 2 * 613 + 1 = 1227 = 3 * 409.
    assert!(!passes_safe_prime_sieve(&int(613)));
    // 1005 = 3 * 5 * 67.
    assert!(!passes_safe_prime_sieve(&int(1005)));
  }
}
