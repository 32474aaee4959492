use super::{prime_challenge_bound, transcript};
use crate::config::DEFAULT_SECURITY_BITS;
use crate::error::{Error, Result};
use crate::util::{check_modulus, decimal, exp, modulo, mul_mod};
use rug::Integer;
use serde::{Deserialize, Serialize};

/// Proof of exponentiation: `base^x = result` for a public `x`, checkable with two short
/// exponentiations instead of one by `x`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Poe {
  #[serde(with = "decimal")]
  q: Integer,
}

impl Poe {
  /// `Q = base^(x div l)` for the prime challenge `l`. `x` must be non-negative.
  pub fn prove(modulus: &Integer, base: &Integer, x: &Integer, result: &Integer) -> Result<Poe> {
    check_modulus(modulus)?;
    if *x < 0 {
      return Err(Error::precondition("PoE exponent must be non-negative"));
    }
    let l = hash_prime(modulus, base, x, result)?;
    let q = Integer::from(x / &l);
    let proof = Poe {
      q: exp(base, &q, modulus)?,
    };
    if !Poe::verify(modulus, base, x, result, &proof) {
      return Err(Error::VerificationFailed("PoE statement does not hold"));
    }
    Ok(proof)
  }

  /// Checks `Q^l * base^(x mod l) == result`.
  pub fn verify(
    modulus: &Integer,
    base: &Integer,
    x: &Integer,
    result: &Integer,
    proof: &Poe,
  ) -> bool {
    if *modulus <= 1 || *x < 0 {
      return false;
    }
    let l = match hash_prime(modulus, base, x, result) {
      Ok(l) => l,
      Err(_) => return false,
    };
    let r = Integer::from(x % &l);
    match (exp(&proof.q, &l, modulus), exp(base, &r, modulus)) {
      (Ok(ql), Ok(ur)) => mul_mod(&ql, &ur, modulus) == modulo(result.clone(), modulus),
      _ => false,
    }
  }

  pub fn q(&self) -> &Integer {
    &self.q
  }
}

fn hash_prime(
  modulus: &Integer,
  base: &Integer,
  x: &Integer,
  result: &Integer,
) -> Result<Integer> {
  let mut t = transcript("poe", [base, modulus, result, x]);
  t.prime_challenge(&prime_challenge_bound(modulus, DEFAULT_SECURITY_BITS))
}
