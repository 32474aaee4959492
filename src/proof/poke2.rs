use super::{prime_challenge_bound, transcript};
use crate::config::DEFAULT_SECURITY_BITS;
use crate::error::{Error, Result};
use crate::group::PublicParameters;
use crate::util::decimal;
use rug::Integer;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Proof of knowledge of `x` with `u^x = w` for an arbitrary base `u`. See page 16 of B&B.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Poke2 {
  #[serde(with = "decimal")]
  z: Integer,
  #[serde(with = "decimal")]
  q: Integer,
  #[serde(with = "decimal")]
  r: Integer,
}

impl Poke2 {
  pub fn prove(
    params: &PublicParameters,
    base: &Integer,
    x: &Integer,
    result: &Integer,
  ) -> Result<Poke2> {
    let z = params.exp(params.g(), x)?;
    let (l, alpha) = challenges(params, base, result, &z)?;
    let (quotient, r) = x.clone().div_rem_floor(l);
    let shifted_base = params.op(base, &params.exp(params.g(), &alpha)?);
    let q = params.exp(&shifted_base, &quotient)?;
    let proof = Poke2 { z, q, r };
    if !Poke2::verify(params, base, result, &proof) {
      return Err(Error::VerificationFailed("PoKE2 statement does not hold"));
    }
    debug!("PoKE2 proof generated");
    Ok(proof)
  }

  /// Checks `Q^l * (u * G^alpha)^r == w * z^alpha`.
  pub fn verify(
    params: &PublicParameters,
    base: &Integer,
    result: &Integer,
    proof: &Poke2,
  ) -> bool {
    let Poke2 { z, q, r } = proof;
    let (l, alpha) = match challenges(params, base, result, z) {
      Ok(c) => c,
      Err(_) => return false,
    };
    if *r < 0 || *r >= l {
      return false;
    }
    let check = || -> Result<bool> {
      let shifted_base = params.op(base, &params.exp(params.g(), &alpha)?);
      let lhs = params.op(&params.exp(q, &l)?, &params.exp(&shifted_base, r)?);
      let rhs = params.op(result, &params.exp(z, &alpha)?);
      Ok(lhs == rhs)
    };
    check().unwrap_or(false)
  }

  pub fn z(&self) -> &Integer {
    &self.z
  }
}

fn challenges(
  params: &PublicParameters,
  base: &Integer,
  result: &Integer,
  z: &Integer,
) -> Result<(Integer, Integer)> {
  let mut t = transcript("poke2", [params.g(), params.n(), base, result, z]);
  let l = t.prime_challenge(&prime_challenge_bound(params.n(), DEFAULT_SECURITY_BITS))?;
  let alpha = t.integer_challenge();
  Ok((l, alpha))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::int;

  #[test]
  fn test_poke2() {
    // 2^20 = 1048576
    let params = PublicParameters::rsa2048();
    let base = int(2);
    let exp = int(20);
    let result = int(1_048_576);
    let proof = Poke2::prove(&params, &base, &exp, &result).unwrap();
    assert!(Poke2::verify(&params, &base, &result, &proof));

    // 2^35 = 34359738368
    let exp_2 = int(35);
    let result_2 = int(34_359_738_368u64);
    let proof_2 = Poke2::prove(&params, &base, &exp_2, &result_2).unwrap();
    assert!(Poke2::verify(&params, &base, &result_2, &proof_2));
    // Cannot verify wrong base/exp/result triple with wrong pair.
    assert!(!Poke2::verify(&params, &base, &result_2, &proof));
  }

  #[test]
  fn test_poke2_negative_and_large_exponents() {
    let params = PublicParameters::rsa2048();
    let base = int(3);
    for x in [int(-12345), (int(1) << 700u32) + 3u32] {
      let w = params.exp(&base, &x).unwrap();
      let proof = Poke2::prove(&params, &base, &x, &w).unwrap();
      assert!(Poke2::verify(&params, &base, &w, &proof));
    }
  }

  #[test]
  fn test_poke2_rejects_false_statement() {
    let params = PublicParameters::rsa2048();
    let base = int(5);
    let w = params.exp(&base, &int(1001)).unwrap();
    assert!(matches!(
      Poke2::prove(&params, &base, &int(1000), &w),
      Err(Error::VerificationFailed(_))
    ));
  }

  #[test]
  fn test_poke2_tampered() {
    let params = PublicParameters::rsa2048();
    let base = int(5);
    let x = int(987_654_321);
    let w = params.exp(&base, &x).unwrap();
    let proof = Poke2::prove(&params, &base, &x, &w).unwrap();

    let mut bad_z = proof.clone();
    bad_z.z = params.op(&proof.z, params.g());
    assert!(!Poke2::verify(&params, &base, &w, &bad_z));
    let mut bad_q = proof.clone();
    bad_q.q = params.op(&proof.q, params.g());
    assert!(!Poke2::verify(&params, &base, &w, &bad_q));
    let mut bad_r = proof;
    bad_r.r += 1;
    assert!(!Poke2::verify(&params, &base, &w, &bad_r));
  }
}
