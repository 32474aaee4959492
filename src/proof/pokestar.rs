use super::{prime_challenge_bound, transcript};
use crate::config::DEFAULT_SECURITY_BITS;
use crate::error::{Error, Result};
use crate::group::PublicParameters;
use crate::util::decimal;
use rug::Integer;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Proof of knowledge of an integer `x` with `G^x = C`, for the fixed generator `G`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PokeStar {
  #[serde(with = "decimal")]
  q: Integer,
  #[serde(with = "decimal")]
  r: Integer,
}

impl PokeStar {
  pub fn prove(params: &PublicParameters, x: &Integer, result: &Integer) -> Result<PokeStar> {
    let l = hash_prime(params, result)?;
    let (quotient, r) = x.clone().div_rem_floor(l);
    let proof = PokeStar {
      q: params.exp(params.g(), &quotient)?,
      r,
    };
    if !PokeStar::verify(params, result, &proof) {
      return Err(Error::VerificationFailed("PoKE* statement does not hold"));
    }
    debug!("PoKE* proof generated");
    Ok(proof)
  }

  /// Checks `0 <= r < l` and `Q^l * G^r == C`.
  pub fn verify(params: &PublicParameters, result: &Integer, proof: &PokeStar) -> bool {
    let l = match hash_prime(params, result) {
      Ok(l) => l,
      Err(_) => return false,
    };
    if proof.r < 0 || proof.r >= l {
      return false;
    }
    match (params.exp(&proof.q, &l), params.exp(params.g(), &proof.r)) {
      (Ok(ql), Ok(gr)) => params.op(&ql, &gr) == params.elem(result.clone()),
      _ => false,
    }
  }

  pub fn q(&self) -> &Integer {
    &self.q
  }

  pub fn r(&self) -> &Integer {
    &self.r
  }
}

fn hash_prime(params: &PublicParameters, result: &Integer) -> Result<Integer> {
  let mut t = transcript("pokestar", [params.g(), params.n(), result]);
  t.prime_challenge(&prime_challenge_bound(params.n(), DEFAULT_SECURITY_BITS))
}
