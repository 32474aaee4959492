use super::{prime_challenge_bound, transcript};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::group::PublicParameters;
use crate::util::{decimal, random_symmetric};
use rand::RngCore;
use rug::Integer;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Prover's first message. `z` commits to the witness, `a_g` and `a_u` to the masks.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZkPokeCommitment {
  #[serde(with = "decimal")]
  pub z: Integer,
  #[serde(with = "decimal")]
  pub a_g: Integer,
  #[serde(with = "decimal")]
  pub a_u: Integer,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZkPokeResponse {
  #[serde(with = "decimal")]
  pub q_g: Integer,
  #[serde(with = "decimal")]
  pub q_u: Integer,
  #[serde(with = "decimal")]
  pub r_x: Integer,
  #[serde(with = "decimal")]
  pub r_r: Integer,
}

/// Zero-knowledge proof of knowledge of `x` with `u^x = w`.
///
/// The witness is hidden in a Pedersen commitment `z = G^x H^rho_x`; both the commitment opening
/// and the exponent relation are proven with PoKE-style quotients, so the response size does not
/// depend on the size of `x`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZkPoke {
  pub commitment: ZkPokeCommitment,
  pub response: ZkPokeResponse,
}

impl ZkPoke {
  pub fn prove<R: RngCore + ?Sized>(
    params: &PublicParameters,
    config: &Config,
    base: &Integer,
    x: &Integer,
    result: &Integer,
    rng: &mut R,
  ) -> Result<ZkPoke> {
    config.validate()?;
    if Integer::from(base.gcd_ref(params.n())) != 1 {
      return Err(Error::precondition("ZKPoKE base must be a unit modulo N"));
    }
    let bound = params.blinding_bound(config.security_bits);
    let rho_x = random_symmetric(rng, &bound)?;
    let k = random_symmetric(rng, &bound)?;
    let rho_k = random_symmetric(rng, &bound)?;

    let commitment = ZkPokeCommitment {
      z: params.commit(x, &rho_x)?,
      a_g: params.commit(&k, &rho_k)?,
      a_u: params.exp(base, &k)?,
    };
    let (c, l) = challenges(params, config, base, result, &commitment)?;

    let (q_x, r_x) = (k + Integer::from(&c * x)).div_rem_floor(l.clone());
    let (q_r, r_r) = (rho_k + c * rho_x).div_rem_floor(l);
    let response = ZkPokeResponse {
      q_g: params.commit(&q_x, &q_r)?,
      q_u: params.exp(base, &q_x)?,
      r_x,
      r_r,
    };
    let proof = ZkPoke {
      commitment,
      response,
    };
    if !ZkPoke::verify(params, config, base, result, &proof) {
      return Err(Error::VerificationFailed("ZKPoKE statement does not hold"));
    }
    debug!("ZKPoKE proof generated");
    Ok(proof)
  }

  /// Checks `r_x, r_r` in `[0, l)`, `Q_g^l G^r_x H^r_r == A_g z^c` and `Q_u^l u^r_x == A_u w^c`.
  pub fn verify(
    params: &PublicParameters,
    config: &Config,
    base: &Integer,
    result: &Integer,
    proof: &ZkPoke,
  ) -> bool {
    let ZkPokeCommitment { z, a_g, a_u } = &proof.commitment;
    let ZkPokeResponse { q_g, q_u, r_x, r_r } = &proof.response;
    let (c, l) = match challenges(params, config, base, result, &proof.commitment) {
      Ok(c) => c,
      Err(_) => return false,
    };
    if *r_x < 0 || *r_x >= l || *r_r < 0 || *r_r >= l {
      return false;
    }
    let check = || -> Result<bool> {
      let lhs_g = params.op(&params.exp(q_g, &l)?, &params.commit(r_x, r_r)?);
      let rhs_g = params.op(a_g, &params.exp(z, &c)?);
      let lhs_u = params.op(&params.exp(q_u, &l)?, &params.exp(base, r_x)?);
      let rhs_u = params.op(a_u, &params.exp(result, &c)?);
      Ok(lhs_g == rhs_g && lhs_u == rhs_u)
    };
    check().unwrap_or(false)
  }
}

fn challenges(
  params: &PublicParameters,
  config: &Config,
  base: &Integer,
  result: &Integer,
  commitment: &ZkPokeCommitment,
) -> Result<(Integer, Integer)> {
  let mut t = transcript(
    "zkpoke",
    [
      params.n(),
      params.g(),
      params.h(),
      base,
      result,
      &commitment.z,
      &commitment.a_g,
      &commitment.a_u,
    ],
  );
  let c = t.integer_challenge();
  let l = t.prime_challenge(&prime_challenge_bound(params.n(), config.security_bits))?;
  Ok((c, l))
}
