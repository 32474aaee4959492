use super::transcript;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::group::PublicParameters;
use crate::squares::SquareDecomposer;
use crate::util::{decimal, decimal_seq, random_symmetric};
use rand::RngCore;
use rug::Integer;
use serde::{Deserialize, Serialize};
use tracing::debug;

const SQUARES: usize = 4;

/// Proof that a Pedersen commitment `C_v = G^v H^r_v` opens to some `v >= 0`.
///
/// The prover writes `v = w_1^2 + w_2^2 + w_3^2 + w_4^2`, commits to each `w_i` as
/// `C_i = G^w_i H^r_i`, and shows in zero knowledge that `C_v = prod C_i^w_i * H^r*`, which pins
/// the committed value to the sum of the squares.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeProof {
  #[serde(with = "decimal_seq")]
  commitments: Vec<Integer>,
  #[serde(with = "decimal_seq")]
  masks: Vec<Integer>,
  #[serde(with = "decimal")]
  product_mask: Integer,
  #[serde(with = "decimal_seq")]
  z: Vec<Integer>,
  #[serde(with = "decimal_seq")]
  t: Vec<Integer>,
  #[serde(with = "decimal")]
  t_star: Integer,
}

impl RangeProof {
  /// Proves `v >= 0` for `commitment = params.commit(v, r_v)`.
  pub fn prove<R: RngCore + ?Sized>(
    params: &PublicParameters,
    config: &Config,
    squares: &SquareDecomposer,
    v: &Integer,
    r_v: &Integer,
    rng: &mut R,
  ) -> Result<RangeProof> {
    if *v < 0 {
      return Err(Error::precondition("range proofs need a non-negative value"));
    }
    let lambda = config.security_bits;
    let bound = params.blinding_bound(lambda);
    let commitment = params.commit(v, r_v)?;
    let w = squares.four_squares(v, rng)?.into_values();

    let mut r = Vec::with_capacity(SQUARES);
    let mut commitments = Vec::with_capacity(SQUARES);
    let mut r_star = r_v.clone();
    for w_i in w.iter() {
      let r_i = random_symmetric(rng, &bound)?;
      commitments.push(params.commit(w_i, &r_i)?);
      r_star -= Integer::from(w_i * &r_i);
      r.push(r_i);
    }

    // Masks hide c * secret statistically: each is 2 * lambda bits wider than the term it covers.
    let w_bits = w[0].significant_bits();
    let m_bound = Integer::from(1) << (w_bits + 2 * lambda);
    let s_bound = Integer::from(&bound << (2 * lambda));
    let star_bits = r_star.significant_bits().max(bound.significant_bits() + w_bits + 2);
    let star_bound = Integer::from(1) << (star_bits + 2 * lambda);

    let mut m = Vec::with_capacity(SQUARES);
    let mut s = Vec::with_capacity(SQUARES);
    let mut masks = Vec::with_capacity(SQUARES);
    for _ in 0..SQUARES {
      let m_i = random_symmetric(rng, &m_bound)?;
      let s_i = random_symmetric(rng, &s_bound)?;
      masks.push(params.commit(&m_i, &s_i)?);
      m.push(m_i);
      s.push(s_i);
    }
    let s_star = random_symmetric(rng, &star_bound)?;
    let product_mask = product(params, &commitments, &m, &s_star)?;

    let c = challenge(params, config, &commitment, &commitments, &masks, &product_mask);
    let z = m
      .into_iter()
      .zip(w.iter())
      .map(|(m_i, w_i)| m_i + Integer::from(&c * w_i))
      .collect();
    let t = s
      .into_iter()
      .zip(r.iter())
      .map(|(s_i, r_i)| s_i + Integer::from(&c * r_i))
      .collect();
    let t_star = s_star + c * r_star;
    debug!(bits = v.significant_bits(), "range proof generated");
    Ok(RangeProof {
      commitments,
      masks,
      product_mask,
      z,
      t,
      t_star,
    })
  }

  /// Checks `G^z_i H^t_i == D_i C_i^c` for every square and `prod C_i^z_i H^t* == D C_v^c`.
  pub fn verify(
    params: &PublicParameters,
    config: &Config,
    commitment: &Integer,
    proof: &RangeProof,
  ) -> bool {
    let RangeProof {
      commitments,
      masks,
      product_mask,
      z,
      t,
      t_star,
    } = proof;
    if [commitments.len(), masks.len(), z.len(), t.len()] != [SQUARES; 4] {
      return false;
    }
    let c = challenge(params, config, commitment, commitments, masks, product_mask);
    let check = || -> Result<bool> {
      for i in 0..SQUARES {
        let lhs = params.commit(&z[i], &t[i])?;
        let rhs = params.op(&masks[i], &params.exp(&commitments[i], &c)?);
        if lhs != rhs {
          return Ok(false);
        }
      }
      let lhs = product(params, commitments, z, t_star)?;
      let rhs = params.op(product_mask, &params.exp(commitment, &c)?);
      Ok(lhs == rhs)
    };
    check().unwrap_or(false)
  }

  pub fn commitments(&self) -> &[Integer] {
    &self.commitments
  }
}

/// `prod bases_i^exps_i * H^h_exp`.
fn product(
  params: &PublicParameters,
  bases: &[Integer],
  exps: &[Integer],
  h_exp: &Integer,
) -> Result<Integer> {
  let mut acc = params.exp(params.h(), h_exp)?;
  for (base, e) in bases.iter().zip(exps) {
    acc = params.op(&acc, &params.exp(base, e)?);
  }
  Ok(acc)
}

fn challenge(
  params: &PublicParameters,
  config: &Config,
  commitment: &Integer,
  commitments: &[Integer],
  masks: &[Integer],
  product_mask: &Integer,
) -> Integer {
  let mut t = transcript("range", [params.n(), params.g(), params.h(), commitment]);
  t.append_integers(commitments);
  t.append_integers(masks);
  t.append_integer(product_mask);
  t.integer_challenge().keep_bits(config.security_bits)
}

/// Proof that a commitment opens to a value in `[lower, upper]`, as two range proofs: one for
/// `C_v * G^-lower` (value `v - lower`) and one for `G^upper * C_v^-1` (value `upper - v`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntervalProof {
  lower: RangeProof,
  upper: RangeProof,
}

impl IntervalProof {
  #[allow(clippy::too_many_arguments)]
  pub fn prove<R: RngCore + ?Sized>(
    params: &PublicParameters,
    config: &Config,
    squares: &SquareDecomposer,
    lower: &Integer,
    upper: &Integer,
    v: &Integer,
    r_v: &Integer,
    rng: &mut R,
  ) -> Result<IntervalProof> {
    if v < lower || v > upper {
      return Err(Error::precondition("value lies outside the interval"));
    }
    let above = Integer::from(v - lower);
    let below = Integer::from(upper - v);
    let neg_r = Integer::from(-r_v);
    Ok(IntervalProof {
      lower: RangeProof::prove(params, config, squares, &above, r_v, rng)?,
      upper: RangeProof::prove(params, config, squares, &below, &neg_r, rng)?,
    })
  }

  pub fn verify(
    params: &PublicParameters,
    config: &Config,
    lower: &Integer,
    upper: &Integer,
    commitment: &Integer,
    proof: &IntervalProof,
  ) -> bool {
    let shifted = || -> Result<(Integer, Integer)> {
      let above = params.op(commitment, &params.exp(params.g(), &Integer::from(-lower))?);
      let below = params.op(&params.exp(params.g(), upper)?, &params.inv(commitment)?);
      Ok((above, below))
    };
    match shifted() {
      Ok((above, below)) => {
        RangeProof::verify(params, config, &above, &proof.lower)
          && RangeProof::verify(params, config, &below, &proof.upper)
      }
      Err(_) => false,
    }
  }
}
