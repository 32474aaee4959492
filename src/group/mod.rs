//! The RSA group Z*_N: public parameters `{N, G, H}` and their generation from safe primes.
//!
//! `G` and `H` live in the subgroup of quadratic residues, whose order `p'q'` is only known to
//! whoever ran `setup`. Every protocol in this crate borrows a `PublicParameters` read-only.
use crate::config::Config;
use crate::error::{Error, Result};
use crate::hash::primality::{is_prob_prime, passes_safe_prime_sieve};
use crate::race;
use crate::util::{check_modulus, decimal, exp, int, inv, modulo, mul_mod, parse_decimal};
use crate::util::{random_below, random_odd};
use lazy_static::lazy_static;
use rand::RngCore;
use rug::Integer;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// RSA-2048 modulus, taken from https://en.wikipedia.org/wiki/RSA_numbers#RSA-2048.
const RSA2048_MODULUS_DECIMAL: &str =
  "25195908475657893494027183240048398571429282126204032027777\
   13783604366202070759555626401852588078440691829064124951508\
   21892985591491761845028084891200728449926873928072877767359\
   71418347270261896375014971824691165077613379859095700097330\
   45974880842840179742910064245869181719511874612151517265463\
   22822168699875491824224336372590851418654620435767984233871\
   84774447920739934236584823824281198163815010674810451660377\
   30605620161967625613384414360383390441495263443219011465754\
   44541784240209246165157233507787077498171257724679629263863\
   56373289912154831438167899885040445364023527381951378636564\
   391212010397122822120720357";

lazy_static! {
  pub static ref RSA2048_MODULUS: Integer = Integer::from_str(RSA2048_MODULUS_DECIMAL).unwrap();
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawParameters")]
pub struct PublicParameters {
  #[serde(with = "decimal")]
  n: Integer,
  #[serde(with = "decimal")]
  g: Integer,
  #[serde(with = "decimal")]
  h: Integer,
}

/// Wire form of `PublicParameters`, checked by `PublicParameters::new` before use.
#[derive(Deserialize)]
struct RawParameters {
  #[serde(with = "decimal")]
  n: Integer,
  #[serde(with = "decimal")]
  g: Integer,
  #[serde(with = "decimal")]
  h: Integer,
}

impl TryFrom<RawParameters> for PublicParameters {
  type Error = Error;

  fn try_from(raw: RawParameters) -> Result<Self> {
    PublicParameters::new(raw.n, raw.g, raw.h)
  }
}

impl PublicParameters {
  /// Checks `1 < G, H < N` and that both are units mod `N`.
  pub fn new(n: Integer, g: Integer, h: Integer) -> Result<Self> {
    let params = PublicParameters { n, g, h };
    params.validate()?;
    Ok(params)
  }

  pub fn from_decimal(n: &str, g: &str, h: &str) -> Result<Self> {
    Self::new(parse_decimal(n)?, parse_decimal(g)?, parse_decimal(h)?)
  }

  /// The RSA-2048 challenge modulus with `G = 4` and `H = 9`, both squares and therefore in QR_N.
  /// Nobody is known to hold its factorization.
  pub fn rsa2048() -> Self {
    PublicParameters {
      n: RSA2048_MODULUS.clone(),
      g: int(4),
      h: int(9),
    }
  }

  pub fn validate(&self) -> Result<()> {
    check_modulus(&self.n)?;
    for (name, x) in [("G", &self.g), ("H", &self.h)] {
      if *x <= 1 || *x >= self.n {
        return Err(Error::precondition(format!("{} must lie in (1, N)", name)));
      }
      if Integer::from(x.gcd_ref(&self.n)) != 1 {
        return Err(Error::precondition(format!("{} shares a factor with N", name)));
      }
    }
    Ok(())
  }

  pub fn n(&self) -> &Integer {
    &self.n
  }

  pub fn g(&self) -> &Integer {
    &self.g
  }

  pub fn h(&self) -> &Integer {
    &self.h
  }

  /// Canonical representative of `x` in `[0, N)`.
  pub fn elem(&self, x: Integer) -> Integer {
    modulo(x, &self.n)
  }

  pub fn op(&self, a: &Integer, b: &Integer) -> Integer {
    mul_mod(a, b, &self.n)
  }

  pub fn exp(&self, base: &Integer, e: &Integer) -> Result<Integer> {
    exp(base, e, &self.n)
  }

  pub fn inv(&self, x: &Integer) -> Result<Integer> {
    inv(x, &self.n)
  }

  /// Pedersen commitment `G^v H^r mod N`. Either exponent may be negative.
  pub fn commit(&self, v: &Integer, r: &Integer) -> Result<Integer> {
    Ok(self.op(&self.exp(&self.g, v)?, &self.exp(&self.h, r)?))
  }

  /// Randomizers for zero-knowledge protocols are drawn from `[-B, B]` with
  /// `B = N * 2^(2 * security_bits - 2)`.
  pub fn blinding_bound(&self, security_bits: u32) -> Integer {
    Integer::from(&self.n << (2 * security_bits).saturating_sub(2))
  }

  /// Prime challenges are sampled below `2^min(bits(N), 2 * security_bits)`.
  pub fn prime_challenge_bound(&self, security_bits: u32) -> Integer {
    crate::proof::prime_challenge_bound(&self.n, security_bits)
  }
}

/// Output of `setup`. The factors are the trapdoor and should not leave the party that ran it.
#[derive(Clone, Debug)]
pub struct GroupSetup {
  params: PublicParameters,
  p: Integer,
  q: Integer,
}

impl GroupSetup {
  pub fn params(&self) -> &PublicParameters {
    &self.params
  }

  pub fn p(&self) -> &Integer {
    &self.p
  }

  pub fn q(&self) -> &Integer {
    &self.q
  }

  pub fn into_params(self) -> PublicParameters {
    self.params
  }
}

/// Generates `N = pq` from two distinct safe primes of `config.modulus_bits / 2` bits each, and two
/// distinct full-order generators of QR_N.
pub fn setup<R: RngCore + ?Sized>(config: &Config, rng: &mut R) -> Result<GroupSetup> {
  config.validate()?;
  let prime_bits = config.modulus_bits / 2;
  let p = safe_prime(prime_bits, config, rng)?;
  let q = loop {
    let q = safe_prime(prime_bits, config, rng)?;
    if q != p {
      break q;
    }
  };
  let n = Integer::from(&p * &q);
  let g = qr_generator(&n, &p, &q, config, rng)?;
  let h = loop {
    let h = qr_generator(&n, &p, &q, config, rng)?;
    if h != g {
      break h;
    }
  };
  debug!(bits = n.significant_bits(), "group setup complete");
  Ok(GroupSetup {
    params: PublicParameters { n, g, h },
    p,
    q,
  })
}

/// A prime `p = 2p' + 1` of exactly `bits` bits with `p'` prime. Candidates `p'` are sieved
/// against small primes before any Miller-Rabin round; the search is raced across
/// `config.workers` workers.
pub fn safe_prime<R: RngCore + ?Sized>(
  bits: u32,
  config: &Config,
  rng: &mut R,
) -> Result<Integer> {
  if bits < 3 {
    return Err(Error::precondition("safe primes need at least 3 bits"));
  }
  let reps = config.primality_reps;
  race::first_success(rng, config.workers, config.max_trials, |r| {
    let half = random_odd(r, bits - 1)?;
    if !passes_safe_prime_sieve(&half) || !is_prob_prime(&half, reps) {
      return Ok(None);
    }
    let p = Integer::from(&half << 1u32) + 1u32;
    Ok(if is_prob_prime(&p, reps) { Some(p) } else { None })
  })
}

/// Rejection-samples `x` in `[2, N)` with Jacobi symbol +1 modulo both `p` and `q` (so `x` is a
/// quadratic residue) and order `p'q'` in QR_N.
fn qr_generator<R: RngCore + ?Sized>(
  n: &Integer,
  p: &Integer,
  q: &Integer,
  config: &Config,
  rng: &mut R,
) -> Result<Integer> {
  let p_half = Integer::from(p - 1u32) >> 1u32;
  let q_half = Integer::from(q - 1u32) >> 1u32;
  race::sequential(rng, config.max_trials, |r| {
    let x = random_below(r, n)?;
    if x <= 1 || Integer::from(x.gcd_ref(n)) != 1 {
      return Ok(None);
    }
    if x.jacobi(p) != 1 || x.jacobi(q) != 1 {
      return Ok(None);
    }
    if exp(&x, &p_half, n)? == 1 || exp(&x, &q_half, n)? == 1 {
      return Ok(None);
    }
    Ok(Some(x))
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::DEFAULT_PRIMALITY_REPS;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn small_config() -> Config {
    Config::default().with_modulus_bits(64)
  }

  #[test]
  fn test_rsa2048_params_valid() {
    let params = PublicParameters::rsa2048();
    assert!(params.validate().is_ok());
    assert_eq!(params.n().significant_bits(), 2048);
  }

  #[test]
  fn test_rejects_bad_params() {
    assert!(PublicParameters::from_decimal("23", "1", "5").is_err());
    assert!(PublicParameters::from_decimal("23", "11", "23").is_err());
    assert!(PublicParameters::from_decimal("21", "7", "5").is_err());
    assert!(PublicParameters::from_decimal("1", "2", "3").is_err());
    assert!(PublicParameters::from_decimal("x", "2", "3").is_err());
    assert!(PublicParameters::from_decimal("23", "11", "5").is_ok());
  }

  #[test]
  fn test_setup_validity() {
    let mut rng = StdRng::seed_from_u64(11);
    let setup = setup(&small_config(), &mut rng).unwrap();
    let (p, q) = (setup.p(), setup.q());
    let params = setup.params();
    assert_eq!(*params.n(), Integer::from(p * q));
    assert_ne!(p, q);
    for prime in [p, q] {
      assert_eq!(prime.significant_bits(), 32);
      assert!(is_prob_prime(prime, DEFAULT_PRIMALITY_REPS));
      let half = Integer::from(prime - 1u32) >> 1u32;
      assert!(is_prob_prime(&half, DEFAULT_PRIMALITY_REPS));
    }
    for generator in [params.g(), params.h()] {
      assert_eq!(generator.jacobi(p), 1);
      assert_eq!(generator.jacobi(q), 1);
    }
    assert_ne!(params.g(), params.h());
    assert!(params.validate().is_ok());
  }

  #[test]
  fn test_setup_rejects_tiny_modulus() {
    let mut rng = StdRng::seed_from_u64(12);
    let config = Config::default().with_modulus_bits(16);
    assert!(matches!(
      setup(&config, &mut rng),
      Err(Error::PreconditionViolation(_))
    ));
  }

  #[test]
  fn test_op_exp_inv() {
    let params = PublicParameters::from_decimal("23", "11", "5").unwrap();
    assert_eq!(params.op(&int(11), &int(5)), 9);
    assert_eq!(params.exp(&int(2), &int(3)).unwrap(), 8);
    let x = params.inv(&int(11)).unwrap();
    assert_eq!(params.op(&x, &int(11)), 1);
    assert_eq!(params.elem(int(-1)), 22);
  }

  #[test]
  fn test_commit_negative_randomness() {
    let params = PublicParameters::rsa2048();
    let c = params.commit(&int(5), &int(-3)).unwrap();
    let h3 = params.exp(params.h(), &int(3)).unwrap();
    let g5 = params.exp(params.g(), &int(5)).unwrap();
    assert_eq!(params.op(&c, &h3), g5);
  }

  #[test]
  fn test_serde_round_trip() {
    let params = PublicParameters::rsa2048();
    let json = serde_json::to_string(&params).unwrap();
    assert!(json.contains(RSA2048_MODULUS_DECIMAL.split_whitespace().next().unwrap()));
    let back: PublicParameters = serde_json::from_str(&json).unwrap();
    assert_eq!(back, params);
  }

  #[test]
  fn test_deserialize_rejects_degenerate_generators() {
    let good = r#"{"n": "23", "g": "11", "h": "5"}"#;
    assert!(serde_json::from_str::<PublicParameters>(good).is_ok());
    for bad in [
      r#"{"n": "23", "g": "1", "h": "5"}"#,
      r#"{"n": "23", "g": "11", "h": "0"}"#,
      r#"{"n": "21", "g": "7", "h": "5"}"#,
      r#"{"n": "1", "g": "11", "h": "5"}"#,
    ] {
      assert!(serde_json::from_str::<PublicParameters>(bad).is_err());
    }
  }
}
