use crate::error::{Error, Result};
use rand::RngCore;
use rug::integer::Order;
use rug::Integer;

pub fn int<T>(val: T) -> Integer
where
  Integer: From<T>,
{
  Integer::from(val)
}

/// Least non-negative residue of `x` modulo `m`.
pub fn modulo(x: Integer, m: &Integer) -> Integer {
  x.div_rem_euc(m.clone()).1
}

pub fn mul_mod(a: &Integer, b: &Integer, m: &Integer) -> Integer {
  modulo(Integer::from(a * b), m)
}

/// `base^e mod m` for any sign of `e`. A negative exponent needs `base` to be invertible mod `m`.
pub fn exp(base: &Integer, e: &Integer, m: &Integer) -> Result<Integer> {
  base
    .pow_mod_ref(e, m)
    .map(Integer::from)
    .ok_or_else(|| Error::precondition("base is not invertible modulo N"))
}

/// Modular inverse, or a precondition violation if `x` shares a factor with `m`.
pub fn inv(x: &Integer, m: &Integer) -> Result<Integer> {
  x.invert_ref(m)
    .map(Integer::from)
    .ok_or_else(|| Error::precondition("element is not invertible modulo N"))
}

pub fn check_modulus(m: &Integer) -> Result<()> {
  if *m <= 1 {
    return Err(Error::precondition("modulus must be greater than one"));
  }
  Ok(())
}

pub fn parse_decimal(s: &str) -> Result<Integer> {
  Integer::from_str_radix(s.trim(), 10)
    .map_err(|e| Error::precondition(format!("bad decimal integer {:?}: {}", s, e)))
}

/// Uniform integer in `[0, 2^bits)`.
pub fn random_bits<R: RngCore + ?Sized>(rng: &mut R, bits: u32) -> Result<Integer> {
  if bits == 0 {
    return Ok(Integer::new());
  }
  let mut bytes = vec![0u8; ((bits + 7) / 8) as usize];
  rng.try_fill_bytes(&mut bytes)?;
  Ok(Integer::from_digits(&bytes, Order::Msf).keep_bits(bits))
}

/// Uniform integer in `[0, bound)` by rejection sampling.
pub fn random_below<R: RngCore + ?Sized>(rng: &mut R, bound: &Integer) -> Result<Integer> {
  if *bound <= 0 {
    return Err(Error::precondition("sampling bound must be positive"));
  }
  let bits = bound.significant_bits();
  loop {
    let x = random_bits(rng, bits)?;
    if x < *bound {
      return Ok(x);
    }
  }
}

/// Uniform integer in `[-bound, bound]`.
pub fn random_symmetric<R: RngCore + ?Sized>(rng: &mut R, bound: &Integer) -> Result<Integer> {
  if *bound < 0 {
    return Err(Error::precondition("sampling bound must be non-negative"));
  }
  let width = Integer::from(bound * 2u32) + 1u32;
  Ok(random_below(rng, &width)? - bound)
}

/// Odd integer with exactly `bits` significant bits.
pub fn random_odd<R: RngCore + ?Sized>(rng: &mut R, bits: u32) -> Result<Integer> {
  if bits < 2 {
    return Ok(int(1));
  }
  let mut x = random_bits(rng, bits)?;
  x.set_bit(bits - 1, true);
  x.set_bit(0, true);
  Ok(x)
}

/// Computes the `(xy)`th root of `g` given the `x`th and `y`th roots of `g` and `(x, y)` coprime.
pub fn shamir_trick(
  modulus: &Integer,
  xth_root: &Integer,
  yth_root: &Integer,
  x: &Integer,
  y: &Integer,
) -> Option<Integer> {
  if exp(xth_root, x, modulus).ok()? != exp(yth_root, y, modulus).ok()? {
    return None;
  }

  let (gcd, a, b) = x.clone().gcd_cofactors(y.clone(), Integer::new());

  if gcd != 1 {
    return None;
  }

  let lhs = exp(xth_root, &b, modulus).ok()?;
  let rhs = exp(yth_root, &a, modulus).ok()?;
  Some(mul_mod(&lhs, &rhs, modulus))
}

/// Serde adapter writing integers as base-10 strings.
pub mod decimal {
  use rug::Integer;
  use serde::{de, Deserialize, Deserializer, Serializer};

  pub fn serialize<S: Serializer>(n: &Integer, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&n.to_string_radix(10))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Integer, D::Error> {
    let s = String::deserialize(d)?;
    Integer::from_str_radix(&s, 10).map_err(de::Error::custom)
  }
}

/// Like `decimal`, for sequences.
pub mod decimal_seq {
  use rug::Integer;
  use serde::ser::SerializeSeq;
  use serde::{de, Deserialize, Deserializer, Serializer};

  pub fn serialize<S: Serializer>(ns: &[Integer], s: S) -> Result<S::Ok, S::Error> {
    let mut seq = s.serialize_seq(Some(ns.len()))?;
    for n in ns {
      seq.serialize_element(&n.to_string_radix(10))?;
    }
    seq.end()
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Integer>, D::Error> {
    let strings = Vec::<String>::deserialize(d)?;
    strings
      .iter()
      .map(|s| Integer::from_str_radix(s, 10).map_err(de::Error::custom))
      .collect()
  }
}
