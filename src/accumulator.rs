//! Accumulator primitives over Z*_N and the divide-and-conquer batch membership-proof algorithm.
//!
//! Operations that "mutate" an `Accumulator` (add, delete) use moves instead of references so that
//! you don't accidentally use the old accumulator state.
use crate::error::{Error, Result};
use crate::group::PublicParameters;
use crate::hash::Encoding;
use crate::proof::Poe;
use crate::util::{check_modulus, exp, int, modulo, shamir_trick};
use rug::Integer;
use std::sync::Arc;
use tracing::debug;

/// `floor(log2(threads))` for the rayon pool, so a full fork tree has about one task per thread.
pub fn default_parallelism_depth() -> u32 {
  let threads = rayon::current_num_threads().max(1);
  usize::BITS - 1 - threads.leading_zeros()
}

fn check_representatives(reps: &[Integer]) -> Result<()> {
  if reps.iter().any(|e| *e <= 0) {
    return Err(Error::precondition("representatives must be positive"));
  }
  Ok(())
}

/// `base^(prod reps) mod N`, exponentiating once by the product.
pub fn accumulate(base: &Integer, reps: &[Integer], modulus: &Integer) -> Result<Integer> {
  check_modulus(modulus)?;
  check_representatives(reps)?;
  let x: Integer = reps.iter().product();
  exp(base, &x, modulus)
}

/// Same value as `accumulate`, exponentiating by one representative at a time.
pub fn accumulate_iterative(
  base: &Integer,
  reps: &[Integer],
  modulus: &Integer,
) -> Result<Integer> {
  check_modulus(modulus)?;
  check_representatives(reps)?;
  reps
    .iter()
    .try_fold(modulo(base.clone(), modulus), |acc, e| exp(&acc, e, modulus))
}

/// Returns `proofs` with `proofs[i] = base^(prod_{j != i} reps[j]) mod N`.
///
/// The representative slice is split at its midpoint; each half inherits the parent base raised to
/// the product of the *other* half, so a node covering `[l, r)` always holds `base` raised to
/// everything outside `[l, r)`. That is `O(n log n)` exponentiation work in total, versus `O(n^2)`
/// for `prove_membership_serial`.
///
/// The top `depth` levels of the tree fork both children onto the rayon pool (at most `2^depth`
/// concurrent tasks); below that the recursion is sequential. Output slots are handed down by
/// splitting the output slice at the same midpoint, so the result order never depends on
/// scheduling.
pub fn prove_membership_batch(
  base: &Integer,
  modulus: &Integer,
  reps: &[Integer],
  depth: u32,
) -> Result<Vec<Integer>> {
  check_modulus(modulus)?;
  check_representatives(reps)?;
  let mut proofs = vec![Integer::new(); reps.len()];
  prove_range(modulo(base.clone(), modulus), modulus, reps, &mut proofs, depth)?;
  debug!(count = reps.len(), depth, "built batch membership proofs");
  Ok(proofs)
}

fn prove_range(
  base: Integer,
  modulus: &Integer,
  reps: &[Integer],
  out: &mut [Integer],
  depth: u32,
) -> Result<()> {
  match reps.len() {
    0 => Ok(()),
    1 => {
      out[0] = base;
      Ok(())
    }
    2 => {
      out[0] = exp(&base, &reps[1], modulus)?;
      out[1] = exp(&base, &reps[0], modulus)?;
      Ok(())
    }
    len => {
      let mid = len / 2;
      let (left_reps, right_reps) = reps.split_at(mid);
      let (left_out, right_out) = out.split_at_mut(mid);
      let absorb = |half: &[Integer]| -> Result<Integer> {
        let x: Integer = half.iter().product();
        exp(&base, &x, modulus)
      };

      if depth == 0 {
        let left_base = absorb(right_reps)?;
        let right_base = absorb(left_reps)?;
        prove_range(left_base, modulus, left_reps, left_out, 0)?;
        return prove_range(right_base, modulus, right_reps, right_out, 0);
      }

      let (left_base, right_base) = rayon::join(|| absorb(right_reps), || absorb(left_reps));
      let (left_base, right_base) = (left_base?, right_base?);
      let (left, right) = rayon::join(
        || prove_range(left_base, modulus, left_reps, left_out, depth - 1),
        || prove_range(right_base, modulus, right_reps, right_out, depth - 1),
      );
      left.and(right)
    }
  }
}

/// One exponentiation per proof, each by the product of all other representatives.
pub fn prove_membership_serial(
  base: &Integer,
  modulus: &Integer,
  reps: &[Integer],
) -> Result<Vec<Integer>> {
  check_modulus(modulus)?;
  check_representatives(reps)?;
  (0..reps.len())
    .map(|i| {
      let x: Integer = reps
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != i)
        .map(|(_, e)| e)
        .product();
      exp(base, &x, modulus)
    })
    .collect()
}

/// `witness^rep mod N == acc`.
pub fn verify_membership(
  modulus: &Integer,
  witness: &Integer,
  rep: &Integer,
  acc: &Integer,
) -> bool {
  if *rep <= 0 || *modulus <= 1 {
    return false;
  }
  exp(witness, rep, modulus)
    .map(|v| v == *acc)
    .unwrap_or(false)
}

/// Per-element proof: `witness^rep == acc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MembershipWitness {
  pub rep: Integer,
  pub witness: Integer,
}

/// Aggregate proof that some set of representatives takes `witness` to the accumulator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MembershipProof {
  witness: Integer,
  proof: Poe,
}

impl MembershipProof {
  pub fn witness(&self) -> &Integer {
    &self.witness
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Accumulator {
  params: Arc<PublicParameters>,
  encoding: Encoding,
  value: Integer,
}

impl Accumulator {
  /// Initializes the accumulator to `G`.
  pub fn new(params: Arc<PublicParameters>, encoding: Encoding) -> Self {
    let value = params.g().clone();
    Accumulator {
      params,
      encoding,
      value,
    }
  }

  /// Accumulates `elems` from scratch and returns a witness for each, in input order.
  pub fn commit<T: AsRef<[u8]>>(
    params: Arc<PublicParameters>,
    encoding: Encoding,
    elems: &[T],
    depth: u32,
  ) -> Result<(Self, Vec<MembershipWitness>)> {
    let reps = encoding.encode_all(elems);
    let value = accumulate(params.g(), &reps, params.n())?;
    let proofs = prove_membership_batch(params.g(), params.n(), &reps, depth)?;
    debug!(elements = reps.len(), "committed accumulator");
    let witnesses = reps
      .into_iter()
      .zip(proofs)
      .map(|(rep, witness)| MembershipWitness { rep, witness })
      .collect();
    Ok((
      Accumulator {
        params,
        encoding,
        value,
      },
      witnesses,
    ))
  }

  pub fn value(&self) -> &Integer {
    &self.value
  }

  pub fn params(&self) -> &PublicParameters {
    &self.params
  }

  pub fn encoding(&self) -> Encoding {
    self.encoding
  }

  fn with_value(&self, value: Integer) -> Self {
    Accumulator {
      params: self.params.clone(),
      encoding: self.encoding,
      value,
    }
  }

  // The conciseness of accumulator.add() and low probability of confusion with implementations of
  // the Add trait probably justify this...
  #[allow(clippy::should_implement_trait)]
  /// Adds `reps` to the accumulator. Cannot check whether the elements are coprime with the
  /// accumulator, but it is up to clients to either ensure uniqueness or treat this as multiset.
  pub fn add(self, reps: &[Integer]) -> Result<(Self, MembershipProof)> {
    check_representatives(reps)?;
    let x: Integer = reps.iter().product();
    let new_value = self.params.exp(&self.value, &x)?;
    let proof = Poe::prove(self.params.n(), &self.value, &x, &new_value)?;
    let new_acc = self.with_value(new_value);
    Ok((
      new_acc,
      MembershipProof {
        witness: self.value,
        proof,
      },
    ))
  }

  /// Encodes `elems` with this accumulator's encoding and adds them.
  pub fn add_elems<T: AsRef<[u8]>>(self, elems: &[T]) -> Result<(Self, MembershipProof)> {
    let reps = self.encoding.encode_all(elems);
    self.add(&reps)
  }

  /// Removes `(rep, witness)` pairs, where each `witness` opens the current accumulator at `rep`.
  pub fn delete(self, elem_witnesses: &[(Integer, Integer)]) -> Result<(Self, MembershipProof)> {
    let n = self.params.n();
    let mut elem_aggregate = int(1);
    let mut acc_next = self.value.clone();

    for (elem, witness) in elem_witnesses {
      if !verify_membership(n, witness, elem, &self.value) {
        return Err(Error::BadWitness);
      }

      acc_next = shamir_trick(n, &acc_next, witness, &elem_aggregate, elem)
        .ok_or(Error::InputsNotCoprime)?;
      elem_aggregate *= elem;
    }

    let proof = Poe::prove(n, &acc_next, &elem_aggregate, &self.value)?;
    Ok((
      self.with_value(acc_next.clone()),
      MembershipProof {
        witness: acc_next,
        proof,
      },
    ))
  }

  /// Returns a proof (and associated variables) that `elem_witnesses` are aggregated in `self`.
  pub fn prove_membership(&self, elem_witnesses: &[(Integer, Integer)]) -> Result<MembershipProof> {
    Ok(self.clone().delete(elem_witnesses)?.1)
  }

  /// Verifies the PoE returned by `add`, `delete` or `prove_membership`.
  pub fn verify_membership(
    &self,
    reps: &[Integer],
    MembershipProof { witness, proof }: &MembershipProof,
  ) -> bool {
    if reps.iter().any(|e| *e <= 0) {
      return false;
    }
    let x: Integer = reps.iter().product();
    Poe::verify(self.params.n(), witness, &x, &self.value, proof)
  }

  pub fn verify_witness(&self, MembershipWitness { rep, witness }: &MembershipWitness) -> bool {
    verify_membership(self.params.n(), witness, rep, &self.value)
  }

  /// Encodes `elem` and checks `witness` against it.
  pub fn verify_element(&self, elem: &[u8], witness: &Integer) -> bool {
    let rep = self.encoding.encode(elem);
    verify_membership(self.params.n(), witness, &rep, &self.value)
  }
}
