//! Non-interactive (Fiat-Shamir) proofs over Z*_N.
//!
//! All proofs derive their challenges from a fresh `Transcript` seeded with a protocol label and
//! every public value of the statement, so prover and verifier recompute identical challenges.
use crate::error::Result;
use crate::group::PublicParameters;
use crate::transcript::Transcript;
use rug::Integer;

mod poe;
pub use poe::Poe;
mod poke2;
pub use poke2::Poke2;
mod pokestar;
pub use pokestar::PokeStar;
mod range;
pub use range::{IntervalProof, RangeProof};
mod zkpoke;
pub use zkpoke::{ZkPoke, ZkPokeCommitment, ZkPokeResponse};

/// Prime challenges live below `2^min(bits(N), 2 * security_bits)`.
pub fn prime_challenge_bound(modulus: &Integer, security_bits: u32) -> Integer {
  let bits = modulus.significant_bits().min(2 * security_bits).max(2);
  Integer::from(1) << bits
}

/// Pedersen commitment `G^v H^r mod N`, the form every committed value in these proofs takes.
pub fn pedersen_commit(params: &PublicParameters, v: &Integer, r: &Integer) -> Result<Integer> {
  params.commit(v, r)
}

fn transcript<'a, I: IntoIterator<Item = &'a Integer>>(label: &str, publics: I) -> Transcript {
  let mut t = Transcript::with_entries([label]);
  t.append_integers(publics);
  t
}
