//! Fiat-Shamir transcript.
//!
//! A transcript is an ordered list of strings. Challenges hash the whole list (each entry as a
//! big-endian `u64` length followed by its bytes, under Blake2b-256) and are appended back as
//! decimal strings, so two transcripts with the same history produce the same challenge sequence
//! and consecutive challenges never repeat.
use crate::config::DEFAULT_PRIMALITY_REPS;
use crate::error::{Error, Result};
use crate::hash::primality::is_prob_prime;
use blake2_rfc::blake2b::Blake2b;
use rug::integer::Order;
use rug::Integer;

const HASH_LENGTH_IN_BYTES: usize = 32;

/// Miller-Rabin rounds for prime challenges. Prover and verifier must derive the same prime, so
/// this is part of the protocol and does not follow `Config::primality_reps`.
pub const CHALLENGE_PRIMALITY_REPS: u32 = DEFAULT_PRIMALITY_REPS;

#[derive(Clone, Copy, Debug)]
pub enum ChallengeKind<'a> {
  /// The raw 256-bit digest.
  Integer,
  /// A probable prime in `[0, bound)`.
  Prime { bound: &'a Integer },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
  entries: Vec<String>,
}

impl Transcript {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_entries<I, S>(entries: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Transcript {
      entries: entries.into_iter().map(Into::into).collect(),
    }
  }

  pub fn append<S: Into<String>>(&mut self, entry: S) {
    self.entries.push(entry.into());
  }

  pub fn append_all<I, S>(&mut self, entries: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.entries.extend(entries.into_iter().map(Into::into));
  }

  pub fn append_integer(&mut self, n: &Integer) {
    self.append(n.to_string_radix(10));
  }

  pub fn append_integers<'a, I: IntoIterator<Item = &'a Integer>>(&mut self, ns: I) {
    for n in ns {
      self.append_integer(n);
    }
  }

  pub fn entries(&self) -> &[String] {
    &self.entries
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn reset(&mut self) {
    self.entries.clear();
  }

  fn digest(&self, counter: Option<u64>) -> Integer {
    let mut state = Blake2b::new(HASH_LENGTH_IN_BYTES);
    for entry in &self.entries {
      state.update(&(entry.len() as u64).to_be_bytes());
      state.update(entry.as_bytes());
    }
    if let Some(counter) = counter {
      state.update(&counter.to_be_bytes());
    }
    Integer::from_digits(state.finalize().as_bytes(), Order::Msf)
  }

  /// Derives the next challenge and appends it to the transcript.
  pub fn challenge(&mut self, kind: ChallengeKind<'_>) -> Result<Integer> {
    let bound = match kind {
      ChallengeKind::Integer => return Ok(self.integer_challenge()),
      ChallengeKind::Prime { bound } => bound,
    };
    if *bound <= 2 {
      return Err(Error::precondition("prime challenge bound must exceed 2"));
    }
    let mut counter = 0u64;
    let challenge = loop {
      let candidate = self.digest(Some(counter)) % bound;
      if is_prob_prime(&candidate, CHALLENGE_PRIMALITY_REPS) {
        break candidate;
      }
      counter += 1;
    };
    self.append_integer(&challenge);
    Ok(challenge)
  }

  pub fn integer_challenge(&mut self) -> Integer {
    let challenge = self.digest(None);
    self.append_integer(&challenge);
    challenge
  }

  pub fn prime_challenge(&mut self, bound: &Integer) -> Result<Integer> {
    self.challenge(ChallengeKind::Prime { bound })
  }
}
