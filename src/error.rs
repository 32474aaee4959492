//! Error types shared by every module.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failed randomized trials (a composite prime candidate, an unlucky witness) are retried
/// internally and never show up here. Verifiers return `bool` rather than an `Error`.
#[derive(Debug, Error)]
pub enum Error {
  /// Malformed input: non-positive modulus, negative exponent, wrong residue class, etc.
  #[error("precondition violated: {0}")]
  PreconditionViolation(String),

  #[error("entropy source failed: {0}")]
  RandomnessExhausted(String),

  /// The caller-supplied trial budget ran out before a randomized search succeeded.
  #[error("randomized search gave up after {0} trials")]
  TrialsExhausted(u64),

  #[error("generated value failed its self-check: {0}")]
  VerificationFailed(&'static str),

  #[error("witness does not open the accumulator")]
  BadWitness,

  #[error("inputs are not coprime")]
  InputsNotCoprime,
}

impl Error {
  pub(crate) fn precondition<S: Into<String>>(msg: S) -> Self {
    Error::PreconditionViolation(msg.into())
  }
}

impl From<rand::Error> for Error {
  fn from(err: rand::Error) -> Self {
    Error::RandomnessExhausted(err.to_string())
  }
}
