//! Accumulators and zero-knowledge proofs in the RSA group of unknown order.
//!
//! - `accumulator`: commit a set of elements to one group value and prove membership, in batch.
//! - `squares`: two, three and four square decompositions over Gaussian and Hurwitz integers.
//! - `proof`: Fiat-Shamir proofs of exponentiation, knowledge of exponent and non-negativity.
#![allow(clippy::many_single_char_names)]

pub mod accumulator;
pub mod config;
pub mod error;
pub mod group;
pub mod hash;
pub mod pool;
pub mod proof;
pub mod race;
pub mod ring;
pub mod squares;
pub mod transcript;
pub mod util;

pub use accumulator::{Accumulator, MembershipProof, MembershipWitness};
pub use config::Config;
pub use error::{Error, Result};
pub use group::{setup, GroupSetup, PublicParameters};
pub use hash::Encoding;
pub use squares::{lagrange_four_squares, FourInt, SquareDecomposer, ThreeInt};
pub use transcript::{ChallengeKind, Transcript};
