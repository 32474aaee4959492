//! Euclidean rings used by the sum-of-squares decompositions: Gaussian integers `Z[i]` and the
//! Hurwitz quaternions.
mod gaussian;
pub use gaussian::GaussianInt;
mod hurwitz;
pub use hurwitz::HurwitzInt;
