//! optimization — log-likelihood maximization stack and its error surface.
//!
//! Purpose
//! -------
//! Provide the numerical engine behind weight learning: an Argmin-backed
//! L-BFGS maximizer for any [`loglik_optimizer::LogLikelihood`], plus a
//! single error/result surface (`errors::OptError`, `errors::OptResult<T>`).
//!
//! Conventions
//! -----------
//! - All solvers conceptually maximize `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`;
//!   user-facing values and gradients are expressed in terms of `ℓ`.
//! - Parameters and gradients are `ndarray` vectors (`Theta`, `Grad`).
//! - Callers never see raw Argmin errors.
//! - The solver itself is only compiled with the `lbfgs` feature. Option
//!   types, validation and the error surface are always available so that
//!   configuration can be built and checked without the backend.

pub mod errors;
pub mod loglik_optimizer;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
}
