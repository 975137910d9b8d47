//! Errors for MLN weight learning.
//!
//! [`ModelError`] is what a [`MarkovLogicNetwork`](super::model::MarkovLogicNetwork)
//! implementation reports (unknown formula, grounding or evidence failures);
//! the learner wraps it unchanged in [`LearnError::Model`]. [`LearnError`]
//! covers everything else a learning run can fail on.
//!
//! ## Conventions
//! - Formula indices are 0-based positions in the model's formula sequence.
//! - Convergence problems are **not** errors; they are reported through
//!   `Diagnostics::warn_flag`.
use std::fmt;

use crate::optimization::errors::OptError;

/// Result alias for learning operations.
pub type LearnResult<T> = Result<T, LearnError>;

/// Result alias for model accessors.
pub type ModelResult<T> = Result<T, ModelError>;

/// Failures raised by the model collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A formula index outside `0..n_formulas` was requested.
    UnknownFormula { index: usize, n_formulas: usize },

    /// Enumerating the groundings of a formula failed.
    Grounding { formula: usize, text: String },

    /// Looking up evidence for a ground formula failed.
    Evidence { text: String },
}

impl std::error::Error for ModelError {}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownFormula { index, n_formulas } => {
                write!(f, "Unknown formula F#{index}: model has {n_formulas} formulas")
            }
            ModelError::Grounding { formula, text } => {
                write!(f, "Grounding F#{formula} failed: {text}")
            }
            ModelError::Evidence { text } => write!(f, "Evidence lookup failed: {text}"),
        }
    }
}

/// Which side of the fixed/free partition a weight vector lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightSpace {
    /// One entry per formula.
    Full,
    /// One entry per free (optimized) formula.
    Reduced,
}

impl fmt::Display for WeightSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightSpace::Full => write!(f, "full"),
            WeightSpace::Reduced => write!(f, "reduced"),
        }
    }
}

/// Unified error type for weight learning.
#[derive(Debug, Clone, PartialEq)]
pub enum LearnError {
    // ---- Configuration ----
    /// The numerical backend is not compiled in.
    BackendUnavailable { backend: &'static str, hint: &'static str },

    /// A run option could not be applied.
    InvalidOption { key: String, value: String, reason: &'static str },

    // ---- Fixed weights ----
    /// ln(c / Z) is undefined or infinite for a fixed-weight formula.
    DegenerateStatistics {
        formula: usize,
        label: String,
        groundings: usize,
        satisfied: f64,
        reason: &'static str,
    },

    /// A soft truth degree was outside [0, 1] or not finite.
    InvalidTruthDegree { formula: usize, value: f64 },

    /// A fixed-weight index does not name a formula of the model.
    FixedIndexOutOfRange { index: usize, n_formulas: usize },

    // ---- Objectives ----
    /// An objective's data (e.g. a world-count table) is malformed.
    InvalidObjectiveData { detail: String, reason: &'static str },

    // ---- Weight vectors ----
    /// A weight or gradient vector has the wrong length for its space.
    WeightLengthMismatch { space: WeightSpace, expected: usize, found: usize },

    // ---- Collaborators ----
    /// Model errors, propagated unmodified.
    Model(ModelError),

    /// Optimizer-layer errors.
    Optimization(OptError),
}

impl LearnError {
    /// True for errors raised before any learning work starts.
    pub fn is_configuration(&self) -> bool {
        matches!(self, LearnError::BackendUnavailable { .. } | LearnError::InvalidOption { .. })
    }
}

impl std::error::Error for LearnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LearnError::Model(e) => Some(e),
            LearnError::Optimization(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for LearnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LearnError::BackendUnavailable { backend, hint } => {
                write!(f, "Optimization backend '{backend}' is unavailable: {hint}")
            }
            LearnError::InvalidOption { key, value, reason } => {
                write!(f, "Invalid option {key}={value}: {reason}")
            }
            LearnError::DegenerateStatistics { formula, label, groundings, satisfied, reason } => {
                write!(
                    f,
                    "Cannot fix weight of F#{formula} {label}: {reason} \
                     (groundings = {groundings}, satisfied = {satisfied})"
                )
            }
            LearnError::InvalidTruthDegree { formula, value } => {
                write!(f, "Truth degree {value} for a grounding of F#{formula} is outside [0, 1]")
            }
            LearnError::FixedIndexOutOfRange { index, n_formulas } => {
                write!(f, "Fixed-weight index {index} out of range for {n_formulas} formulas")
            }
            LearnError::InvalidObjectiveData { detail, reason } => {
                write!(f, "Invalid objective data ({detail}): {reason}")
            }
            LearnError::WeightLengthMismatch { space, expected, found } => {
                write!(f, "{space} weight vector has length {found}, expected {expected}")
            }
            LearnError::Model(e) => write!(f, "Model error: {e}"),
            LearnError::Optimization(e) => write!(f, "Optimization error: {e}"),
        }
    }
}

impl From<ModelError> for LearnError {
    fn from(err: ModelError) -> Self {
        LearnError::Model(err)
    }
}

impl From<OptError> for LearnError {
    fn from(err: OptError) -> Self {
        LearnError::Optimization(err)
    }
}

/// Learning errors raised inside the optimizer's objective callbacks.
///
/// Optimizer errors are unwrapped so signals such as
/// `GradientNotImplemented` keep their meaning; shape errors become
/// `ParamDimMismatch`; anything else is carried as text.
impl From<LearnError> for OptError {
    fn from(err: LearnError) -> Self {
        match err {
            LearnError::Optimization(e) => e,
            LearnError::WeightLengthMismatch { expected, found, .. } => {
                OptError::ParamDimMismatch { expected, found }
            }
            other => OptError::ObjectiveFailed { text: other.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Converting to `OptError` keeps optimizer signals intact.
    //
    // Expect
    // ------
    // - `Optimization(GradientNotImplemented)` unwraps to the bare variant.
    // - A length mismatch becomes `ParamDimMismatch`.
    // - A model error becomes `ObjectiveFailed` with its message.
    fn into_opt_error_preserves_optimizer_signals() {
        let gni = OptError::from(LearnError::Optimization(OptError::GradientNotImplemented));
        assert_eq!(gni, OptError::GradientNotImplemented);

        let dim = OptError::from(LearnError::WeightLengthMismatch {
            space: WeightSpace::Reduced,
            expected: 2,
            found: 3,
        });
        assert_eq!(dim, OptError::ParamDimMismatch { expected: 2, found: 3 });

        let model = OptError::from(LearnError::Model(ModelError::Evidence {
            text: "atom 7 missing".to_string(),
        }));
        assert_eq!(
            model,
            OptError::ObjectiveFailed {
                text: "Model error: Evidence lookup failed: atom 7 missing".to_string()
            }
        );
    }

    #[test]
    fn configuration_errors_are_classified() {
        assert!(LearnError::BackendUnavailable { backend: "lbfgs", hint: "" }.is_configuration());
        assert!(!LearnError::Model(ModelError::Evidence { text: String::new() }).is_configuration());
    }
}
