//! Concrete learning semantics.
//!
//! - [`ExhaustiveLikelihood`]: closed-world log-likelihood computed exactly
//!   over an explicitly enumerated set of candidate worlds. Each world is
//!   described by its vector of true-grounding counts `n(x)`, one entry per
//!   formula; the training databases are indices into that set.
//!
//!   ```text
//!   ℓ(w)  = Σ_d [ w·n(x_d) − ln Σ_x exp(w·n(x)) ]
//!   ∇ℓ(w) = Σ_d n(x_d) − D · E_w[n]
//!   ```
//!
//!   Only practical for small domains, but exact, which makes it the
//!   reference semantics for checking the learner end to end.
//! - [`SoftEvidence`]: wraps any objective and switches fixed-weight
//!   statistics to soft truth degrees.
use ndarray::{Array1, Array2};

use crate::{
    learning::{
        errors::{LearnError, LearnResult, WeightSpace},
        model::EvidenceMode,
        objective::LearningObjective,
        types::Weights,
    },
    optimization::errors::{OptError, OptResult},
};

/// Exact closed-world log-likelihood over enumerated worlds.
#[derive(Debug, Clone, PartialEq)]
pub struct ExhaustiveLikelihood {
    /// `n_worlds × n_formulas` true-grounding counts.
    world_counts: Array2<f64>,
    /// Training databases, as row indices of `world_counts`.
    training: Vec<usize>,
    /// `Σ_d n(x_d)`, cached.
    observed: Array1<f64>,
}

impl ExhaustiveLikelihood {
    /// # Errors
    /// - [`LearnError::InvalidObjectiveData`] for an empty world set, no
    ///   training databases, a training index outside the world set, or
    ///   non-finite counts.
    pub fn new(world_counts: Array2<f64>, training: Vec<usize>) -> LearnResult<Self> {
        let invalid =
            |detail: String, reason| LearnError::InvalidObjectiveData { detail, reason };
        if world_counts.nrows() == 0 {
            return Err(invalid("0 worlds".to_string(), "at least one world is required"));
        }
        if training.is_empty() {
            return Err(invalid("0 databases".to_string(), "at least one training world is required"));
        }
        if let Some(&d) = training.iter().find(|&&d| d >= world_counts.nrows()) {
            return Err(invalid(format!("training world {d}"), "index outside the world set"));
        }
        if let Some(v) = world_counts.iter().find(|v| !v.is_finite()) {
            return Err(invalid(v.to_string(), "counts must be finite"));
        }
        let mut observed = Array1::zeros(world_counts.ncols());
        for &d in &training {
            observed += &world_counts.row(d);
        }
        Ok(Self { world_counts, training, observed })
    }

    pub fn n_formulas(&self) -> usize {
        self.world_counts.ncols()
    }

    pub fn n_worlds(&self) -> usize {
        self.world_counts.nrows()
    }

    /// `(w·n(x))_x` and `ln Σ_x exp(w·n(x))`.
    fn scores(&self, weights: &Weights) -> OptResult<(Array1<f64>, f64)> {
        if weights.len() != self.n_formulas() {
            return Err(OptError::from(LearnError::WeightLengthMismatch {
                space: WeightSpace::Full,
                expected: self.n_formulas(),
                found: weights.len(),
            }));
        }
        let scores = self.world_counts.dot(weights);
        let log_z = log_sum_exp(&scores);
        Ok((scores, log_z))
    }
}

impl LearningObjective for ExhaustiveLikelihood {
    fn log_likelihood(&self, weights: &Weights) -> OptResult<f64> {
        let (scores, log_z) = self.scores(weights)?;
        Ok(self.training.iter().map(|&d| scores[d] - log_z).sum())
    }

    fn gradient(&self, weights: &Weights) -> OptResult<Weights> {
        let (scores, log_z) = self.scores(weights)?;
        let probs = scores.mapv(|s| (s - log_z).exp());
        let expected = self.world_counts.t().dot(&probs);
        Ok(&self.observed - &(expected * self.training.len() as f64))
    }
}

/// `ln Σ exp(x)` without overflow.
pub fn log_sum_exp(values: &Array1<f64>) -> f64 {
    let max = values.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    if !max.is_finite() {
        return max;
    }
    max + values.mapv(|v| (v - max).exp()).sum().ln()
}

/// Soft-evidence variant of an objective.
///
/// The likelihood is the wrapped objective's; only the truth degrees used for
/// fixed-weight formulas change.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftEvidence<O>(pub O);

impl<O: LearningObjective> LearningObjective for SoftEvidence<O> {
    fn log_likelihood(&self, weights: &Weights) -> OptResult<f64> {
        self.0.log_likelihood(weights)
    }

    fn gradient(&self, weights: &Weights) -> OptResult<Weights> {
        self.0.gradient(weights)
    }

    fn evidence_mode(&self) -> EvidenceMode {
        EvidenceMode::Soft
    }
}
