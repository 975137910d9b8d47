//! Learning objectives and their reduced-space adapter.
//!
//! A [`LearningObjective`] evaluates the log-likelihood of the training data
//! (and optionally its gradient) at a **full** weight vector. Concrete
//! semantics (closed-world, soft evidence, ...) implement it; the learner
//! only ever holds the trait.
//!
//! [`ObjectiveAdapter`] puts the objective in the optimizer's reduced space:
//! it expands reduced weights before every evaluation and projects the
//! returned gradient back. It keeps no state between calls, so evaluation
//! order does not matter.
use crate::{
    learning::{
        errors::{LearnError, LearnResult, WeightSpace},
        model::EvidenceMode,
        projection::WeightProjector,
        types::Weights,
    },
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{
            traits::LogLikelihood,
            types::{Grad, Theta},
            validation::validate_theta0,
        },
    },
};

/// Log-likelihood of the training data as a function of all formula weights.
pub trait LearningObjective {
    /// `ℓ(w)` at the full weight vector `weights`.
    fn log_likelihood(&self, weights: &Weights) -> OptResult<f64>;

    /// `∇ℓ(w)`, one entry per formula. Objectives without an analytic
    /// gradient keep the default and get finite differences.
    fn gradient(&self, _weights: &Weights) -> OptResult<Weights> {
        Err(OptError::GradientNotImplemented)
    }

    /// How fixed-weight statistics read the evidence under these semantics.
    fn evidence_mode(&self) -> EvidenceMode {
        EvidenceMode::Hard
    }
}

impl<O: LearningObjective + ?Sized> LearningObjective for &O {
    fn log_likelihood(&self, weights: &Weights) -> OptResult<f64> {
        (**self).log_likelihood(weights)
    }

    fn gradient(&self, weights: &Weights) -> OptResult<Weights> {
        (**self).gradient(weights)
    }

    fn evidence_mode(&self) -> EvidenceMode {
        (**self).evidence_mode()
    }
}

impl<O: LearningObjective + ?Sized> LearningObjective for Box<O> {
    fn log_likelihood(&self, weights: &Weights) -> OptResult<f64> {
        (**self).log_likelihood(weights)
    }

    fn gradient(&self, weights: &Weights) -> OptResult<Weights> {
        (**self).gradient(weights)
    }

    fn evidence_mode(&self) -> EvidenceMode {
        (**self).evidence_mode()
    }
}

/// Reduced-space view of a [`LearningObjective`].
#[derive(Debug)]
pub struct ObjectiveAdapter<'a, O: ?Sized> {
    objective: &'a O,
    projector: &'a WeightProjector,
}

impl<'a, O: LearningObjective + ?Sized> ObjectiveAdapter<'a, O> {
    pub fn new(objective: &'a O, projector: &'a WeightProjector) -> Self {
        Self { objective, projector }
    }

    pub fn projector(&self) -> &WeightProjector {
        self.projector
    }

    /// `ℓ(expand(reduced))`.
    pub fn evaluate(&self, reduced: &Weights) -> LearnResult<f64> {
        let full = self.projector.expand(reduced)?;
        Ok(self.objective.log_likelihood(&full)?)
    }

    /// `project(∇ℓ(expand(reduced)))`.
    ///
    /// # Errors
    /// A full gradient of the wrong length is a
    /// [`LearnError::WeightLengthMismatch`] in [`WeightSpace::Full`].
    pub fn evaluate_gradient(&self, reduced: &Weights) -> LearnResult<Weights> {
        let full = self.projector.expand(reduced)?;
        let grad = self.objective.gradient(&full)?;
        if grad.len() != self.projector.n_formulas() {
            return Err(LearnError::WeightLengthMismatch {
                space: WeightSpace::Full,
                expected: self.projector.n_formulas(),
                found: grad.len(),
            });
        }
        Ok(self.projector.project(&grad)?.into_owned())
    }
}

impl<'a, O: LearningObjective + ?Sized> LogLikelihood for ObjectiveAdapter<'a, O> {
    fn value(&self, theta: &Theta) -> OptResult<f64> {
        Ok(self.evaluate(theta)?)
    }

    fn check(&self, theta: &Theta) -> OptResult<()> {
        if theta.len() != self.projector.n_free() {
            return Err(OptError::ParamDimMismatch {
                expected: self.projector.n_free(),
                found: theta.len(),
            });
        }
        validate_theta0(theta)
    }

    fn grad(&self, theta: &Theta) -> OptResult<Grad> {
        Ok(self.evaluate_gradient(theta)?)
    }
}
