//! Interface to the MLN model the learner reads from.
//!
//! The learner never owns or mutates the model. It needs:
//! - the ordered formula sequence (count, current weights, labels),
//! - which formulas carry a fixed (analytically computed) weight,
//! - the groundings of a formula against the training database,
//! - the truth of a ground formula given the evidence, either hard (true or
//!   false) or as a soft degree in `[0, 1]`.
use crate::learning::{errors::ModelResult, types::Weights};

/// How ground-formula truth is read from the evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvidenceMode {
    /// Truth degree is 1.0 or 0.0.
    #[default]
    Hard,
    /// Truth degree is the model's soft degree in `[0, 1]`.
    Soft,
}

/// One grounding of a formula: the ground formula and the ground atoms it
/// references.
#[derive(Debug, Clone, PartialEq)]
pub struct Grounding<G> {
    pub formula: G,
    pub atoms: Vec<usize>,
}

impl<G> Grounding<G> {
    pub fn new(formula: G, atoms: Vec<usize>) -> Self {
        Self { formula, atoms }
    }
}

/// Iterator over the groundings of one formula.
pub type Groundings<'a, G> = Box<dyn Iterator<Item = ModelResult<Grounding<G>>> + 'a>;

/// Read-only view of a Markov logic network and its training database.
pub trait MarkovLogicNetwork {
    type GroundFormula;

    /// Number of formulas; valid indices are `0..formula_count()`.
    fn formula_count(&self) -> usize;

    /// Current weight of formula `index`.
    fn formula_weight(&self, index: usize) -> ModelResult<f64>;

    /// Indices of formulas whose weight is fixed from data.
    fn fixed_weight_formulas(&self) -> Vec<usize>;

    /// Human-readable formula text for logs and error messages.
    fn formula_label(&self, index: usize) -> String {
        format!("F#{index}")
    }

    /// Groundings of formula `index` against the training database.
    fn groundings(&self, index: usize) -> ModelResult<Groundings<'_, Self::GroundFormula>>;

    /// Whether `ground` is true given the evidence.
    fn is_true_given_evidence(&self, ground: &Self::GroundFormula) -> ModelResult<bool>;

    /// Soft truth degree of `ground`; defaults to the hard value.
    fn soft_truth_degree(&self, ground: &Self::GroundFormula) -> ModelResult<f64> {
        Ok(if self.is_true_given_evidence(ground)? { 1.0 } else { 0.0 })
    }

    /// Truth degree under the given evidence mode.
    fn truth_degree(&self, ground: &Self::GroundFormula, mode: EvidenceMode) -> ModelResult<f64> {
        match mode {
            EvidenceMode::Hard => {
                Ok(if self.is_true_given_evidence(ground)? { 1.0 } else { 0.0 })
            }
            EvidenceMode::Soft => self.soft_truth_degree(ground),
        }
    }

    /// All current formula weights in index order.
    fn current_weights(&self) -> ModelResult<Weights> {
        (0..self.formula_count()).map(|i| self.formula_weight(i)).collect()
    }
}
