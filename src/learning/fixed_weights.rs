//! Analytic weights for fixed-weight formulas.
//!
//! For a fixed-weight formula with `Z` groundings against the training
//! database and satisfaction mass `c = Σ truth degree`, the weight is
//! `ln(c / Z)`. Truth degrees are 1/0 under hard evidence and the model's
//! soft degree under soft evidence.
//!
//! `Z = 0` and `c = 0` both leave the logarithm undefined or infinite and are
//! reported as [`LearnError::DegenerateStatistics`] naming the formula.
use crate::learning::{
    errors::{LearnError, LearnResult},
    model::{EvidenceMode, MarkovLogicNetwork},
    projection::FixedWeights,
};

/// Satisfaction counts of one formula over its groundings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatisfactionStats {
    pub groundings: usize,
    pub satisfied: f64,
}

impl SatisfactionStats {
    /// Fraction of satisfied groundings, `c / Z`.
    pub fn ratio(&self) -> f64 {
        self.satisfied / self.groundings as f64
    }
}

/// Sum truth degrees over the groundings of formula `index`.
///
/// # Errors
/// - Model errors while grounding or reading evidence, unmodified.
/// - [`LearnError::InvalidTruthDegree`] for a degree outside `[0, 1]`.
pub fn satisfaction_stats<M: MarkovLogicNetwork + ?Sized>(
    model: &M, index: usize, mode: EvidenceMode,
) -> LearnResult<SatisfactionStats> {
    let mut stats = SatisfactionStats { groundings: 0, satisfied: 0.0 };
    for grounding in model.groundings(index)? {
        let grounding = grounding?;
        let degree = model.truth_degree(&grounding.formula, mode)?;
        if !(0.0..=1.0).contains(&degree) {
            return Err(LearnError::InvalidTruthDegree { formula: index, value: degree });
        }
        stats.groundings += 1;
        stats.satisfied += degree;
    }
    Ok(stats)
}

/// Compute `ln(c / Z)` for every fixed-weight formula of `model`.
///
/// # Errors
/// - [`LearnError::DegenerateStatistics`] when a formula has no groundings
///   or no satisfaction mass.
/// - Everything [`satisfaction_stats`] can return.
pub fn compute_fixed_weights<M: MarkovLogicNetwork + ?Sized>(
    model: &M, mode: EvidenceMode,
) -> LearnResult<FixedWeights> {
    let mut fixed = FixedWeights::new();
    for index in model.fixed_weight_formulas() {
        let stats = satisfaction_stats(model, index, mode)?;
        let weight = fixed_weight(model, index, stats)?;
        log::debug!(
            "fixed weight: {weight:.6}=ln({:.6}) F#{index} {}",
            stats.ratio(),
            model.formula_label(index)
        );
        fixed.insert(index, weight);
    }
    Ok(fixed)
}

fn fixed_weight<M: MarkovLogicNetwork + ?Sized>(
    model: &M, index: usize, stats: SatisfactionStats,
) -> LearnResult<f64> {
    let degenerate = |reason| LearnError::DegenerateStatistics {
        formula: index,
        label: model.formula_label(index),
        groundings: stats.groundings,
        satisfied: stats.satisfied,
        reason,
    };
    if stats.groundings == 0 {
        return Err(degenerate("formula has no groundings in the training database"));
    }
    if stats.satisfied <= 0.0 {
        return Err(degenerate("no grounding is satisfied, ln(0) is -infinity"));
    }
    Ok(stats.ratio().ln())
}
