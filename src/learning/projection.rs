//! Fixed/free partition of the formula weights.
//!
//! Purpose
//! -------
//! Map between the **full** weight vector (one entry per formula, which is
//! what objectives understand) and the **reduced** vector (free formulas
//! only, which is what the optimizer moves).
//!
//! Invariants
//! ----------
//! - Free indices are stored in ascending order; reduced slot `k` always
//!   belongs to the `k`-th free formula.
//! - `project(expand(r)) == r` for every reduced `r` of the right length.
//! - `expand(project(v)) == v` only when `v` already carries the fixed
//!   values at the fixed indices.
//! - Fixed values are copied into the full vector verbatim, so they never
//!   drift during optimization.
//! - With no fixed formulas both directions borrow their input unchanged.
use std::{borrow::Cow, collections::BTreeMap};

use crate::learning::{
    errors::{LearnError, LearnResult, WeightSpace},
    types::Weights,
};

/// Precomputed weights of fixed-weight formulas, keyed by formula index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixedWeights {
    values: BTreeMap<usize, f64>,
}

impl FixedWeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(&index).copied()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.values.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(index, weight)` pairs in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values.iter().map(|(&i, &w)| (i, w))
    }

    pub(crate) fn insert(&mut self, index: usize, weight: f64) {
        self.values.insert(index, weight);
    }
}

impl FromIterator<(usize, f64)> for FixedWeights {
    fn from_iter<T: IntoIterator<Item = (usize, f64)>>(iter: T) -> Self {
        Self { values: iter.into_iter().collect() }
    }
}

/// Bidirectional full ⇄ reduced mapping for one learning run.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightProjector {
    n_formulas: usize,
    fixed: FixedWeights,
    free: Vec<usize>,
}

impl WeightProjector {
    /// Build the partition for `n_formulas` formulas.
    ///
    /// # Errors
    /// [`LearnError::FixedIndexOutOfRange`] if a fixed index is not a formula.
    pub fn new(n_formulas: usize, fixed: FixedWeights) -> LearnResult<Self> {
        if let Some((index, _)) = fixed.iter().find(|&(i, _)| i >= n_formulas) {
            return Err(LearnError::FixedIndexOutOfRange { index, n_formulas });
        }
        let free = (0..n_formulas).filter(|&i| !fixed.contains(i)).collect();
        Ok(Self { n_formulas, fixed, free })
    }

    pub fn n_formulas(&self) -> usize {
        self.n_formulas
    }

    pub fn n_free(&self) -> usize {
        self.free.len()
    }

    pub fn fixed(&self) -> &FixedWeights {
        &self.fixed
    }

    /// Free formula indices in ascending order.
    pub fn free_indices(&self) -> &[usize] {
        &self.free
    }

    /// True when nothing is fixed and both mappings are the identity.
    pub fn is_identity(&self) -> bool {
        self.fixed.is_empty()
    }

    /// Reduced → full: fixed slots take their stored value, free slots
    /// consume `reduced` in order.
    ///
    /// # Errors
    /// [`LearnError::WeightLengthMismatch`] unless `reduced.len() == n_free()`.
    pub fn expand<'v>(&self, reduced: &'v Weights) -> LearnResult<Cow<'v, Weights>> {
        check_len(WeightSpace::Reduced, self.free.len(), reduced.len())?;
        if self.is_identity() {
            return Ok(Cow::Borrowed(reduced));
        }
        let mut full = Weights::zeros(self.n_formulas);
        for (index, weight) in self.fixed.iter() {
            full[index] = weight;
        }
        for (&index, &weight) in self.free.iter().zip(reduced.iter()) {
            full[index] = weight;
        }
        Ok(Cow::Owned(full))
    }

    /// Full → reduced: drop the fixed slots.
    ///
    /// # Errors
    /// [`LearnError::WeightLengthMismatch`] unless `full.len() == n_formulas()`.
    pub fn project<'v>(&self, full: &'v Weights) -> LearnResult<Cow<'v, Weights>> {
        check_len(WeightSpace::Full, self.n_formulas, full.len())?;
        if self.is_identity() {
            return Ok(Cow::Borrowed(full));
        }
        Ok(Cow::Owned(self.free.iter().map(|&i| full[i]).collect()))
    }
}

fn check_len(space: WeightSpace, expected: usize, found: usize) -> LearnResult<()> {
    if expected != found {
        return Err(LearnError::WeightLengthMismatch { space, expected, found });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn projector(n: usize, fixed: &[(usize, f64)]) -> WeightProjector {
        WeightProjector::new(n, fixed.iter().copied().collect()).expect("valid partition")
    }

    #[test]
    // Purpose
    // -------
    // `expand` interleaves fixed values and reduced entries by index.
    //
    // Given
    // -----
    // - 5 formulas, F#1 = -0.5 and F#3 = 2.0 fixed.
    // - Reduced vector (10, 20, 30).
    //
    // Expect
    // ------
    // - Full vector (10, -0.5, 20, 2.0, 30).
    fn expand_interleaves_fixed_and_free_entries() {
        // Arrange
        let p = projector(5, &[(1, -0.5), (3, 2.0)]);

        // Act
        let free = array![10.0, 20.0, 30.0];
        let full = p.expand(&free).expect("expand should succeed");

        // Assert
        assert_eq!(full.into_owned(), array![10.0, -0.5, 20.0, 2.0, 30.0]);
        assert_eq!(p.free_indices(), &[0, 2, 4]);
    }

    #[test]
    // Purpose
    // -------
    // `project` is an exact left inverse of `expand`, and the full round
    // trip is idempotent on the free subspace.
    //
    // Given
    // -----
    // - Several partitions of 6 formulas (none, some, all but one fixed).
    //
    // Expect
    // ------
    // - project(expand(r)) == r bitwise.
    // - project(expand(project(v))) == project(v) for an arbitrary v.
    fn project_is_left_inverse_of_expand() {
        let partitions: &[&[(usize, f64)]] =
            &[&[], &[(0, 0.25)], &[(2, -1.0), (5, 3.5)], &[(0, 1.0), (1, 1.0), (2, 1.0), (4, 1.0), (5, 1.0)]];
        for fixed in partitions {
            // Arrange
            let p = projector(6, fixed);
            let r: Weights = (0..p.n_free()).map(|k| 0.1 * k as f64 - 0.37).collect();
            let v = array![1.5, -2.25, 0.0, 7.0, -0.125, 3.0];

            // Act
            let full = p.expand(&r).expect("expand should succeed").into_owned();
            let back = p.project(&full).expect("project should succeed").into_owned();
            let pv = p.project(&v).expect("project should succeed").into_owned();
            let round = p
                .project(&p.expand(&pv).expect("expand should succeed"))
                .expect("project should succeed")
                .into_owned();

            // Assert
            assert_eq!(back, r);
            assert_eq!(round, pv);
            for (index, weight) in p.fixed().iter() {
                assert_eq!(full[index].to_bits(), weight.to_bits());
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // With nothing fixed both directions are identity and borrow the input.
    fn empty_fixed_set_is_borrowed_identity() {
        // Arrange
        let p = projector(3, &[]);
        let v = array![1.0, 2.0, 3.0];

        // Act
        let expanded = p.expand(&v).expect("expand should succeed");
        let projected = p.project(&v).expect("project should succeed");

        // Assert
        assert!(matches!(expanded, Cow::Borrowed(_)));
        assert!(matches!(projected, Cow::Borrowed(_)));
        assert_eq!(*expanded, v);
        assert_eq!(*projected, v);
    }

    #[test]
    // Purpose
    // -------
    // Length violations fail loudly in both directions.
    //
    // Expect
    // ------
    // - Too short and too long reduced vectors are rejected.
    // - A full vector of the wrong length is rejected.
    fn wrong_lengths_are_rejected() {
        let p = projector(4, &[(2, 0.0)]);
        assert_eq!(
            p.expand(&array![1.0, 2.0]),
            Err(LearnError::WeightLengthMismatch {
                space: WeightSpace::Reduced,
                expected: 3,
                found: 2
            })
        );
        assert!(p.expand(&array![1.0, 2.0, 3.0, 4.0]).is_err());
        assert_eq!(
            p.project(&array![1.0, 2.0, 3.0]),
            Err(LearnError::WeightLengthMismatch { space: WeightSpace::Full, expected: 4, found: 3 })
        );
    }

    #[test]
    fn fixed_index_outside_model_is_rejected() {
        let fixed: FixedWeights = [(3, 1.0)].into_iter().collect();
        assert_eq!(
            WeightProjector::new(3, fixed),
            Err(LearnError::FixedIndexOutOfRange { index: 3, n_formulas: 3 })
        );
    }
}
