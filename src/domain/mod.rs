mod grid;

pub use grid::{RegularGrid, SamplingGrid, TensorGrid};

use crate::error::{DomainError, Result};
use crate::math::TOLERANCE;

/// An axis-aligned product of closed intervals `[min_i, max_i]`.
///
/// Parameter domains for both detector motion and detector surface
/// coordinates are interval products. Membership tests use a small
/// tolerance so boundary values sampled by grids are not rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalProduct {
    min_pt: Vec<f64>,
    max_pt: Vec<f64>,
}

impl IntervalProduct {
    /// Creates a new interval product from per-axis bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if the bound vectors are empty, have different
    /// lengths, or any axis has `min > max`.
    pub fn new(min_pt: Vec<f64>, max_pt: Vec<f64>) -> Result<Self> {
        if min_pt.is_empty() {
            return Err(DomainError::Empty.into());
        }
        if min_pt.len() != max_pt.len() {
            return Err(DomainError::BoundsMismatch {
                min_len: min_pt.len(),
                max_len: max_pt.len(),
            }
            .into());
        }
        for (axis, (&min, &max)) in min_pt.iter().zip(&max_pt).enumerate() {
            if min > max {
                return Err(DomainError::InvalidBounds { axis, min, max }.into());
            }
        }
        Ok(Self { min_pt, max_pt })
    }

    /// Creates a one-dimensional interval `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `min > max`.
    pub fn interval(min: f64, max: f64) -> Result<Self> {
        Self::new(vec![min], vec![max])
    }

    /// Returns the number of axes.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.min_pt.len()
    }

    /// Returns the per-axis lower bounds.
    #[must_use]
    pub fn min_pt(&self) -> &[f64] {
        &self.min_pt
    }

    /// Returns the per-axis upper bounds.
    #[must_use]
    pub fn max_pt(&self) -> &[f64] {
        &self.max_pt
    }

    /// Tests whether `point` lies in the domain.
    ///
    /// A point with the wrong number of components is never contained.
    #[must_use]
    pub fn contains(&self, point: &[f64]) -> bool {
        point.len() == self.ndim()
            && point.iter().zip(&self.min_pt).zip(&self.max_pt).all(
                |((&x, &min), &max)| x >= min - TOLERANCE && x <= max + TOLERANCE,
            )
    }

    /// Tests whether every point of `grid` lies in the domain.
    ///
    /// Grids are rectilinear, so checking the per-axis extremes suffices.
    #[must_use]
    pub fn contains_set(&self, grid: &SamplingGrid) -> bool {
        grid.ndim() == self.ndim()
            && self.contains(&grid.min_pt())
            && self.contains(&grid.max_pt())
    }

    /// Returns the product of `self` and `other`, with the axes of `self`
    /// ordered first.
    #[must_use]
    pub fn append(&self, other: &IntervalProduct) -> IntervalProduct {
        let mut min_pt = self.min_pt.clone();
        let mut max_pt = self.max_pt.clone();
        min_pt.extend_from_slice(&other.min_pt);
        max_pt.extend_from_slice(&other.max_pt);
        IntervalProduct { min_pt, max_pt }
    }
}
