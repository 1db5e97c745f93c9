use crate::error::{DomainError, Result};
use crate::math::TOLERANCE;

/// A tensor-product grid given by strictly increasing coordinate vectors,
/// one per axis.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorGrid {
    coord_vectors: Vec<Vec<f64>>,
}

impl TensorGrid {
    /// Creates a new tensor grid from per-axis coordinate vectors.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no axes, an axis is empty, or an
    /// axis is not strictly increasing.
    pub fn new(coord_vectors: Vec<Vec<f64>>) -> Result<Self> {
        if coord_vectors.is_empty() {
            return Err(DomainError::Empty.into());
        }
        for (axis, coords) in coord_vectors.iter().enumerate() {
            if coords.is_empty() {
                return Err(DomainError::EmptyAxis { axis }.into());
            }
            if coords.windows(2).any(|w| w[1] <= w[0]) {
                return Err(DomainError::NotIncreasing { axis }.into());
            }
        }
        Ok(Self { coord_vectors })
    }

    /// Returns the number of axes.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.coord_vectors.len()
    }

    /// Returns the per-axis coordinate vectors.
    #[must_use]
    pub fn coord_vectors(&self) -> &[Vec<f64>] {
        &self.coord_vectors
    }

    /// Returns the number of points along each axis.
    #[must_use]
    pub fn shape(&self) -> Vec<usize> {
        self.coord_vectors.iter().map(Vec::len).collect()
    }

    /// Returns the smallest coordinate along each axis.
    #[must_use]
    pub fn min_pt(&self) -> Vec<f64> {
        self.coord_vectors.iter().map(|c| c[0]).collect()
    }

    /// Returns the largest coordinate along each axis.
    #[must_use]
    pub fn max_pt(&self) -> Vec<f64> {
        self.coord_vectors.iter().map(|c| c[c.len() - 1]).collect()
    }
}

/// A uniformly spaced tensor grid, stored by its bounds and shape.
///
/// Endpoints are included: an axis with `n > 1` points spans
/// `[min, max]` with spacing `(max - min) / (n - 1)`. A one-point axis
/// requires `min == max`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularGrid {
    min_pt: Vec<f64>,
    max_pt: Vec<f64>,
    shape: Vec<usize>,
}

impl RegularGrid {
    /// Creates a new regular grid.
    ///
    /// # Errors
    ///
    /// Returns an error if the bounds and shape have mismatched lengths,
    /// an axis has no points or inverted bounds, or a one-point axis has
    /// distinct bounds.
    pub fn new(min_pt: Vec<f64>, max_pt: Vec<f64>, shape: Vec<usize>) -> Result<Self> {
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
        if shape.len() != min_pt.len() {
            return Err(DomainError::ShapeMismatch {
                expected: min_pt.len(),
                actual: shape.len(),
            }
            .into());
        }
        for (axis, ((&min, &max), &n)) in min_pt.iter().zip(&max_pt).zip(&shape).enumerate() {
            if n == 0 {
                return Err(DomainError::EmptyAxis { axis }.into());
            }
            if min > max {
                return Err(DomainError::InvalidBounds { axis, min, max }.into());
            }
            // A one-point axis must be flat; a multi-point axis must not be,
            // or the expanded coordinates would repeat.
            let extent = max - min;
            if (n == 1 && extent > TOLERANCE) || (n > 1 && extent < TOLERANCE) {
                return Err(DomainError::DegenerateAxis { axis, n, min, max }.into());
            }
        }
        Ok(Self {
            min_pt,
            max_pt,
            shape,
        })
    }

    /// Returns the number of axes.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.min_pt.len()
    }

    /// Returns the number of points along each axis.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
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

    /// Expands the grid into an explicit [`TensorGrid`].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_tensor(&self) -> TensorGrid {
        let coord_vectors = self
            .min_pt
            .iter()
            .zip(&self.max_pt)
            .zip(&self.shape)
            .map(|((&min, &max), &n)| {
                if n == 1 {
                    vec![min]
                } else {
                    let step = (max - min) / (n - 1) as f64;
                    (0..n).map(|i| min + step * i as f64).collect()
                }
            })
            .collect();
        // Coordinates are strictly increasing by construction.
        TensorGrid { coord_vectors }
    }
}

/// A rectilinear sampling grid over a parameter domain.
///
/// Composition via [`SamplingGrid::append`] keeps the regular
/// representation when both operands are regular and falls back to an
/// explicit tensor grid otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingGrid {
    /// Uniformly spaced grid.
    Regular(RegularGrid),
    /// General tensor-product grid.
    Tensor(TensorGrid),
}

impl SamplingGrid {
    /// Returns the number of axes.
    #[must_use]
    pub fn ndim(&self) -> usize {
        match self {
            SamplingGrid::Regular(g) => g.ndim(),
            SamplingGrid::Tensor(g) => g.ndim(),
        }
    }

    /// Returns the smallest coordinate along each axis.
    #[must_use]
    pub fn min_pt(&self) -> Vec<f64> {
        match self {
            SamplingGrid::Regular(g) => g.min_pt().to_vec(),
            SamplingGrid::Tensor(g) => g.min_pt(),
        }
    }

    /// Returns the largest coordinate along each axis.
    #[must_use]
    pub fn max_pt(&self) -> Vec<f64> {
        match self {
            SamplingGrid::Regular(g) => g.max_pt().to_vec(),
            SamplingGrid::Tensor(g) => g.max_pt(),
        }
    }

    /// Returns the per-axis coordinate vectors.
    #[must_use]
    pub fn coord_vectors(&self) -> Vec<Vec<f64>> {
        match self {
            SamplingGrid::Regular(g) => g.to_tensor().coord_vectors().to_vec(),
            SamplingGrid::Tensor(g) => g.coord_vectors().to_vec(),
        }
    }

    /// Joins `self` and `other` into one grid, with the axes of `self`
    /// ordered first.
    ///
    /// Two regular grids compose into a regular grid; any other
    /// combination yields a tensor grid.
    #[must_use]
    pub fn append(&self, other: &SamplingGrid) -> SamplingGrid {
        match (self, other) {
            (SamplingGrid::Regular(a), SamplingGrid::Regular(b)) => {
                let mut min_pt = a.min_pt().to_vec();
                let mut max_pt = a.max_pt().to_vec();
                let mut shape = a.shape().to_vec();
                min_pt.extend_from_slice(b.min_pt());
                max_pt.extend_from_slice(b.max_pt());
                shape.extend_from_slice(b.shape());
                SamplingGrid::Regular(RegularGrid {
                    min_pt,
                    max_pt,
                    shape,
                })
            }
            _ => {
                let mut coord_vectors = self.coord_vectors();
                coord_vectors.extend(other.coord_vectors());
                SamplingGrid::Tensor(TensorGrid { coord_vectors })
            }
        }
    }
}

impl From<RegularGrid> for SamplingGrid {
    fn from(grid: RegularGrid) -> Self {
        SamplingGrid::Regular(grid)
    }
}

impl From<TensorGrid> for SamplingGrid {
    fn from(grid: TensorGrid) -> Self {
        SamplingGrid::Tensor(grid)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn regular_grid_expands_with_endpoints() {
        let grid = RegularGrid::new(vec![0.0], vec![1.0], vec![5]).unwrap();
        let tensor = grid.to_tensor();
        let coords = &tensor.coord_vectors()[0];
        assert_eq!(coords.len(), 5);
        assert_relative_eq!(coords[0], 0.0);
        assert_relative_eq!(coords[2], 0.5);
        assert_relative_eq!(coords[4], 1.0);
    }

    #[test]
    fn tensor_grid_rejects_unsorted_axes() {
        assert!(TensorGrid::new(vec![vec![0.0, 2.0, 1.0]]).is_err());
        assert!(TensorGrid::new(vec![vec![0.0, 0.0]]).is_err());
        assert!(TensorGrid::new(vec![vec![]]).is_err());
        assert!(TensorGrid::new(vec![]).is_err());
    }

    #[test]
    fn regular_append_regular_stays_regular() {
        let a = SamplingGrid::from(RegularGrid::new(vec![0.0], vec![1.0], vec![3]).unwrap());
        let b = SamplingGrid::from(RegularGrid::new(vec![-1.0], vec![1.0], vec![5]).unwrap());
        let joined = a.append(&b);
        assert!(matches!(joined, SamplingGrid::Regular(_)));
        assert_eq!(joined.ndim(), 2);
        assert_eq!(joined.min_pt(), vec![0.0, -1.0]);
        assert_eq!(joined.max_pt(), vec![1.0, 1.0]);
    }

    #[test]
    fn mixed_append_falls_back_to_tensor() {
        let a = SamplingGrid::from(RegularGrid::new(vec![0.0], vec![1.0], vec![3]).unwrap());
        let b = SamplingGrid::from(TensorGrid::new(vec![vec![-1.0, 0.3, 1.0]]).unwrap());
        let joined = a.append(&b);
        assert!(matches!(joined, SamplingGrid::Tensor(_)));
        let coords = joined.coord_vectors();
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[1], vec![-1.0, 0.3, 1.0]);
    }

    #[test]
    fn one_point_axis_requires_equal_bounds() {
        assert!(RegularGrid::new(vec![0.0], vec![1.0], vec![1]).is_err());
        assert!(RegularGrid::new(vec![0.5], vec![0.5], vec![1]).is_ok());
    }

    #[test]
    fn flat_axis_with_multiple_points_is_rejected() {
        assert!(RegularGrid::new(vec![0.0], vec![0.0], vec![3]).is_err());

        // Any accepted regular grid expands to coordinates that satisfy
        // the tensor grid invariant.
        let grid = RegularGrid::new(vec![0.0], vec![1.0], vec![3]).unwrap();
        assert!(TensorGrid::new(grid.to_tensor().coord_vectors().to_vec()).is_ok());
    }
}
