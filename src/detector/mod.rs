use crate::domain::{IntervalProduct, SamplingGrid};
use crate::error::{DetectorError, Result};
use crate::math::{Vector, TOLERANCE};

/// Trait for detectors used by acquisition geometries.
///
/// A detector exposes the domain of its surface parameters, an optional
/// sampling of that domain, and the map from a surface parameter to a
/// point on the detector surface in the detector's local frame.
pub trait Detector {
    /// Returns the detector parameter domain.
    fn params(&self) -> &IntervalProduct;

    /// Returns the sampling grid for the detector parameters, if any.
    fn param_grid(&self) -> Option<&SamplingGrid>;

    /// Maps a detector parameter to a point on the detector surface,
    /// expressed in the detector's local frame and embedded in the
    /// ambient space of the owning geometry.
    ///
    /// Only the parameter arity is checked here; domain membership is
    /// validated by callers that require it.
    ///
    /// # Errors
    ///
    /// Returns an error if `dpar` has the wrong number of components.
    fn surface(&self, dpar: &[f64]) -> Result<Vector>;
}

/// A flat line detector spanned by a single unit axis vector.
///
/// The surface point for parameter `s` is `s * axis`.
#[derive(Debug, Clone)]
pub struct Flat1dDetector {
    params: IntervalProduct,
    axis: Vector,
    param_grid: Option<SamplingGrid>,
}

impl Flat1dDetector {
    /// Creates a new line detector.
    ///
    /// The axis is normalized; its length fixes the ambient dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter domain is not one-dimensional,
    /// the axis is shorter than two components or zero-length, or a
    /// supplied grid is not contained in the parameter domain.
    pub fn new(
        params: IntervalProduct,
        axis: Vector,
        param_grid: Option<SamplingGrid>,
    ) -> Result<Self> {
        if params.ndim() != 1 {
            return Err(DetectorError::DomainDimension {
                expected: 1,
                actual: params.ndim(),
            }
            .into());
        }
        if axis.len() < 2 {
            return Err(DetectorError::DegenerateAxes.into());
        }
        let len = axis.norm();
        if len < TOLERANCE {
            return Err(DetectorError::DegenerateAxes.into());
        }
        if let Some(grid) = &param_grid {
            if !params.contains_set(grid) {
                return Err(DetectorError::GridNotInParams.into());
            }
        }
        Ok(Self {
            params,
            axis: axis / len,
            param_grid,
        })
    }

    /// Returns the unit axis spanning the detector line.
    #[must_use]
    pub fn axis(&self) -> &Vector {
        &self.axis
    }
}

impl Detector for Flat1dDetector {
    fn params(&self) -> &IntervalProduct {
        &self.params
    }

    fn param_grid(&self) -> Option<&SamplingGrid> {
        self.param_grid.as_ref()
    }

    fn surface(&self, dpar: &[f64]) -> Result<Vector> {
        if dpar.len() != 1 {
            return Err(DetectorError::ParamShape {
                expected: 1,
                actual: dpar.len(),
            }
            .into());
        }
        Ok(&self.axis * dpar[0])
    }
}

/// A flat panel detector spanned by two orthonormal axis vectors in 3D.
///
/// The surface point for parameters `(u, v)` is `u * axes[0] + v * axes[1]`.
#[derive(Debug, Clone)]
pub struct Flat2dDetector {
    params: IntervalProduct,
    axes: [Vector; 2],
    param_grid: Option<SamplingGrid>,
}

impl Flat2dDetector {
    /// Creates a new flat panel detector.
    ///
    /// Both axes are normalized and must be three-dimensional and not
    /// parallel to each other.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter domain is not two-dimensional,
    /// the axes are degenerate, or a supplied grid is not contained in
    /// the parameter domain.
    pub fn new(
        params: IntervalProduct,
        axes: [Vector; 2],
        param_grid: Option<SamplingGrid>,
    ) -> Result<Self> {
        if params.ndim() != 2 {
            return Err(DetectorError::DomainDimension {
                expected: 2,
                actual: params.ndim(),
            }
            .into());
        }
        let [a0, a1] = axes;
        if a0.len() != 3 || a1.len() != 3 {
            return Err(DetectorError::DegenerateAxes.into());
        }
        let (len0, len1) = (a0.norm(), a1.norm());
        if len0 < TOLERANCE || len1 < TOLERANCE {
            return Err(DetectorError::DegenerateAxes.into());
        }
        let a0 = a0 / len0;
        let a1 = a1 / len1;
        if a0.dot(&a1).abs() > 1.0 - TOLERANCE {
            return Err(DetectorError::DegenerateAxes.into());
        }
        if let Some(grid) = &param_grid {
            if !params.contains_set(grid) {
                return Err(DetectorError::GridNotInParams.into());
            }
        }
        Ok(Self {
            params,
            axes: [a0, a1],
            param_grid,
        })
    }

    /// Returns the unit axes spanning the detector plane.
    #[must_use]
    pub fn axes(&self) -> &[Vector; 2] {
        &self.axes
    }
}

impl Detector for Flat2dDetector {
    fn params(&self) -> &IntervalProduct {
        &self.params
    }

    fn param_grid(&self) -> Option<&SamplingGrid> {
        self.param_grid.as_ref()
    }

    fn surface(&self, dpar: &[f64]) -> Result<Vector> {
        if dpar.len() != 2 {
            return Err(DetectorError::ParamShape {
                expected: 2,
                actual: dpar.len(),
            }
            .into());
        }
        Ok(&self.axes[0] * dpar[0] + &self.axes[1] * dpar[1])
    }
}
