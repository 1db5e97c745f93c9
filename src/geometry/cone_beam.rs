use crate::detector::{Detector, Flat2dDetector};
use crate::domain::{IntervalProduct, SamplingGrid};
use crate::error::{GeometryError, Result};
use crate::math::{any_perpendicular, Matrix, Vector, Vector3, TOLERANCE};

use super::divergent::{self, check_angle_params, DivergentBeamGeometry};
use super::{angle_of, AxisOrientedGeometry, DerivedCache, Geometry};

/// Cone beam geometry with a circular source orbit about a fixed axis
/// and a flat panel detector, in three dimensions.
///
/// Rotation is delegated to an [`AxisOrientedGeometry`] strategy. The
/// orbit plane is perpendicular to the rotation axis; at angle zero the
/// source sits at `src_radius` along a reference direction in that
/// plane, with the detector reference point at the antipode.
#[derive(Debug)]
pub struct ConeBeamGeometry {
    angles: IntervalProduct,
    agrid: Option<SamplingGrid>,
    detector: Flat2dDetector,
    rotation: AxisOrientedGeometry,
    src_radius: f64,
    det_radius: f64,
    reference_dir: Vector3,
    cache: DerivedCache,
}

impl ConeBeamGeometry {
    /// Creates a new cone beam geometry rotating about `axis`.
    ///
    /// # Errors
    ///
    /// Returns an error if the angle interval is not one-dimensional, a
    /// supplied angle grid is not contained in it, either radius is not
    /// positive, or the axis is not a usable 3-element vector.
    pub fn new(
        angles: IntervalProduct,
        detector: Flat2dDetector,
        src_radius: f64,
        det_radius: f64,
        axis: &[f64],
        agrid: Option<SamplingGrid>,
    ) -> Result<Self> {
        check_angle_params(&angles, agrid.as_ref())?;
        for radius in [src_radius, det_radius] {
            if radius < TOLERANCE {
                return Err(GeometryError::NonPositiveRadius { value: radius }.into());
            }
        }
        let rotation = AxisOrientedGeometry::new(axis)?;
        let reference_dir = any_perpendicular(rotation.axis());
        Ok(Self {
            angles,
            agrid,
            detector,
            rotation,
            src_radius,
            det_radius,
            reference_dir,
            cache: DerivedCache::new(),
        })
    }

    /// Returns the normalized rotation axis.
    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        self.rotation.axis()
    }

    /// Returns the radius of the source orbit.
    #[must_use]
    pub fn src_radius(&self) -> f64 {
        self.src_radius
    }

    /// Returns the distance from the rotation axis to the detector
    /// reference point.
    #[must_use]
    pub fn det_radius(&self) -> f64 {
        self.det_radius
    }

    /// Rotates a point of the angle-zero configuration to `angle`.
    fn orbit_point(&self, angle: f64, radius: f64) -> Result<Vector> {
        let rot = self.rotation.rotation_matrix(angle, &self.angles)?;
        let point = rot * (self.reference_dir * radius);
        Ok(Vector::from_column_slice(point.as_slice()))
    }
}

impl Geometry for ConeBeamGeometry {
    fn ndim(&self) -> usize {
        3
    }

    fn motion_params(&self) -> &IntervalProduct {
        &self.angles
    }

    fn detector(&self) -> &dyn Detector {
        &self.detector
    }

    fn motion_grid(&self) -> Option<&SamplingGrid> {
        self.agrid.as_ref()
    }

    fn cache(&self) -> &DerivedCache {
        &self.cache
    }

    fn det_refpoint(&self, mpar: &[f64]) -> Result<Vector> {
        let angle = angle_of(mpar)?;
        self.orbit_point(angle, -self.det_radius)
    }

    fn rotation_matrix(&self, mpar: &[f64]) -> Result<Matrix> {
        let angle = angle_of(mpar)?;
        let rot = self.rotation.rotation_matrix(angle, &self.angles)?;
        Ok(Matrix::from_iterator(3, 3, rot.iter().copied()))
    }

    fn det_to_src(&self, mpar: &[f64], dpar: &[f64], normalized: bool) -> Result<Vector> {
        divergent::det_to_src(self, mpar, dpar, normalized)
    }
}

impl DivergentBeamGeometry for ConeBeamGeometry {
    fn src_position(&self, mpar: &[f64]) -> Result<Vector> {
        let angle = angle_of(mpar)?;
        self.orbit_point(angle, self.src_radius)
    }
}
