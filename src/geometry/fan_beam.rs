use crate::detector::{Detector, Flat1dDetector};
use crate::domain::{IntervalProduct, SamplingGrid};
use crate::error::{GeometryError, Result};
use crate::math::{Matrix, Vector, TOLERANCE};

use super::divergent::{self, check_angle_params, DivergentBeamGeometry};
use super::{angle_of, DerivedCache, Geometry};

/// Fan beam geometry with a circular source orbit and a flat line
/// detector, in two dimensions.
///
/// At angle `theta` the source sits at `src_radius * (cos, sin)(theta)`
/// and the detector reference point at the antipode
/// `-det_radius * (cos, sin)(theta)`; the detector line is rotated with
/// the orbit, so its local axis stays tangential.
#[derive(Debug)]
pub struct FanBeamGeometry {
    angles: IntervalProduct,
    agrid: Option<SamplingGrid>,
    detector: Flat1dDetector,
    src_radius: f64,
    det_radius: f64,
    cache: DerivedCache,
}

impl FanBeamGeometry {
    /// Creates a new fan beam geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if the angle interval is not one-dimensional, a
    /// supplied angle grid is not contained in it, either radius is not
    /// positive, or the detector is not embedded in two dimensions.
    pub fn new(
        angles: IntervalProduct,
        detector: Flat1dDetector,
        src_radius: f64,
        det_radius: f64,
        agrid: Option<SamplingGrid>,
    ) -> Result<Self> {
        check_angle_params(&angles, agrid.as_ref())?;
        for radius in [src_radius, det_radius] {
            if radius < TOLERANCE {
                return Err(GeometryError::NonPositiveRadius { value: radius }.into());
            }
        }
        if detector.axis().len() != 2 {
            return Err(GeometryError::AmbientDimension {
                expected: 2,
                actual: detector.axis().len(),
            }
            .into());
        }
        Ok(Self {
            angles,
            agrid,
            detector,
            src_radius,
            det_radius,
            cache: DerivedCache::new(),
        })
    }

    /// Returns the radius of the source orbit.
    #[must_use]
    pub fn src_radius(&self) -> f64 {
        self.src_radius
    }

    /// Returns the distance from the rotation center to the detector
    /// reference point.
    #[must_use]
    pub fn det_radius(&self) -> f64 {
        self.det_radius
    }
}

impl Geometry for FanBeamGeometry {
    fn ndim(&self) -> usize {
        2
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
        Ok(Vector::from_vec(vec![
            -self.det_radius * angle.cos(),
            -self.det_radius * angle.sin(),
        ]))
    }

    fn rotation_matrix(&self, mpar: &[f64]) -> Result<Matrix> {
        let angle = angle_of(mpar)?;
        let (sin, cos) = angle.sin_cos();
        Ok(Matrix::from_row_slice(2, 2, &[cos, -sin, sin, cos]))
    }

    fn det_to_src(&self, mpar: &[f64], dpar: &[f64], normalized: bool) -> Result<Vector> {
        divergent::det_to_src(self, mpar, dpar, normalized)
    }
}

impl DivergentBeamGeometry for FanBeamGeometry {
    fn src_position(&self, mpar: &[f64]) -> Result<Vector> {
        let angle = angle_of(mpar)?;
        Ok(Vector::from_vec(vec![
            self.src_radius * angle.cos(),
            self.src_radius * angle.sin(),
        ]))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, TAU};

    use approx::assert_relative_eq;

    use super::*;
    use crate::domain::RegularGrid;
    use crate::error::TomoError;
    use crate::geometry::det_to_src_batch;

    fn tangential_detector() -> Flat1dDetector {
        Flat1dDetector::new(
            IntervalProduct::interval(-1.0, 1.0).unwrap(),
            Vector::from_vec(vec![0.0, 1.0]),
            None,
        )
        .unwrap()
    }

    fn geometry() -> FanBeamGeometry {
        FanBeamGeometry::new(
            IntervalProduct::interval(0.0, TAU).unwrap(),
            tangential_detector(),
            3.0,
            2.0,
            None,
        )
        .unwrap()
    }

    #[test]
    fn source_and_refpoint_are_antipodal() {
        let geom = geometry();
        let src = geom.src_position(&[FRAC_PI_2]).unwrap();
        let refpoint = geom.det_refpoint(&[FRAC_PI_2]).unwrap();
        assert_relative_eq!(src[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(src[1], 3.0, epsilon = 1e-12);
        assert_relative_eq!(refpoint[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(refpoint[1], -2.0, epsilon = 1e-12);
    }

    #[test]
    fn det_to_src_is_normalized() {
        let geom = geometry();
        for angle in [0.0, 0.7, FRAC_PI_2, 3.0] {
            for dpar in [-1.0, -0.2, 0.0, 0.9] {
                let vec = geom.det_to_src(&[angle], &[dpar], true).unwrap();
                assert_relative_eq!(vec.norm(), 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn unnormalized_ray_spans_source_to_detector() {
        let geom = geometry();
        // At angle 0 with dpar 0: source (3, 0), detector point (-2, 0).
        let vec = geom.det_to_src(&[0.0], &[0.0], false).unwrap();
        assert_relative_eq!(vec[0], 5.0, epsilon = 1e-12);
        assert_relative_eq!(vec[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn out_of_domain_parameters_are_rejected() {
        let geom = geometry();
        let err = geom.det_to_src(&[-1.0], &[0.0], true).unwrap_err();
        assert!(matches!(
            err,
            TomoError::Geometry(GeometryError::ParamOutOfDomain { name: "motion", .. })
        ));
        let err = geom.det_to_src(&[0.0], &[1.5], true).unwrap_err();
        assert!(matches!(
            err,
            TomoError::Geometry(GeometryError::ParamOutOfDomain {
                name: "detector",
                ..
            })
        ));
    }

    #[test]
    fn two_dimensional_angle_interval_is_rejected() {
        let square = IntervalProduct::new(vec![0.0, 0.0], vec![TAU, TAU]).unwrap();
        let err =
            FanBeamGeometry::new(square, tangential_detector(), 3.0, 2.0, None).unwrap_err();
        assert!(matches!(
            err,
            TomoError::Geometry(GeometryError::AngleIntervalNotOneDim { ndim: 2 })
        ));
    }

    #[test]
    fn angle_grid_outside_interval_is_rejected() {
        let angles = IntervalProduct::interval(0.0, 1.0).unwrap();
        let agrid =
            SamplingGrid::from(RegularGrid::new(vec![0.0], vec![2.0], vec![5]).unwrap());
        let err = FanBeamGeometry::new(angles, tangential_detector(), 3.0, 2.0, Some(agrid))
            .unwrap_err();
        assert!(matches!(
            err,
            TomoError::Geometry(GeometryError::GridNotInInterval)
        ));
    }

    #[test]
    fn motion_parameter_arity_is_checked() {
        let geom = geometry();
        let err = geom.det_refpoint(&[0.0, 1.0]).unwrap_err();
        assert!(matches!(
            err,
            TomoError::Geometry(GeometryError::MotionParamShape {
                expected: 1,
                actual: 2
            })
        ));
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        let angles = IntervalProduct::interval(0.0, TAU).unwrap();
        assert!(FanBeamGeometry::new(angles, tangential_detector(), 0.0, 2.0, None).is_err());
    }

    #[test]
    fn batch_rays_are_independently_normalized() {
        let geom = geometry();
        let rays = det_to_src_batch(&geom, &[0.0, 1.0, 2.0], &[0.5], true).unwrap();
        assert_eq!(rays.len(), 3);
        for ray in &rays {
            assert_relative_eq!(ray.norm(), 1.0, epsilon = 1e-12);
        }
        assert!(det_to_src_batch(&geom, &[0.0, -1.0], &[0.5], true).is_err());
    }

    #[test]
    fn params_is_the_product_domain() {
        let geom = geometry();
        assert_eq!(
            geom.params(),
            IntervalProduct::new(vec![0.0, -1.0], vec![TAU, 1.0]).unwrap()
        );
    }
}
