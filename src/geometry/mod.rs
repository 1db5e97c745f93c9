mod axis;
mod cache;
mod cone_beam;
mod divergent;
mod fan_beam;

pub use axis::AxisOrientedGeometry;
pub use cache::{CacheValue, DerivedCache, DerivedKind};
pub use cone_beam::ConeBeamGeometry;
pub use divergent::{check_angle_params, det_to_src, det_to_src_batch, DivergentBeamGeometry};
pub use fan_beam::FanBeamGeometry;

use crate::detector::Detector;
use crate::domain::{IntervalProduct, SamplingGrid};
use crate::error::{GeometryError, Result};
use crate::math::{Matrix, Vector};

/// Trait for acquisition geometries.
///
/// A geometry is described by a detector, a domain of detector motion
/// parameters, a reference point function anchoring the detector's pose
/// for each motion parameter, and a rotation carrying the detector's
/// local frame into the fixed frame. Forward and back projection
/// operators consume geometries exclusively through this trait.
pub trait Geometry {
    /// Returns the number of dimensions of the ambient space (at least 1).
    fn ndim(&self) -> usize;

    /// Returns the motion parameter domain.
    fn motion_params(&self) -> &IntervalProduct;

    /// Returns the detector of this geometry.
    fn detector(&self) -> &dyn Detector;

    /// Maps a motion parameter to the detector reference point (for
    /// example the center of the detector surface) in the fixed frame.
    ///
    /// # Errors
    ///
    /// Returns an error if `mpar` has the wrong arity for this geometry.
    fn det_refpoint(&self, mpar: &[f64]) -> Result<Vector>;

    /// Maps a motion parameter to the rotation carrying the detector's
    /// local frame axes into the fixed frame.
    ///
    /// # Errors
    ///
    /// Returns an error if `mpar` has the wrong arity or is outside the
    /// motion parameter domain, where the implementation validates it.
    fn rotation_matrix(&self, mpar: &[f64]) -> Result<Matrix>;

    /// Returns the cache for derived values of this geometry.
    ///
    /// Projector implementations memoize expensive representations here,
    /// keyed by [`DerivedKind`]; the geometry itself assigns no meaning
    /// to the entries.
    fn cache(&self) -> &DerivedCache;

    /// Returns the sampling grid for the motion parameters, if any.
    fn motion_grid(&self) -> Option<&SamplingGrid> {
        None
    }

    /// Returns the detector parameter domain.
    fn det_params(&self) -> &IntervalProduct {
        self.detector().params()
    }

    /// Returns the sampling grid for the detector parameters, if any.
    fn det_grid(&self) -> Option<&SamplingGrid> {
        self.detector().param_grid()
    }

    /// Returns whether the motion parameters are sampled.
    fn has_motion_sampling(&self) -> bool {
        self.motion_grid().is_some()
    }

    /// Returns whether the detector parameters are sampled.
    fn has_det_sampling(&self) -> bool {
        self.det_grid().is_some()
    }

    /// Returns the joined motion and detector parameter domain, with the
    /// motion axes ordered first.
    fn params(&self) -> IntervalProduct {
        self.motion_params().append(self.det_params())
    }

    /// Returns the joined sampling grid for motion and detector
    /// parameters, or `None` unless both grids are present.
    ///
    /// Two regular grids join into a regular grid; any other combination
    /// yields a tensor grid.
    fn grid(&self) -> Option<SamplingGrid> {
        match (self.motion_grid(), self.det_grid()) {
            (Some(motion), Some(det)) => Some(motion.append(det)),
            _ => None,
        }
    }

    /// Returns the position of the detector point indexed by `dpar`, at
    /// motion parameter `mpar`:
    /// `det_refpoint(mpar) + rotation_matrix(mpar) * detector.surface(dpar)`.
    ///
    /// Domain membership of the parameters is not validated here.
    ///
    /// # Errors
    ///
    /// Propagates errors from the reference point, rotation, and surface
    /// evaluations.
    fn det_point_position(&self, mpar: &[f64], dpar: &[f64]) -> Result<Vector> {
        let refpoint = self.det_refpoint(mpar)?;
        let rotation = self.rotation_matrix(mpar)?;
        let surface = self.detector().surface(dpar)?;
        Ok(refpoint + rotation * surface)
    }

    /// Returns the vector pointing from the detector point indexed by
    /// `dpar` to the source, at motion parameter `mpar`; a unit vector
    /// when `normalized` is true.
    ///
    /// The base implementation fails unconditionally: a geometry without
    /// a meaningful ray direction (or with no finite source) must be
    /// given one by its concrete type, typically by delegating to
    /// [`det_to_src`](fn@crate::geometry::det_to_src).
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::RayDirectionUndefined`] unless
    /// overridden.
    fn det_to_src(&self, mpar: &[f64], dpar: &[f64], normalized: bool) -> Result<Vector> {
        let _ = (mpar, dpar, normalized);
        Err(GeometryError::RayDirectionUndefined.into())
    }
}

/// Extracts the single angle from a 1-dimensional motion parameter.
pub(crate) fn angle_of(mpar: &[f64]) -> Result<f64> {
    match mpar {
        [angle] => Ok(*angle),
        _ => Err(GeometryError::MotionParamShape {
            expected: 1,
            actual: mpar.len(),
        }
        .into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::TAU;

    use super::*;
    use crate::detector::Flat1dDetector;
    use crate::domain::{RegularGrid, TensorGrid};
    use crate::error::TomoError;
    use crate::math::Vector;

    /// Minimal geometry with no ray direction of its own.
    struct StaticGeometry {
        motion: IntervalProduct,
        motion_grid: Option<SamplingGrid>,
        detector: Flat1dDetector,
        cache: DerivedCache,
    }

    impl StaticGeometry {
        fn new(motion_grid: Option<SamplingGrid>, det_grid: Option<SamplingGrid>) -> Self {
            let detector = Flat1dDetector::new(
                IntervalProduct::interval(-1.0, 1.0).unwrap(),
                Vector::from_vec(vec![0.0, 1.0]),
                det_grid,
            )
            .unwrap();
            Self {
                motion: IntervalProduct::interval(0.0, TAU).unwrap(),
                motion_grid,
                detector,
                cache: DerivedCache::new(),
            }
        }
    }

    impl Geometry for StaticGeometry {
        fn ndim(&self) -> usize {
            2
        }

        fn motion_params(&self) -> &IntervalProduct {
            &self.motion
        }

        fn detector(&self) -> &dyn Detector {
            &self.detector
        }

        fn det_refpoint(&self, _mpar: &[f64]) -> Result<Vector> {
            Ok(Vector::from_vec(vec![0.0, -1.0]))
        }

        fn rotation_matrix(&self, _mpar: &[f64]) -> Result<Matrix> {
            Ok(Matrix::identity(2, 2))
        }

        fn cache(&self) -> &DerivedCache {
            &self.cache
        }

        fn motion_grid(&self) -> Option<&SamplingGrid> {
            self.motion_grid.as_ref()
        }
    }

    #[test]
    fn base_det_to_src_is_undefined() {
        let geom = StaticGeometry::new(None, None);
        let err = geom.det_to_src(&[0.0], &[0.0], true).unwrap_err();
        assert!(matches!(
            err,
            TomoError::Geometry(GeometryError::RayDirectionUndefined)
        ));
    }

    #[test]
    fn params_joins_motion_before_detector() {
        let geom = StaticGeometry::new(None, None);
        let params = geom.params();
        assert_eq!(
            params,
            IntervalProduct::new(vec![0.0, -1.0], vec![TAU, 1.0]).unwrap()
        );
    }

    #[test]
    fn det_point_position_applies_frame() {
        let geom = StaticGeometry::new(None, None);
        let pos = geom.det_point_position(&[0.0], &[0.5]).unwrap();
        assert!((pos[0] - 0.0).abs() < 1e-12);
        assert!((pos[1] - (-0.5)).abs() < 1e-12);
    }

    #[test]
    fn sampling_flags_follow_grids() {
        let geom = StaticGeometry::new(None, None);
        assert!(!geom.has_motion_sampling());
        assert!(!geom.has_det_sampling());
        assert!(geom.grid().is_none());

        let agrid = SamplingGrid::from(RegularGrid::new(vec![0.0], vec![TAU], vec![8]).unwrap());
        let dgrid = SamplingGrid::from(RegularGrid::new(vec![-1.0], vec![1.0], vec![4]).unwrap());
        let geom = StaticGeometry::new(Some(agrid), Some(dgrid));
        assert!(geom.has_motion_sampling());
        assert!(geom.has_det_sampling());
        let joined = geom.grid().unwrap();
        assert!(matches!(joined, SamplingGrid::Regular(_)));
        assert_eq!(joined.ndim(), 2);
    }

    #[test]
    fn mixed_grids_join_into_tensor() {
        let agrid = SamplingGrid::from(TensorGrid::new(vec![vec![0.0, 1.0, 3.0]]).unwrap());
        let dgrid = SamplingGrid::from(RegularGrid::new(vec![-1.0], vec![1.0], vec![4]).unwrap());
        let geom = StaticGeometry::new(Some(agrid), Some(dgrid));
        let joined = geom.grid().unwrap();
        assert!(matches!(joined, SamplingGrid::Tensor(_)));
    }
}
