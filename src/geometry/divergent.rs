use crate::domain::{IntervalProduct, SamplingGrid};
use crate::error::{GeometryError, Result};
use crate::math::{Vector, TOLERANCE};

use super::Geometry;

/// Trait for divergent beam geometries.
///
/// A divergent beam geometry is characterized by a point source and an
/// (n-1)-dimensional detector moving according to a one-dimensional
/// motion parameter. Fan beam in 2D and cone beam in 3D are the usual
/// cases.
///
/// Implementors supply the source position; the default ray direction is
/// computed by [`det_to_src`], to which concrete types delegate their
/// [`Geometry::det_to_src`] override.
pub trait DivergentBeamGeometry: Geometry {
    /// Maps a motion parameter to the source position in the fixed frame.
    ///
    /// # Errors
    ///
    /// Returns an error if `mpar` has the wrong arity for this geometry.
    fn src_position(&self, mpar: &[f64]) -> Result<Vector>;
}

/// Validates the angle parameters of a divergent beam geometry.
///
/// Every divergent beam constructor calls this with its angle interval
/// and optional angle grid.
///
/// # Errors
///
/// Returns an error if the angle interval is not exactly one-dimensional,
/// or if a supplied grid is not one-dimensional or not contained in the
/// interval.
pub fn check_angle_params(
    angle_intvl: &IntervalProduct,
    agrid: Option<&SamplingGrid>,
) -> Result<()> {
    if angle_intvl.ndim() != 1 {
        return Err(GeometryError::AngleIntervalNotOneDim {
            ndim: angle_intvl.ndim(),
        }
        .into());
    }
    if let Some(grid) = agrid {
        if !angle_intvl.contains_set(grid) {
            return Err(GeometryError::GridNotInInterval.into());
        }
    }
    Ok(())
}

/// Vector pointing from the detector point indexed by `dpar` to the
/// source, at motion parameter `mpar`.
///
/// This is the default ray direction of divergent beam geometries,
/// computed from [`DivergentBeamGeometry::src_position`] and
/// [`Geometry::det_point_position`]. When `normalized` is true the
/// result is scaled to unit Euclidean norm.
///
/// # Errors
///
/// Returns an error if `mpar` is outside the motion parameter domain,
/// `dpar` is outside the detector parameter domain, or the source
/// coincides with the detector point while normalizing.
pub fn det_to_src<G>(geometry: &G, mpar: &[f64], dpar: &[f64], normalized: bool) -> Result<Vector>
where
    G: DivergentBeamGeometry + ?Sized,
{
    if !geometry.motion_params().contains(mpar) {
        return Err(GeometryError::ParamOutOfDomain {
            name: "motion",
            value: mpar.to_vec(),
        }
        .into());
    }
    if !geometry.det_params().contains(dpar) {
        return Err(GeometryError::ParamOutOfDomain {
            name: "detector",
            value: dpar.to_vec(),
        }
        .into());
    }

    let mut vec = geometry.src_position(mpar)? - geometry.det_point_position(mpar, dpar)?;

    if normalized {
        let norm = vec.norm();
        if norm < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        vec /= norm;
    }

    Ok(vec)
}

/// Element-wise variant of [`det_to_src`] over a sequence of angles.
///
/// Each angle is validated and, when `normalized` is true, normalized
/// independently; the result holds one vector per angle in order.
///
/// # Errors
///
/// Fails on the first angle for which [`det_to_src`] fails.
pub fn det_to_src_batch<G>(
    geometry: &G,
    angles: &[f64],
    dpar: &[f64],
    normalized: bool,
) -> Result<Vec<Vector>>
where
    G: DivergentBeamGeometry + ?Sized,
{
    angles
        .iter()
        .map(|&angle| det_to_src(geometry, &[angle], dpar, normalized))
        .collect()
}
