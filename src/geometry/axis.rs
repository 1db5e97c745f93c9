use crate::domain::IntervalProduct;
use crate::error::{GeometryError, Result};
use crate::math::{Matrix3, Vector3, TOLERANCE};

/// Rotation about a fixed axis, for 3D geometries whose detector and
/// source move rigidly around one direction.
///
/// This is a rotation strategy, not a full geometry: a composing
/// geometry holds an instance and delegates its
/// [`Geometry::rotation_matrix`](super::Geometry::rotation_matrix) to
/// [`AxisOrientedGeometry::rotation_matrix`], passing its own motion
/// parameter domain for validation.
#[derive(Debug, Clone)]
pub struct AxisOrientedGeometry {
    axis: Vector3,
}

impl AxisOrientedGeometry {
    /// Creates a new axis-oriented rotation from a raw axis vector.
    ///
    /// The axis is normalized to unit length.
    ///
    /// # Errors
    ///
    /// Returns an error if the input does not have exactly 3 components
    /// or is zero-length.
    pub fn new(axis: &[f64]) -> Result<Self> {
        if axis.len() != 3 {
            return Err(GeometryError::AxisNotThreeDim { len: axis.len() }.into());
        }
        let axis = Vector3::new(axis[0], axis[1], axis[2]);
        let len = axis.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self { axis: axis / len })
    }

    /// Returns the normalized rotation axis.
    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        &self.axis
    }

    /// Returns the matrix rotating a vector by `angle` radians about the
    /// axis, following the right-hand rule.
    ///
    /// The matrix is computed with Rodrigues' rotation formula and is a
    /// proper rotation (orthogonal, determinant +1) for every angle.
    /// `motion_params` is the composing geometry's motion parameter
    /// domain; the angle must be contained in it.
    ///
    /// # Errors
    ///
    /// Returns an error if `angle` is outside `motion_params`.
    pub fn rotation_matrix(&self, angle: f64, motion_params: &IntervalProduct) -> Result<Matrix3> {
        if !motion_params.contains(&[angle]) {
            return Err(GeometryError::ParamOutOfDomain {
                name: "angle",
                value: vec![angle],
            }
            .into());
        }
        Ok(self.rodrigues(angle))
    }

    /// Rodrigues' formula: `cos*I + (1 - cos)*(a (x) a) + sin*K`, with
    /// `K` the skew-symmetric cross-product matrix of the axis.
    fn rodrigues(&self, angle: f64) -> Matrix3 {
        let axis = &self.axis;
        let cross_mat = Matrix3::new(
            0.0, -axis.z, axis.y,
            axis.z, 0.0, -axis.x,
            -axis.y, axis.x, 0.0,
        );
        let dy_mat = axis * axis.transpose();
        let id_mat = Matrix3::identity();
        let cos_ang = angle.cos();
        let sin_ang = angle.sin();

        id_mat * cos_ang + dy_mat * (1.0 - cos_ang) + cross_mat * sin_ang
    }
}
