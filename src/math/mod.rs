/// Dynamically sized vector, used for points and directions in the
/// `ndim`-dimensional ambient space of a geometry.
pub type Vector = nalgebra::DVector<f64>;

/// Dynamically sized square matrix, used for `ndim` x `ndim` rotations.
pub type Matrix = nalgebra::DMatrix<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 3x3 matrix type.
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Returns a unit vector perpendicular to `v`.
///
/// The result is the normalized cross product with whichever standard basis
/// vector is least aligned with `v`, so the construction never degenerates.
#[must_use]
pub fn any_perpendicular(v: &Vector3) -> Vector3 {
    let reference = if v.x.abs() < v.z.abs() {
        Vector3::new(1.0, 0.0, 0.0)
    } else {
        Vector3::new(0.0, 0.0, 1.0)
    };
    let perp = v.cross(&reference);
    perp / perp.norm()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn perpendicular_is_unit_and_orthogonal() {
        for v in [
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, -2.0, 3.0),
            Vector3::new(0.0, 5.0, 0.0),
        ] {
            let p = any_perpendicular(&v);
            assert_relative_eq!(p.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(p.dot(&v), 0.0, epsilon = 1e-12);
        }
    }
}
