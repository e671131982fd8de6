//! Small vector helpers shared by the kernels.

use glam::Vec3;

/// Split `v` into its component along the unit vector `axis` and the
/// remainder perpendicular to it. Returns `(radial, perpendicular)`.
#[inline]
pub fn split_along(v: Vec3, axis: Vec3) -> (Vec3, Vec3) {
    let radial = axis * v.dot(axis);
    (radial, v - radial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_recomposes() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let axis = Vec3::new(0.0, 1.0, 0.0);
        let (radial, perp) = split_along(v, axis);
        assert_eq!(radial, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(perp, Vec3::new(1.0, 0.0, 3.0));
        assert!((radial + perp - v).length() < 1e-6);
    }

    #[test]
    fn split_along_diagonal_axis() {
        let axis = Vec3::new(1.0, 1.0, 0.0).normalize();
        let v = Vec3::new(2.0, 0.0, 0.0);
        let (radial, perp) = split_along(v, axis);
        assert!((radial.length() - 2.0 / 2.0_f32.sqrt()).abs() < 1e-6);
        assert!(perp.dot(axis).abs() < 1e-6);
    }
}
