#![warn(missing_docs)]

//! Math types for the quadcsg solid-geometry engine.
//!
//! Thin wrappers around nalgebra providing the point, vector and rotation
//! types used by the surfaces, plus the tolerance constants and the
//! degenerate-aware quadratic solver shared by every ray intersection.

use nalgebra::{Matrix3 as NMatrix3, Unit, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A 3x3 matrix, used for rotations and the quadratic part of a quadric.
pub type Matrix3 = NMatrix3<f64>;

/// Rotation about the X axis by `angle` radians.
pub fn rotation_x(angle: f64) -> Matrix3 {
    let (s, c) = angle.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c)
}

/// Rotation about the Y axis by `angle` radians.
pub fn rotation_y(angle: f64) -> Matrix3 {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c)
}

/// Rotation about the Z axis by `angle` radians.
pub fn rotation_z(angle: f64) -> Matrix3 {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
}

/// Rotation about an arbitrary axis through the origin by `angle` radians.
///
/// Uses Rodrigues' rotation formula.
pub fn rotation_about_axis(axis: &Dir3, angle: f64) -> Matrix3 {
    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;
    let (x, y, z) = (axis.x, axis.y, axis.z);
    Matrix3::new(
        t * x * x + c,
        t * x * y - s * z,
        t * x * z + s * y,
        t * x * y + s * z,
        t * y * y + c,
        t * y * z - s * x,
        t * x * z - s * y,
        t * y * z + s * x,
        t * z * z + c,
    )
}

/// True if `m` is orthonormal with determinant +1 (a proper rotation).
pub fn is_rotation(m: &Matrix3, tol: f64) -> bool {
    let residual = (m * m.transpose() - Matrix3::identity()).abs().max();
    residual < tol && (m.determinant() - 1.0).abs() < tol
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance.
    pub linear: f64,
    /// Angular tolerance in radians.
    pub angular: f64,
}

impl Tolerance {
    /// Default tolerances (1e-6 linear, 1e-9 rad angular).
    pub const DEFAULT: Self = Self {
        linear: 1e-6,
        angular: 1e-9,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }

    /// Check if two angles are effectively equal (in radians).
    pub fn angles_equal(&self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.angular
    }

    /// Sign of `d` with a dead zone: `0` when `|d|` is below the linear tolerance.
    pub fn sign(&self, d: f64) -> i8 {
        if self.is_zero(d) {
            0
        } else if d > 0.0 {
            1
        } else {
            -1
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Relative threshold below which a quadratic coefficient counts as zero.
const ROOT_EPS: f64 = 1e-12;

/// Real roots of `a t² + b t + c = 0`, ascending.
///
/// Degenerate inputs never produce NaN: a vanishing `a` reduces to the linear
/// root, a vanishing discriminant to a single root, and an identically zero
/// or contradictory equation to no roots.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    let scale = a.abs().max(b.abs()).max(c.abs());
    if scale == 0.0 || !scale.is_finite() {
        return Vec::new();
    }

    if a.abs() <= ROOT_EPS * scale {
        if b.abs() <= ROOT_EPS * scale {
            return Vec::new();
        }
        return vec![-c / b];
    }

    let disc = b * b - 4.0 * a * c;
    let disc_scale = (b * b).max((4.0 * a * c).abs());
    if disc.abs() <= ROOT_EPS * disc_scale {
        return vec![-b / (2.0 * a)];
    }
    if disc < 0.0 {
        return Vec::new();
    }

    // Citardauq form avoids cancellation when b² >> 4ac.
    let q = -0.5 * (b + b.signum() * disc.sqrt());
    let (t1, t2) = if q == 0.0 {
        let r = (-c / a).sqrt();
        (-r, r)
    } else {
        (q / a, c / q)
    };
    if t1 <= t2 {
        vec![t1, t2]
    } else {
        vec![t2, t1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_rotation_z_90() {
        let m = rotation_z(PI / 2.0);
        let p = m * Vec3::new(1.0, 0.0, 0.0);
        assert!(p.x.abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_about_axis() {
        // Rotate (1,0,0) by 90° about Z axis → (0,1,0)
        let axis = Dir3::new_normalize(Vec3::z());
        let m = rotation_about_axis(&axis, PI / 2.0);
        let r = m * Vec3::new(1.0, 0.0, 0.0);
        assert!(r.x.abs() < 1e-12);
        assert!((r.y - 1.0).abs() < 1e-12);
        assert!(r.z.abs() < 1e-12);

        // 180° about (1,1,0) swaps x and y
        let axis2 = Dir3::new_normalize(Vec3::new(1.0, 1.0, 0.0));
        let m2 = rotation_about_axis(&axis2, PI);
        let r2 = m2 * Vec3::new(1.0, 0.0, 0.0);
        assert!(r2.x.abs() < 1e-12);
        assert!((r2.y - 1.0).abs() < 1e-12);
        assert!(r2.z.abs() < 1e-12);
    }

    #[test]
    fn test_axis_rotations_agree() {
        let angle = 0.7;
        let mx = rotation_about_axis(&Dir3::new_normalize(Vec3::x()), angle);
        let my = rotation_about_axis(&Dir3::new_normalize(Vec3::y()), angle);
        assert!((mx - rotation_x(angle)).abs().max() < 1e-12);
        assert!((my - rotation_y(angle)).abs().max() < 1e-12);
    }

    #[test]
    fn test_is_rotation() {
        assert!(is_rotation(&rotation_y(1.3), 1e-9));
        assert!(!is_rotation(&(2.0 * Matrix3::identity()), 1e-9));
        // A reflection is orthonormal but not a proper rotation
        let mirror = Matrix3::new(-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        assert!(!is_rotation(&mirror, 1e-9));
    }

    #[test]
    fn test_tolerance_sign() {
        let tol = Tolerance::DEFAULT;
        assert_eq!(tol.sign(1e-7), 0);
        assert_eq!(tol.sign(-2.0), -1);
        assert_eq!(tol.sign(0.5), 1);
    }

    #[test]
    fn test_tolerance_points_equal() {
        let tol = Tolerance::DEFAULT;
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(1.0 + 1e-7, 2.0, 3.0);
        assert!(tol.points_equal(&a, &b));
        let c = Point3::new(1.001, 2.0, 3.0);
        assert!(!tol.points_equal(&a, &c));
    }

    #[test]
    fn test_quadratic_two_roots() {
        // (t - 2)(t + 3) = t² + t - 6
        let roots = solve_quadratic(1.0, 1.0, -6.0);
        assert_eq!(roots.len(), 2);
        assert_relative_eq!(roots[0], -3.0, epsilon = 1e-12);
        assert_relative_eq!(roots[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quadratic_tangent() {
        // (t - 4)²
        let roots = solve_quadratic(1.0, -8.0, 16.0);
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quadratic_degenerate() {
        assert!(solve_quadratic(1.0, 0.0, 1.0).is_empty());
        assert_eq!(solve_quadratic(0.0, 2.0, -4.0), vec![2.0]);
        assert!(solve_quadratic(0.0, 0.0, 3.0).is_empty());
        assert!(solve_quadratic(0.0, 0.0, 0.0).is_empty());
    }

    #[test]
    fn test_quadratic_symmetric_roots() {
        let roots = solve_quadratic(1.0, 0.0, -25.0);
        assert_eq!(roots.len(), 2);
        assert_relative_eq!(roots[0], -5.0, epsilon = 1e-12);
        assert_relative_eq!(roots[1], 5.0, epsilon = 1e-12);
    }
}
