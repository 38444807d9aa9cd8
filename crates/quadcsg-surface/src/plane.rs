//! Infinite plane `n·x = d`.

use std::fmt;

use quadcsg_math::{Dir3, Matrix3, Point3, Vec3};

use crate::shape::{aligned_axis, AXIS_NAMES};
use crate::{QuadricEqn, QuadricSurface, SurfaceKind};

/// An infinite plane given by a unit normal and its offset from the origin.
///
/// The inside is the half-space behind the normal (`n·x < d`).
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// Unit normal, pointing to the outside.
    pub normal: Dir3,
    /// Offset: every point on the plane satisfies `normal·x = distance`.
    pub distance: f64,
}

impl Plane {
    /// Plane from its equation `normal·x = distance`.
    pub fn new(normal: Dir3, distance: f64) -> Self {
        Self { normal, distance }
    }

    /// Plane through `point` with the given normal.
    pub fn from_point_normal(point: &Point3, normal: Dir3) -> Self {
        let distance = normal.dot(&point.coords);
        Self { normal, distance }
    }

    /// The point of the plane closest to the origin.
    pub fn origin(&self) -> Point3 {
        Point3::from(self.normal.into_inner() * self.distance)
    }
}

impl QuadricSurface for Plane {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Plane
    }

    fn equation(&self) -> QuadricEqn {
        let n = self.normal;
        QuadricEqn::new([0.0, 0.0, 0.0, 0.0, 0.0, 0.0, n.x, n.y, n.z, -self.distance])
    }

    fn signed_distance(&self, p: &Point3) -> f64 {
        self.normal.dot(&p.coords) - self.distance
    }

    fn intersect_ray(&self, origin: &Point3, direction: &Vec3) -> Vec<f64> {
        let denom = direction.dot(&self.normal);

        // Ray is parallel to plane
        if denom.abs() < 1e-12 * direction.norm() {
            return Vec::new();
        }

        vec![-self.signed_distance(origin) / denom]
    }

    fn displace(&mut self, v: &Vec3) {
        self.distance += self.normal.dot(v);
    }

    fn rotate(&mut self, m: &Matrix3) {
        self.normal = Dir3::new_normalize(m * self.normal.into_inner());
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match aligned_axis(&self.normal) {
            Some(i) if self.normal[i] > 0.0 => write!(f, "p{} {}", AXIS_NAMES[i], self.distance),
            _ => write!(
                f,
                "p {} {} {} {}",
                self.normal.x, self.normal.y, self.normal.z, self.distance
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use quadcsg_math::rotation_z;
    use std::f64::consts::PI;

    fn px(d: f64) -> Plane {
        Plane::new(Dir3::new_normalize(Vec3::x()), d)
    }

    #[test]
    fn test_signed_distance() {
        let p = px(5.0);
        assert_relative_eq!(p.signed_distance(&Point3::new(7.0, 1.0, 1.0)), 2.0);
        assert_relative_eq!(p.signed_distance(&Point3::new(1.0, 0.0, 0.0)), -4.0);
    }

    #[test]
    fn test_equation_matches_distance() {
        let p = Plane::from_point_normal(
            &Point3::new(1.0, 2.0, 3.0),
            Dir3::new_normalize(Vec3::new(1.0, 1.0, 0.0)),
        );
        let q = Point3::new(-2.0, 4.0, 9.0);
        assert_relative_eq!(p.equation().value(&q), p.signed_distance(&q), epsilon = 1e-12);
    }

    #[test]
    fn test_ray_perpendicular() {
        let p = Plane::new(Dir3::new_normalize(Vec3::z()), 0.0);
        let roots = p.intersect_ray(&Point3::new(3.0, 4.0, 10.0), &Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ray_behind_is_negative() {
        let p = Plane::new(Dir3::new_normalize(Vec3::z()), 0.0);
        let roots = p.intersect_ray(&Point3::new(0.0, 0.0, -5.0), &Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], -5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ray_parallel() {
        let p = Plane::new(Dir3::new_normalize(Vec3::z()), 0.0);
        let roots = p.intersect_ray(&Point3::new(0.0, 0.0, 5.0), &Vec3::new(1.0, 0.0, 0.0));
        assert!(roots.is_empty());
    }

    #[test]
    fn test_ray_angled() {
        let p = Plane::new(Dir3::new_normalize(Vec3::z()), 0.0);
        let d = Vec3::new(1.0, 0.0, -1.0).normalize();
        let roots = p.intersect_ray(&Point3::new(0.0, 0.0, 10.0), &d);
        assert_relative_eq!(roots[0], 10.0 * 2.0_f64.sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn test_displace_and_rotate() {
        let mut p = px(5.0);
        p.displace(&Vec3::new(2.0, 7.0, 0.0));
        assert_relative_eq!(p.distance, 7.0);
        p.rotate(&rotation_z(PI / 2.0));
        assert_relative_eq!(p.normal.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.signed_distance(&Point3::new(0.0, 7.0, 0.0)), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_display() {
        assert_eq!(px(5.0).to_string(), "px 5");
        let tilted = Plane::new(Dir3::new_normalize(Vec3::new(0.0, -1.0, 0.0)), 2.5);
        assert_eq!(tilted.to_string(), "p 0 -1 0 2.5");
    }
}
