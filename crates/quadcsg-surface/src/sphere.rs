//! Sphere given by centre and radius.

use std::fmt;

use quadcsg_math::{solve_quadratic, Matrix3, Point3, Vec3};

use crate::shape::AXIS_NAMES;
use crate::{QuadricEqn, QuadricSurface, SurfaceKind};

/// A sphere. The inside is the ball `|p - center| < radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    /// Centre point.
    pub center: Point3,
    /// Radius (always positive).
    pub radius: f64,
}

impl Sphere {
    /// Sphere with the given centre and radius.
    pub fn new(center: Point3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Sphere centred at the origin.
    pub fn at_origin(radius: f64) -> Self {
        Self::new(Point3::origin(), radius)
    }
}

impl QuadricSurface for Sphere {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Sphere
    }

    fn equation(&self) -> QuadricEqn {
        let c = self.center.coords;
        QuadricEqn::from_parts(
            &Matrix3::identity(),
            &(-2.0 * c),
            c.norm_squared() - self.radius * self.radius,
        )
    }

    fn signed_distance(&self, p: &Point3) -> f64 {
        (p - self.center).norm() - self.radius
    }

    fn intersect_ray(&self, origin: &Point3, direction: &Vec3) -> Vec<f64> {
        let oc = origin - self.center;

        // |oc + t*d|^2 = r^2
        let a = direction.dot(direction);
        let b = 2.0 * oc.dot(direction);
        let c = oc.dot(&oc) - self.radius * self.radius;

        solve_quadratic(a, b, c)
    }

    fn displace(&mut self, v: &Vec3) {
        self.center += v;
    }

    fn rotate(&mut self, m: &Matrix3) {
        self.center = Point3::from(m * self.center.coords);
    }
}

impl fmt::Display for Sphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.center;
        let off_axis: Vec<usize> = (0..3).filter(|&i| c[i] != 0.0).collect();
        match off_axis.as_slice() {
            [] => write!(f, "so {}", self.radius),
            [i] => write!(f, "s{} {} {}", AXIS_NAMES[*i], c[*i], self.radius),
            _ => write!(f, "s {} {} {} {}", c.x, c.y, c.z, self.radius),
        }
    }
}
