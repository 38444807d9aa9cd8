//! Infinite circular cylinder given by a point on its axis, the axis and the radius.

use std::fmt;

use quadcsg_math::{solve_quadratic, Dir3, Matrix3, Point3, Vec3};

use crate::shape::{aligned_axis, other_axes, AXIS_NAMES};
use crate::{QuadricEqn, QuadricSurface, SurfaceKind};

/// An infinite cylinder. The inside is within `radius` of the axis line.
#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    /// A point on the axis.
    pub center: Point3,
    /// Axis direction (sign is irrelevant).
    pub axis: Dir3,
    /// Radius (always positive).
    pub radius: f64,
}

impl Cylinder {
    /// Cylinder through `center` along `axis`.
    pub fn new(center: Point3, axis: Dir3, radius: f64) -> Self {
        Self {
            center,
            axis,
            radius,
        }
    }

    /// Component of `v` perpendicular to the axis.
    fn perp(&self, v: &Vec3) -> Vec3 {
        let a = self.axis.as_ref();
        v - v.dot(a) * a
    }

    /// `I - a aᵀ`, the projector onto the plane normal to the axis.
    fn projector(&self) -> Matrix3 {
        let a = self.axis.into_inner();
        Matrix3::identity() - a * a.transpose()
    }
}

impl QuadricSurface for Cylinder {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Cylinder
    }

    fn equation(&self) -> QuadricEqn {
        let m = self.projector();
        let c = self.center.coords;
        let mc = m * c;
        QuadricEqn::from_parts(&m, &(-2.0 * mc), c.dot(&mc) - self.radius * self.radius)
    }

    fn signed_distance(&self, p: &Point3) -> f64 {
        self.perp(&(p - self.center)).norm() - self.radius
    }

    fn intersect_ray(&self, origin: &Point3, direction: &Vec3) -> Vec<f64> {
        let d_perp = self.perp(direction);
        let oc_perp = self.perp(&(origin - self.center));

        // |oc_perp + t*d_perp|^2 = r^2
        let a = d_perp.dot(&d_perp);
        let b = 2.0 * oc_perp.dot(&d_perp);
        let c = oc_perp.dot(&oc_perp) - self.radius * self.radius;

        // Ray is parallel to axis
        if a < 1e-24 * direction.norm_squared() {
            return Vec::new();
        }

        solve_quadratic(a, b, c)
    }

    fn displace(&mut self, v: &Vec3) {
        self.center += v;
    }

    fn rotate(&mut self, m: &Matrix3) {
        self.center = Point3::from(m * self.center.coords);
        self.axis = Dir3::new_normalize(m * self.axis.into_inner());
    }
}

impl fmt::Display for Cylinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.center;
        if let Some(i) = aligned_axis(&self.axis) {
            let (u, v) = other_axes(i);
            return if c[u] == 0.0 && c[v] == 0.0 {
                write!(f, "c{} {}", AXIS_NAMES[i], self.radius)
            } else {
                write!(f, "c/{} {} {} {}", AXIS_NAMES[i], c[u], c[v], self.radius)
            };
        }
        let a = self.axis;
        write!(
            f,
            "c {} {} {} {} {} {} {}",
            c.x, c.y, c.z, a.x, a.y, a.z, self.radius
        )
    }
}
